/*!
# Streaming SAX-style XML 1.0 parsing over UTF-16 code units

This crate parses XML 1.0 documents and delivers events to a
user-supplied [`Handler`] as borrowed slices of UTF-16 code units, with
precise zero-based (line, column) source positions. It allocates nothing
per event: lexemes are assembled in one reusable scratch buffer whose
slices stay valid for the duration of each callback.

## Features (and deliberate omissions)

* Push/callback API only; no tree is built
* Start/empty/end tags, attributes, text, comments, CDATA sections and
  the XML declaration
* The five predefined entities and numeric character references
* Surrogate pairs validated explicitly; lone surrogates are errors
* Matched-tag checking with unclosed-element reports (can be disabled)
* Vectorised fast paths for bulk content (can be disabled)
* Input from strings, unit buffers, or byte streams in UTF-8/16/32 with
  BOM and `<?xm` heuristic detection
* No DTDs, no processing instructions, no custom entities, no namespace
  resolution

## Example

```
use wxml::{parse_str, Handler, Options, Result};

struct Names(Vec<String>);

impl Handler for Names {
	fn on_begin_tag(&mut self, name: &[u16], _line: usize, _column: usize) -> Result<()> {
		self.0.push(String::from_utf16_lossy(name));
		Ok(())
	}
}

let mut names = Names(Vec::new());
parse_str("<greeting kind='idle'>Hello World!</greeting>", &mut names, &Options::default())?;
assert_eq!(names.0, vec!["greeting".to_string()]);
# wxml::Result::Ok(())
```

## Error reporting

Malformed documents are reported exactly once through
[`Handler::on_error`] and parsing stops. The default `on_error` turns the
report into the `Err` of the parse call; a handler may override it to
inspect and swallow the report instead. See [`error`] for the taxonomy.
*/

pub mod driver;
pub mod error;
pub mod handler;
pub mod parser;
mod scratch;
pub mod source;

#[cfg(test)]
mod tests;

#[doc(inline)]
pub use driver::{parse_reader, parse_str, parse_units, Options};
#[doc(inline)]
pub use error::{Error, Result, XmlError};
#[doc(inline)]
pub use handler::Handler;
#[doc(inline)]
pub use parser::Parser;
#[doc(inline)]
pub use source::{BufferSource, DecodingSource, Encoding, UnitRead};

/// Package version
pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");
