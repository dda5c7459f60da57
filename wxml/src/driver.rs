/*!
# Parse entry points

Wires an [`Options`] record, a character source and a [`Handler`] into one
of the four statically specialised parser routines.
*/
use std::io;

use crate::error::Result;
use crate::handler::Handler;
use crate::parser::Parser;
use crate::source::{BufferSource, DecodingSource, Encoding, UnitRead};

/// Options consumed at parser construction; immutable for the parse's
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Options {
	/// Override encoding detection for byte-stream inputs. Ignored by the
	/// in-memory entry points, whose input is already decoded.
	pub encoding: Option<Encoding>,
	/// Use the vectorised fast paths. The event sequence is identical
	/// either way.
	pub use_simd: bool,
	/// Check that every end tag matches its begin tag and report elements
	/// left open at the end of the document.
	pub check_begin_end_tag: bool,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			encoding: None,
			use_simd: true,
			check_begin_end_tag: true,
		}
	}
}

/// Parse a document from a string.
///
/// The text is transcoded to UTF-16 code units up front; positions and
/// payload slices are in code units, not bytes.
pub fn parse_str<H: Handler + ?Sized>(text: &str, handler: &mut H, options: &Options) -> Result<()> {
	let units: Vec<u16> = text.encode_utf16().collect();
	dispatch(BufferSource::new(&units), handler, options)
}

/// Parse a document from a buffer of UTF-16 code units.
pub fn parse_units<H: Handler + ?Sized>(
	units: &[u16],
	handler: &mut H,
	options: &Options,
) -> Result<()> {
	dispatch(BufferSource::new(units), handler, options)
}

/// Parse a document from a byte stream, detecting the encoding from the
/// stream head unless [`Options::encoding`] overrides it.
pub fn parse_reader<R: io::Read, H: Handler + ?Sized>(
	reader: R,
	handler: &mut H,
	options: &Options,
) -> Result<()> {
	let source = DecodingSource::with_encoding(reader, options.encoding)?;
	dispatch(source, handler, options)
}

/// Select one of the four monomorphised parse routines from the two
/// boolean toggles, so that each routine compiles with its disabled
/// branches eliminated.
fn dispatch<S: UnitRead, H: Handler + ?Sized>(
	source: S,
	handler: &mut H,
	options: &Options,
) -> Result<()> {
	match (options.use_simd, options.check_begin_end_tag) {
		(true, true) => Parser::<_, _, true, true>::new(source, handler).parse(),
		(true, false) => Parser::<_, _, true, false>::new(source, handler).parse(),
		(false, true) => Parser::<_, _, false, true>::new(source, handler).parse(),
		(false, false) => Parser::<_, _, false, false>::new(source, handler).parse(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_options() {
		let opts = Options::default();
		assert_eq!(opts.encoding, None);
		assert!(opts.use_simd);
		assert!(opts.check_begin_end_tag);
	}
}
