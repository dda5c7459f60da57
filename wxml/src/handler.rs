/*!
# Receiver of parse events

The parser is generic over a [`Handler`] so that callback dispatch is
static on the hot path. When object-style polymorphism is needed, the
forwarding impls for `&mut H` and `Box<H>` allow passing a
`&mut dyn Handler` (the trait is object-safe).
*/
use crate::error::{Error, Result, XmlError};

/**
# Receiver of parse events

All slices handed to a handler are borrowed from parser-internal storage
and are only valid for the duration of the call; a handler which needs to
keep a payload must copy it before returning.

Every event method has a no-op default and returns a [`Result`]: returning
an error from any callback aborts the parse and propagates the error out of
the parse entry point unchanged. This is the only way to stop a running
parse from the outside. Callbacks should not fabricate [`Error::Parse`]
values of their own; those are reserved for the parser.

[`Handler::on_error`] is the exception to the no-op rule: its default
implementation returns the reported error, so a handler which does not
override it turns every malformed document into an `Err` from the parse
call. Overriding it to return `Ok(())` makes the parse call return
successfully after the (single) error report; no further events follow
either way.

Positions are zero-based (line, column) pairs counted in code units.
*/
#[allow(unused_variables)]
pub trait Handler {
	/// Called once for the XML declaration, if present.
	///
	/// `encoding` and `standalone` are empty slices when the respective
	/// pseudo-attribute is absent. The position is that of the `?` in
	/// `<?xml`.
	fn on_xml_declaration(
		&mut self,
		version: &[u16],
		encoding: &[u16],
		standalone: &[u16],
		line: usize,
		column: usize,
	) -> Result<()> {
		Ok(())
	}

	/// Called at `<Name`, with the position of the first name unit.
	fn on_begin_tag(&mut self, name: &[u16], line: usize, column: usize) -> Result<()> {
		Ok(())
	}

	/// Called immediately after the `/>` of an empty-element tag, after
	/// the element's attributes.
	fn on_end_tag_empty(&mut self) -> Result<()> {
		Ok(())
	}

	/// Called at `</Name`, with the position of the first name unit.
	fn on_end_tag(&mut self, name: &[u16], line: usize, column: usize) -> Result<()> {
		Ok(())
	}

	/// Called once per attribute.
	///
	/// Name and value are two adjacent regions of the same internal
	/// buffer. The name position is that of its first unit; the value
	/// position is that of the opening quote.
	fn on_attribute(
		&mut self,
		name: &[u16],
		value: &[u16],
		name_line: usize,
		name_column: usize,
		value_line: usize,
		value_column: usize,
	) -> Result<()> {
		Ok(())
	}

	/// Called once per non-empty contiguous text run, with the position
	/// of its first character.
	fn on_text(&mut self, text: &[u16], line: usize, column: usize) -> Result<()> {
		Ok(())
	}

	/// Called once per comment with the body between `<!--` and `-->`,
	/// positioned at the first body unit.
	fn on_comment(&mut self, body: &[u16], line: usize, column: usize) -> Result<()> {
		Ok(())
	}

	/// Called once per CDATA section with the body between `<![CDATA[`
	/// and `]]>`, positioned at the first body unit.
	fn on_cdata(&mut self, body: &[u16], line: usize, column: usize) -> Result<()> {
		Ok(())
	}

	/// Called once per non-recoverable parse error.
	///
	/// After this call the parser emits no further events (except more
	/// `on_error` calls for elements left open at a clean end of input).
	/// The default implementation returns the error, which makes the
	/// parse entry point fail loudly.
	fn on_error(&mut self, err: &XmlError, line: usize, column: usize) -> Result<()> {
		Err(Error::parse(err.clone(), line, column))
	}
}

impl<H: Handler + ?Sized> Handler for &mut H {
	fn on_xml_declaration(
		&mut self,
		version: &[u16],
		encoding: &[u16],
		standalone: &[u16],
		line: usize,
		column: usize,
	) -> Result<()> {
		(**self).on_xml_declaration(version, encoding, standalone, line, column)
	}

	fn on_begin_tag(&mut self, name: &[u16], line: usize, column: usize) -> Result<()> {
		(**self).on_begin_tag(name, line, column)
	}

	fn on_end_tag_empty(&mut self) -> Result<()> {
		(**self).on_end_tag_empty()
	}

	fn on_end_tag(&mut self, name: &[u16], line: usize, column: usize) -> Result<()> {
		(**self).on_end_tag(name, line, column)
	}

	fn on_attribute(
		&mut self,
		name: &[u16],
		value: &[u16],
		name_line: usize,
		name_column: usize,
		value_line: usize,
		value_column: usize,
	) -> Result<()> {
		(**self).on_attribute(name, value, name_line, name_column, value_line, value_column)
	}

	fn on_text(&mut self, text: &[u16], line: usize, column: usize) -> Result<()> {
		(**self).on_text(text, line, column)
	}

	fn on_comment(&mut self, body: &[u16], line: usize, column: usize) -> Result<()> {
		(**self).on_comment(body, line, column)
	}

	fn on_cdata(&mut self, body: &[u16], line: usize, column: usize) -> Result<()> {
		(**self).on_cdata(body, line, column)
	}

	fn on_error(&mut self, err: &XmlError, line: usize, column: usize) -> Result<()> {
		(**self).on_error(err, line, column)
	}
}

impl<H: Handler + ?Sized> Handler for Box<H> {
	fn on_xml_declaration(
		&mut self,
		version: &[u16],
		encoding: &[u16],
		standalone: &[u16],
		line: usize,
		column: usize,
	) -> Result<()> {
		(**self).on_xml_declaration(version, encoding, standalone, line, column)
	}

	fn on_begin_tag(&mut self, name: &[u16], line: usize, column: usize) -> Result<()> {
		(**self).on_begin_tag(name, line, column)
	}

	fn on_end_tag_empty(&mut self) -> Result<()> {
		(**self).on_end_tag_empty()
	}

	fn on_end_tag(&mut self, name: &[u16], line: usize, column: usize) -> Result<()> {
		(**self).on_end_tag(name, line, column)
	}

	fn on_attribute(
		&mut self,
		name: &[u16],
		value: &[u16],
		name_line: usize,
		name_column: usize,
		value_line: usize,
		value_column: usize,
	) -> Result<()> {
		(**self).on_attribute(name, value, name_line, name_column, value_line, value_column)
	}

	fn on_text(&mut self, text: &[u16], line: usize, column: usize) -> Result<()> {
		(**self).on_text(text, line, column)
	}

	fn on_comment(&mut self, body: &[u16], line: usize, column: usize) -> Result<()> {
		(**self).on_comment(body, line, column)
	}

	fn on_cdata(&mut self, body: &[u16], line: usize, column: usize) -> Result<()> {
		(**self).on_cdata(body, line, column)
	}

	fn on_error(&mut self, err: &XmlError, line: usize, column: usize) -> Result<()> {
		(**self).on_error(err, line, column)
	}
}
