/*!
# XML 1.0 parser state machine

The [`Parser`] drives a [`UnitRead`] source through the XML 1.0 grammar
and delivers events to a [`Handler`]. It allocates nothing per event: all
lexemes are assembled in one reusable scratch buffer and handed to the
handler as borrowed slices.

The two configuration toggles are const generics, so the four flag
combinations compile to four independent parse routines and disabled
branches are dead code rather than runtime checks:

* `SIMD`: enables the lane fast paths for bulk content, attribute values,
  CDATA, comments, name scanning and the end-tag compare. Event sequences
  are identical either way.
* `CHECK`: enables matched-tag checking via the open-tag name stack packed
  into the scratch buffer. When disabled, end tags are parsed but not
  matched and nothing is reported for elements left open at end of input.

Errors unwind from the sub-parsers as `Result` values; the top-level
[`Parser::parse`] translates the first parse error into a single
[`Handler::on_error`] call and stops.
*/
use smartstring::alias::String as SmartString;

use wxml_classes as classes;
use wxml_classes::lanes;

use crate::error::{Error, Result, XmlError};
use crate::handler::Handler;
use crate::scratch::ScratchBuffer;
use crate::source::UnitRead;

/// Width of the preview lanes used by the fast paths.
pub const LANE_WIDTH: usize = 8;

const U_TAB: u16 = 0x09;
const U_LF: u16 = 0x0a;
const U_CR: u16 = 0x0d;
const U_SPACE: u16 = b' ' as u16;
const U_BANG: u16 = b'!' as u16;
const U_QUOT: u16 = b'"' as u16;
const U_HASH: u16 = b'#' as u16;
const U_AMP: u16 = b'&' as u16;
const U_APOS: u16 = b'\'' as u16;
const U_DASH: u16 = b'-' as u16;
const U_SLASH: u16 = b'/' as u16;
const U_SEMICOLON: u16 = b';' as u16;
const U_LT: u16 = b'<' as u16;
const U_EQ: u16 = b'=' as u16;
const U_GT: u16 = b'>' as u16;
const U_QUESTION: u16 = b'?' as u16;
const U_BRACKET_OPEN: u16 = b'[' as u16;
const U_BRACKET_CLOSE: u16 = b']' as u16;
const U_LOWER_X: u16 = b'x' as u16;

#[derive(Debug, Clone, Copy, PartialEq)]
enum DeclKeyword {
	Version,
	Encoding,
	Standalone,
	Other,
}

#[inline]
fn units_eq(units: &[u16], ascii: &[u8]) -> bool {
	units.len() == ascii.len() && units.iter().zip(ascii).all(|(&u, &b)| u == b as u16)
}

/// Decode the five predefined entities.
fn predefined_entity(name: &[u16]) -> Option<u16> {
	let mut ascii = [0u8; 4];
	if name.is_empty() || name.len() > ascii.len() {
		return None;
	}
	for (i, &u) in name.iter().enumerate() {
		if u > 0x7f {
			return None;
		}
		ascii[i] = u as u8;
	}
	match &ascii[..name.len()] {
		b"lt" => Some(U_LT),
		b"gt" => Some(U_GT),
		b"amp" => Some(U_AMP),
		b"apos" => Some(U_APOS),
		b"quot" => Some(U_QUOT),
		_ => None,
	}
}

/**
# Streaming XML 1.0 parser

One parser instance parses one document: construct it over a source and a
handler, call [`Self::parse`], drop it. The scratch buffer is acquired at
construction and released on drop regardless of the outcome.

Positions are zero-based (line, column) pairs counted in code units, with
`\n`, a lone `\r` and `\r\n` each advancing the line by one. The column
counter uses wrapping arithmetic internally; it starts one below zero so
the first unit of the document lands at column 0.
*/
pub struct Parser<'h, S, H: ?Sized, const SIMD: bool, const CHECK: bool> {
	source: S,
	handler: &'h mut H,
	scratch: ScratchBuffer,
	/// One-unit pushback slot for re-dispatched lookahead.
	pending: Option<u16>,
	/// Position of the most recently consumed unit.
	line: usize,
	column: usize,
	/// Start position of the next text run (the unit after the most
	/// recent markup).
	content_line: usize,
	content_column: usize,
	/// True once any non-whitespace content has been observed; forbids
	/// a subsequent XML declaration.
	past_prolog: bool,
	decl_seen: bool,
}

impl<'h, S, H, const SIMD: bool, const CHECK: bool> Parser<'h, S, H, SIMD, CHECK>
where
	S: UnitRead,
	H: Handler + ?Sized,
{
	pub fn new(source: S, handler: &'h mut H) -> Self {
		Self {
			source,
			handler,
			scratch: ScratchBuffer::new(),
			pending: None,
			line: 0,
			column: usize::MAX,
			content_line: 0,
			content_column: 0,
			past_prolog: false,
			decl_seen: false,
		}
	}

	/// Parse the document to completion.
	///
	/// The first parse error is delivered once through
	/// [`Handler::on_error`]; whatever that call returns becomes the
	/// result. On clean end of input with `CHECK` enabled, every element
	/// still open is reported the same way, innermost first. I/O and
	/// decode-level errors are returned directly without an `on_error`
	/// call.
	pub fn parse(mut self) -> Result<()> {
		match self.run() {
			Ok(()) => self.report_unclosed(),
			Err(Error::Parse { err, line, column }) => self.handler.on_error(&err, line, column),
			Err(other) => Err(other),
		}
	}

	// ---- reading and positions ----

	#[inline(always)]
	fn read(&mut self) -> Result<Option<u16>> {
		if let Some(u) = self.pending.take() {
			return Ok(Some(u));
		}
		match self.source.read_one()? {
			Some(u) => {
				self.column = self.column.wrapping_add(1);
				Ok(Some(u))
			}
			None => Ok(None),
		}
	}

	#[inline(always)]
	fn read_required(&mut self) -> Result<u16> {
		match self.read()? {
			Some(u) => Ok(u),
			None => Err(self.error_eof()),
		}
	}

	/// Re-dispatch a unit on the next read. The position counters still
	/// point at it.
	#[inline(always)]
	fn push_back(&mut self, u: u16) {
		debug_assert!(self.pending.is_none());
		self.pending = Some(u);
	}

	fn error_at(&self, err: XmlError, line: usize, column: usize) -> Error {
		Error::parse(err, line, column)
	}

	/// Error at the position of the most recently consumed unit.
	fn error_here(&self, err: XmlError) -> Error {
		Error::parse(err, self.line, self.column)
	}

	/// Error one column past the most recently consumed unit, for
	/// end-of-input reports.
	fn error_eof(&self) -> Error {
		Error::parse(
			XmlError::UnexpectedEndOfInput,
			self.line,
			self.column.wrapping_add(1),
		)
	}

	/// Remember the unit after the most recent markup as the start of the
	/// next text run.
	#[inline]
	fn mark_content_start(&mut self) {
		self.content_line = self.line;
		self.content_column = self.column.wrapping_add(1);
	}

	/// Read the low half of a surrogate pair whose high half sits at the
	/// current position.
	fn read_low_surrogate(&mut self) -> Result<u16> {
		let line = self.line;
		let column = self.column;
		match self.read()? {
			Some(low) if classes::is_low_surrogate(low) => Ok(low),
			Some(_) | None => Err(self.error_at(XmlError::LoneSurrogate, line, column)),
		}
	}

	/// Skip XML whitespace, accounting line breaks. Returns whether any
	/// whitespace was consumed; the terminating unit is pushed back.
	fn skip_whitespace(&mut self) -> Result<bool> {
		let mut any = false;
		loop {
			match self.read()? {
				Some(U_LF) => {
					any = true;
					self.line += 1;
					self.column = usize::MAX;
				}
				Some(U_CR) => {
					any = true;
					self.consume_after_cr()?;
				}
				Some(U_SPACE) | Some(U_TAB) => {
					any = true;
				}
				Some(u) => {
					self.push_back(u);
					return Ok(any);
				}
				None => return Ok(any),
			}
		}
	}

	/// Line accounting after a consumed `\r`: fold a following `\n` into
	/// the same break, otherwise count the `\r` alone and re-dispatch the
	/// lookahead. Returns true if a `\n` was consumed.
	fn consume_after_cr(&mut self) -> Result<bool> {
		match self.read()? {
			Some(U_LF) => {
				self.line += 1;
				self.column = usize::MAX;
				Ok(true)
			}
			Some(other) => {
				self.line += 1;
				self.column = 0;
				self.push_back(other);
				Ok(false)
			}
			None => {
				self.line += 1;
				self.column = 0;
				Ok(false)
			}
		}
	}

	// ---- top-level dispatch ----

	fn run(&mut self) -> Result<()> {
		loop {
			if SIMD && self.pending.is_none() {
				while let Some(lane) = self.source.preview::<LANE_WIDTH>() {
					if !lanes::text_lane(&lane) {
						break;
					}
					self.scratch.push_lane(&lane);
					self.source.advance(LANE_WIDTH);
					self.column = self.column.wrapping_add(LANE_WIDTH);
				}
			}
			let u = match self.read()? {
				Some(u) => u,
				None => break,
			};
			match u {
				U_LT => {
					self.flush_text()?;
					self.parse_markup()?;
				}
				U_AMP => {
					self.parse_reference()?;
				}
				U_LF => {
					self.line += 1;
					self.column = usize::MAX;
					self.scratch.push(U_LF);
				}
				U_CR => {
					self.scratch.push(U_CR);
					if self.consume_after_cr()? {
						self.scratch.push(U_LF);
					}
				}
				u => self.accumulate_text(u)?,
			}
		}
		self.flush_text()
	}

	#[inline]
	fn accumulate_text(&mut self, u: u16) -> Result<()> {
		if classes::is_text(u) {
			self.scratch.push(u);
			return Ok(());
		}
		if classes::is_high_surrogate(u) {
			let low = self.read_low_surrogate()?;
			self.scratch.push(u);
			self.scratch.push(low);
			return Ok(());
		}
		if classes::is_low_surrogate(u) {
			return Err(self.error_here(XmlError::LoneSurrogate));
		}
		Err(self.error_here(XmlError::InvalidChar))
	}

	/// Emit the accumulated text run, if any.
	///
	/// Whitespace-only runs before the first real content are dropped
	/// silently; they may legally precede the root element.
	fn flush_text(&mut self) -> Result<()> {
		if self.scratch.lexeme().is_empty() {
			return Ok(());
		}
		if !self.past_prolog && self.scratch.lexeme().iter().all(|&u| classes::is_space(u)) {
			self.scratch.clear_lexeme();
			return Ok(());
		}
		self.past_prolog = true;
		self.handler
			.on_text(self.scratch.lexeme(), self.content_line, self.content_column)?;
		self.scratch.clear_lexeme();
		Ok(())
	}

	/// Dispatch after a `<` in content position.
	fn parse_markup(&mut self) -> Result<()> {
		let lt_line = self.line;
		let lt_column = self.column;
		let u = self.read_required()?;
		match u {
			U_QUESTION => self.parse_declaration(),
			U_BANG => self.parse_directive(),
			U_SLASH => self.parse_end_tag(),
			u => self.parse_begin_tag(u, lt_line, lt_column),
		}
	}

	// ---- names ----

	/// Parse a `Name` whose first unit has already been consumed into the
	/// scratch lexeme. Returns false (consuming nothing further) if the
	/// first unit cannot start a name. The unit terminating the name is
	/// pushed back.
	fn parse_name(&mut self, first: u16) -> Result<bool> {
		if classes::is_name_start(first) {
			self.scratch.push(first);
		} else if classes::is_high_surrogate(first) {
			let low = self.read_low_surrogate()?;
			if !classes::sup_is_name_start(classes::combine_surrogates(first, low)) {
				return Ok(false);
			}
			self.scratch.push(first);
			self.scratch.push(low);
		} else {
			return Ok(false);
		}
		loop {
			if SIMD && self.pending.is_none() {
				while let Some(lane) = self.source.preview::<LANE_WIDTH>() {
					if !lanes::common_name_lane(&lane) {
						break;
					}
					self.scratch.push_lane(&lane);
					self.source.advance(LANE_WIDTH);
					self.column = self.column.wrapping_add(LANE_WIDTH);
				}
			}
			match self.read()? {
				Some(u) if classes::is_name(u) => self.scratch.push(u),
				Some(u) if classes::is_high_surrogate(u) => {
					let low = self.read_low_surrogate()?;
					if !classes::sup_is_name(classes::combine_surrogates(u, low)) {
						return Err(self.error_here(XmlError::InvalidChar));
					}
					self.scratch.push(u);
					self.scratch.push(low);
				}
				Some(u) => {
					self.push_back(u);
					return Ok(true);
				}
				None => return Ok(true),
			}
		}
	}

	// ---- tags ----

	fn parse_begin_tag(&mut self, first: u16, lt_line: usize, lt_column: usize) -> Result<()> {
		self.past_prolog = true;
		let name_line = self.line;
		let name_column = self.column;
		if !self.parse_name(first)? {
			return Err(self.error_at(XmlError::InvalidBeginTagName, lt_line, lt_column));
		}
		self.handler
			.on_begin_tag(self.scratch.lexeme(), name_line, name_column)?;
		if CHECK {
			self.scratch.push_name();
		} else {
			self.scratch.clear_lexeme();
		}
		loop {
			let saw_space = self.skip_whitespace()?;
			let u = self.read_required()?;
			match u {
				U_GT => {
					self.mark_content_start();
					return Ok(());
				}
				U_SLASH => {
					let u = self.read_required()?;
					if u != U_GT {
						return Err(self.error_here(XmlError::InvalidCharAfterSlash));
					}
					self.handler.on_end_tag_empty()?;
					if CHECK {
						self.scratch.pop_name();
						self.scratch.clear_lexeme();
					}
					self.mark_content_start();
					return Ok(());
				}
				u => {
					if !saw_space {
						return Err(self.error_here(XmlError::MissingWhitespace));
					}
					self.parse_attribute(u)?;
				}
			}
		}
	}

	fn parse_attribute(&mut self, first: u16) -> Result<()> {
		let name_line = self.line;
		let name_column = self.column;
		let name_mark = self.scratch.mark();
		if !self.parse_name(first)? {
			return Err(self.error_at(XmlError::InvalidAttributeName, name_line, name_column));
		}
		self.skip_whitespace()?;
		let u = self.read_required()?;
		if u != U_EQ {
			return Err(self.error_here(XmlError::MissingEquals));
		}
		self.skip_whitespace()?;
		let quote = self.read_required()?;
		if quote != U_QUOT && quote != U_APOS {
			return Err(self.error_here(XmlError::UnquotedAttributeValue));
		}
		let value_line = self.line;
		let value_column = self.column;
		let value_mark = self.scratch.mark();
		self.parse_attribute_value(quote)?;
		self.handler.on_attribute(
			self.scratch.range(name_mark, value_mark),
			self.scratch.tail(value_mark),
			name_line,
			name_column,
			value_line,
			value_column,
		)?;
		self.scratch.truncate(name_mark);
		Ok(())
	}

	/// XML 1.0 §2.3 [10] AttValue, sans the delimiters. `\r` and `\r\n`
	/// are normalised to `\n`; references are expanded in place.
	fn parse_attribute_value(&mut self, quote: u16) -> Result<()> {
		loop {
			if SIMD && self.pending.is_none() {
				while let Some(lane) = self.source.preview::<LANE_WIDTH>() {
					if !lanes::attr_value_lane(&lane, quote) {
						break;
					}
					self.scratch.push_lane(&lane);
					self.source.advance(LANE_WIDTH);
					self.column = self.column.wrapping_add(LANE_WIDTH);
				}
			}
			let u = self.read_required()?;
			if u == quote {
				return Ok(());
			}
			match u {
				U_AMP => self.parse_reference()?,
				U_LT => return Err(self.error_here(XmlError::LtInAttributeValue)),
				U_LF => {
					self.line += 1;
					self.column = usize::MAX;
					self.scratch.push(U_LF);
				}
				U_CR => {
					self.consume_after_cr()?;
					self.scratch.push(U_LF);
				}
				u if classes::is_text(u) => self.scratch.push(u),
				u if classes::is_high_surrogate(u) => {
					let low = self.read_low_surrogate()?;
					self.scratch.push(u);
					self.scratch.push(low);
				}
				u if classes::is_low_surrogate(u) => {
					return Err(self.error_here(XmlError::LoneSurrogate))
				}
				_ => return Err(self.error_here(XmlError::InvalidAttributeValueChar)),
			}
		}
	}

	fn parse_end_tag(&mut self) -> Result<()> {
		self.past_prolog = true;
		if CHECK {
			self.parse_end_tag_checked()
		} else {
			self.parse_end_tag_unchecked()
		}
	}

	/// Matched-tag mode: pop the expected name off the stack and require
	/// the source to spell exactly that name.
	fn parse_end_tag_checked(&mut self) -> Result<()> {
		let name_line = self.line;
		let name_column = self.column.wrapping_add(1);
		if !self.scratch.pop_name() {
			return Err(self.error_at(XmlError::UnmatchedEndTag, name_line, name_column));
		}
		let expected_len = self.scratch.lexeme().len();
		let mut matched = 0usize;
		while matched < expected_len {
			if SIMD && self.pending.is_none() && expected_len - matched >= LANE_WIDTH {
				let mut expect = [0u16; LANE_WIDTH];
				expect.copy_from_slice(&self.scratch.lexeme()[matched..matched + LANE_WIDTH]);
				if let Some(lane) = self.source.preview::<LANE_WIDTH>() {
					if !lanes::lanes_equal(&lane, &expect) {
						return Err(self.error_at(
							XmlError::UnmatchedEndTag,
							name_line,
							name_column,
						));
					}
					self.source.advance(LANE_WIDTH);
					self.column = self.column.wrapping_add(LANE_WIDTH);
					matched += LANE_WIDTH;
					continue;
				}
			}
			let want = self.scratch.lexeme()[matched];
			match self.read()? {
				Some(u) if u == want => matched += 1,
				Some(_) => {
					return Err(self.error_at(XmlError::UnmatchedEndTag, name_line, name_column))
				}
				None => return Err(self.error_eof()),
			}
		}
		// the name must end here; a longer name is a different element
		match self.read()? {
			Some(u) if classes::is_name(u) || classes::is_high_surrogate(u) => {
				return Err(self.error_at(XmlError::UnmatchedEndTag, name_line, name_column));
			}
			Some(u) => self.push_back(u),
			None => return Err(self.error_eof()),
		}
		self.skip_whitespace()?;
		let u = self.read_required()?;
		if u != U_GT {
			return Err(self.error_here(XmlError::InvalidEndTagName));
		}
		self.handler
			.on_end_tag(self.scratch.lexeme(), name_line, name_column)?;
		self.scratch.clear_lexeme();
		self.mark_content_start();
		Ok(())
	}

	/// Unchecked mode: parse whatever name is there and require `>`.
	fn parse_end_tag_unchecked(&mut self) -> Result<()> {
		let first = self.read_required()?;
		let name_line = self.line;
		let name_column = self.column;
		if !self.parse_name(first)? {
			return Err(self.error_at(XmlError::InvalidEndTagName, name_line, name_column));
		}
		self.skip_whitespace()?;
		let u = self.read_required()?;
		if u != U_GT {
			return Err(self.error_here(XmlError::InvalidEndTagName));
		}
		self.handler
			.on_end_tag(self.scratch.lexeme(), name_line, name_column)?;
		self.scratch.clear_lexeme();
		self.mark_content_start();
		Ok(())
	}

	// ---- directives ----

	/// Dispatch after `<!`: only comments and CDATA sections exist here.
	fn parse_directive(&mut self) -> Result<()> {
		self.past_prolog = true;
		let bang_line = self.line;
		let bang_column = self.column;
		let u = self.read_required()?;
		match u {
			U_DASH => self.parse_comment(),
			U_BRACKET_OPEN => self.parse_cdata(),
			_ => Err(self.error_at(XmlError::UnsupportedDirective, bang_line, bang_column)),
		}
	}

	/// Comment body after `<!-`. XML 1.0 §2.5: `--` may not appear except
	/// as part of the closing `-->`.
	fn parse_comment(&mut self) -> Result<()> {
		let u = self.read_required()?;
		if u != U_DASH {
			return Err(self.error_here(XmlError::MalformedCommentStart));
		}
		let body_line = self.line;
		let body_column = self.column.wrapping_add(1);
		loop {
			if SIMD && self.pending.is_none() {
				while let Some(lane) = self.source.preview::<LANE_WIDTH>() {
					if !lanes::comment_lane(&lane) {
						break;
					}
					self.scratch.push_lane(&lane);
					self.source.advance(LANE_WIDTH);
					self.column = self.column.wrapping_add(LANE_WIDTH);
				}
			}
			let u = self.read_required()?;
			match u {
				U_DASH => {
					let u = self.read_required()?;
					if u == U_DASH {
						let u = self.read_required()?;
						if u != U_GT {
							return Err(self.error_here(XmlError::DoubleDashInComment));
						}
						self.handler
							.on_comment(self.scratch.lexeme(), body_line, body_column)?;
						self.scratch.clear_lexeme();
						self.mark_content_start();
						return Ok(());
					}
					self.scratch.push(U_DASH);
					self.push_back(u);
				}
				U_LF => {
					self.line += 1;
					self.column = usize::MAX;
					self.scratch.push(U_LF);
				}
				U_CR => {
					self.scratch.push(U_CR);
					if self.consume_after_cr()? {
						self.scratch.push(U_LF);
					}
				}
				u if classes::is_char(u) => self.scratch.push(u),
				u if classes::is_high_surrogate(u) => {
					let low = self.read_low_surrogate()?;
					self.scratch.push(u);
					self.scratch.push(low);
				}
				u if classes::is_low_surrogate(u) => {
					return Err(self.error_here(XmlError::LoneSurrogate))
				}
				_ => return Err(self.error_here(XmlError::InvalidChar)),
			}
		}
	}

	/// CDATA body after `<![`. A lone or doubled `]` is literal; only the
	/// full `]]>` terminates the section.
	fn parse_cdata(&mut self) -> Result<()> {
		for &b in b"CDATA[" {
			let u = self.read_required()?;
			if u != b as u16 {
				return Err(self.error_here(XmlError::MalformedCDataStart));
			}
		}
		let body_line = self.line;
		let body_column = self.column.wrapping_add(1);
		loop {
			if SIMD && self.pending.is_none() {
				while let Some(lane) = self.source.preview::<LANE_WIDTH>() {
					if !lanes::cdata_lane(&lane) {
						break;
					}
					self.scratch.push_lane(&lane);
					self.source.advance(LANE_WIDTH);
					self.column = self.column.wrapping_add(LANE_WIDTH);
				}
			}
			let u = self.read_required()?;
			match u {
				U_BRACKET_CLOSE => {
					let mut run = 1usize;
					loop {
						let u = self.read_required()?;
						if u == U_BRACKET_CLOSE {
							run += 1;
							continue;
						}
						if u == U_GT && run >= 2 {
							// the last two `]` belong to the terminator
							for _ in 0..run - 2 {
								self.scratch.push(U_BRACKET_CLOSE);
							}
							self.handler
								.on_cdata(self.scratch.lexeme(), body_line, body_column)?;
							self.scratch.clear_lexeme();
							self.mark_content_start();
							return Ok(());
						}
						for _ in 0..run {
							self.scratch.push(U_BRACKET_CLOSE);
						}
						self.push_back(u);
						break;
					}
				}
				U_LF => {
					self.line += 1;
					self.column = usize::MAX;
					self.scratch.push(U_LF);
				}
				U_CR => {
					self.scratch.push(U_CR);
					if self.consume_after_cr()? {
						self.scratch.push(U_LF);
					}
				}
				u if classes::is_char(u) => self.scratch.push(u),
				u if classes::is_high_surrogate(u) => {
					let low = self.read_low_surrogate()?;
					self.scratch.push(u);
					self.scratch.push(low);
				}
				u if classes::is_low_surrogate(u) => {
					return Err(self.error_here(XmlError::LoneSurrogate))
				}
				_ => return Err(self.error_here(XmlError::InvalidChar)),
			}
		}
	}

	// ---- XML declaration ----

	/// `<?xml version=… (encoding=…)? (standalone=…)? ?>`, only valid
	/// before any other content.
	fn parse_declaration(&mut self) -> Result<()> {
		let decl_line = self.line;
		let decl_column = self.column;
		for &b in b"xml" {
			let u = self.read_required()?;
			if u != b as u16 {
				return Err(self.error_at(
					XmlError::UnsupportedProcessingInstruction,
					decl_line,
					decl_column,
				));
			}
		}
		// a longer target such as `xmlfoo` is a processing instruction too
		match self.read()? {
			Some(u) if classes::is_name(u) => {
				return Err(self.error_at(
					XmlError::UnsupportedProcessingInstruction,
					decl_line,
					decl_column,
				));
			}
			Some(u) => self.push_back(u),
			None => return Err(self.error_eof()),
		}
		if self.past_prolog || self.decl_seen {
			return Err(self.error_at(XmlError::DeclarationNotFirst, decl_line, decl_column));
		}
		self.decl_seen = true;

		// version is required
		let saw_space = self.skip_whitespace()?;
		let u = self.read_required()?;
		if u == U_QUESTION {
			return Err(self.error_here(XmlError::MissingVersion));
		}
		if !saw_space {
			return Err(self.error_here(XmlError::MissingWhitespace));
		}
		let kw_line = self.line;
		let kw_column = self.column;
		if self.read_decl_keyword(u)? != DeclKeyword::Version {
			return Err(self.error_at(XmlError::MissingVersion, kw_line, kw_column));
		}
		let base = self.scratch.mark();
		self.expect_eq_and_value()?;
		let version_end = self.scratch.mark();

		let mut encoding_range = (version_end, version_end);
		let mut standalone_range = (version_end, version_end);
		let mut allow_encoding = true;
		let mut allow_standalone = true;
		loop {
			let saw_space = self.skip_whitespace()?;
			let u = self.read_required()?;
			if u == U_QUESTION {
				break;
			}
			if !saw_space {
				return Err(self.error_here(XmlError::MissingWhitespace));
			}
			let kw_line = self.line;
			let kw_column = self.column;
			let kw = self.read_decl_keyword(u)?;
			match kw {
				DeclKeyword::Encoding if allow_encoding => {
					allow_encoding = false;
					let start = self.scratch.mark();
					self.expect_eq_and_value()?;
					encoding_range = (start, self.scratch.mark());
				}
				DeclKeyword::Standalone if allow_standalone => {
					allow_encoding = false;
					allow_standalone = false;
					let start = self.scratch.mark();
					self.expect_eq_and_value()?;
					standalone_range = (start, self.scratch.mark());
				}
				_ => {
					let err = if allow_encoding {
						XmlError::ExpectedEncodingOrStandalone
					} else if allow_standalone {
						XmlError::ExpectedStandalone
					} else {
						XmlError::MissingDeclarationEnd
					};
					return Err(self.error_at(err, kw_line, kw_column));
				}
			}
		}
		let u = self.read_required()?;
		if u != U_GT {
			return Err(self.error_here(XmlError::MissingDeclarationEnd));
		}
		self.handler.on_xml_declaration(
			self.scratch.range(base, version_end),
			self.scratch.range(encoding_range.0, encoding_range.1),
			self.scratch.range(standalone_range.0, standalone_range.1),
			decl_line,
			decl_column,
		)?;
		self.scratch.clear_lexeme();
		self.mark_content_start();
		Ok(())
	}

	/// Parse a pseudo-attribute keyword and classify it. The scratch
	/// cursor is left where it was.
	fn read_decl_keyword(&mut self, first: u16) -> Result<DeclKeyword> {
		let mark = self.scratch.mark();
		if !self.parse_name(first)? {
			return Ok(DeclKeyword::Other);
		}
		let kw = {
			let name = self.scratch.tail(mark);
			if units_eq(name, b"version") {
				DeclKeyword::Version
			} else if units_eq(name, b"encoding") {
				DeclKeyword::Encoding
			} else if units_eq(name, b"standalone") {
				DeclKeyword::Standalone
			} else {
				DeclKeyword::Other
			}
		};
		self.scratch.truncate(mark);
		Ok(kw)
	}

	/// `S? = S? AttValue`, shared by attributes in spirit and the XML
	/// declaration pseudo-attributes in letter.
	fn expect_eq_and_value(&mut self) -> Result<()> {
		self.skip_whitespace()?;
		let u = self.read_required()?;
		if u != U_EQ {
			return Err(self.error_here(XmlError::MissingEquals));
		}
		self.skip_whitespace()?;
		let quote = self.read_required()?;
		if quote != U_QUOT && quote != U_APOS {
			return Err(self.error_here(XmlError::UnquotedAttributeValue));
		}
		self.parse_attribute_value(quote)
	}

	// ---- references ----

	/// Decode a reference after `&` into the scratch lexeme.
	fn parse_reference(&mut self) -> Result<()> {
		let u = self.read_required()?;
		if u == U_HASH {
			let u = self.read_required()?;
			if u == U_LOWER_X {
				self.parse_char_reference(16)
			} else {
				self.push_back(u);
				self.parse_char_reference(10)
			}
		} else {
			self.parse_entity_reference(u)
		}
	}

	fn parse_char_reference(&mut self, radix: u32) -> Result<()> {
		let digit_error = if radix == 16 {
			XmlError::InvalidHexDigit
		} else {
			XmlError::InvalidDecDigit
		};
		let mut value: u32 = 0;
		let mut any = false;
		loop {
			let u = self.read_required()?;
			if u == U_SEMICOLON {
				if !any {
					return Err(self.error_here(digit_error));
				}
				break;
			}
			let digit = if radix == 16 {
				hex_digit_value(u)
			} else {
				dec_digit_value(u)
			};
			match digit {
				Some(d) => {
					any = true;
					// saturating: anything past the plane limit fails the
					// scalar check below anyway
					value = value.saturating_mul(radix).saturating_add(d);
				}
				None => return Err(self.error_here(digit_error)),
			}
		}
		if value > 0x10ffff || (0xd800..=0xdfff).contains(&value) {
			return Err(self.error_here(XmlError::InvalidChar));
		}
		if value < 0x10000 {
			self.scratch.push(value as u16);
		} else {
			let v = value - 0x10000;
			self.scratch.push(0xd800 + (v >> 10) as u16);
			self.scratch.push(0xdc00 + (v & 0x3ff) as u16);
		}
		Ok(())
	}

	fn parse_entity_reference(&mut self, first: u16) -> Result<()> {
		// longest predefined entity name is four units
		let mut name = [0u16; 4];
		let mut len = 0usize;
		let mut u = first;
		loop {
			if u == U_SEMICOLON {
				break;
			}
			if !classes::is_name(u) {
				return Err(self.error_here(XmlError::MissingSemicolon));
			}
			if len == name.len() {
				return Err(self.error_here(XmlError::UnknownEntity));
			}
			name[len] = u;
			len += 1;
			u = self.read_required()?;
		}
		match predefined_entity(&name[..len]) {
			Some(decoded) => {
				self.scratch.push(decoded);
				Ok(())
			}
			None => Err(self.error_here(XmlError::UnknownEntity)),
		}
	}

	// ---- end of input ----

	/// Report every element left open at a clean end of input, innermost
	/// first.
	fn report_unclosed(&mut self) -> Result<()> {
		if !CHECK {
			return Ok(());
		}
		let line = self.line;
		let column = self.column.wrapping_add(1);
		while self.scratch.pop_name() {
			let name = {
				let units = self.scratch.lexeme();
				let s: String = char::decode_utf16(units.iter().copied())
					.map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
					.collect();
				SmartString::from(s.as_str())
			};
			self.scratch.clear_lexeme();
			self.handler
				.on_error(&XmlError::UnclosedElement(name), line, column)?;
		}
		Ok(())
	}
}

#[inline]
fn dec_digit_value(u: u16) -> Option<u32> {
	if classes::is_dec_digit(u) {
		Some((u - b'0' as u16) as u32)
	} else {
		None
	}
}

#[inline]
fn hex_digit_value(u: u16) -> Option<u32> {
	match u {
		_ if classes::is_dec_digit(u) => Some((u - b'0' as u16) as u32),
		u if (b'a' as u16..=b'f' as u16).contains(&u) => Some((u - b'a' as u16 + 10) as u32),
		u if (b'A' as u16..=b'F' as u16).contains(&u) => Some((u - b'A' as u16 + 10) as u32),
		_ => None,
	}
}
