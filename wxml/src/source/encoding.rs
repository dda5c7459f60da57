/*!
# Encodings and stream-head detection

Implements the encoding sniffing of XML 1.0 Appendix F over the first four
bytes of a stream, and the incremental byte-to-code-unit decoders used by
[`DecodingSource`](super::DecodingSource).
*/
use std::io;

use crate::error::{Error, Result};

/// Character encodings recognised on byte streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
	Utf8,
	Utf16Le,
	Utf16Be,
	Utf32Le,
	Utf32Be,
}

impl Encoding {
	/// IANA-style name, for diagnostics.
	pub fn name(&self) -> &'static str {
		match self {
			Self::Utf8 => "UTF-8",
			Self::Utf16Le => "UTF-16LE",
			Self::Utf16Be => "UTF-16BE",
			Self::Utf32Le => "UTF-32LE",
			Self::Utf32Be => "UTF-32BE",
		}
	}

	/// The byte-order mark for this encoding.
	pub(crate) fn bom(&self) -> &'static [u8] {
		match self {
			Self::Utf8 => &[0xef, 0xbb, 0xbf],
			Self::Utf16Le => &[0xff, 0xfe],
			Self::Utf16Be => &[0xfe, 0xff],
			Self::Utf32Le => &[0xff, 0xfe, 0x00, 0x00],
			Self::Utf32Be => &[0x00, 0x00, 0xfe, 0xff],
		}
	}
}

/// Inspect up to four leading bytes and commit to an encoding.
///
/// Returns the encoding and the number of BOM bytes to skip. BOM matches
/// win over the BOM-less `<?xm` patterns; the UTF-32 BOMs are checked
/// before the UTF-16 ones because they share a prefix. No match defaults
/// to UTF-8 with nothing skipped.
pub(crate) fn detect(head: &[u8]) -> (Encoding, usize) {
	if head.starts_with(&[0xff, 0xfe, 0x00, 0x00]) {
		return (Encoding::Utf32Le, 4);
	}
	if head.starts_with(&[0x00, 0x00, 0xfe, 0xff]) {
		return (Encoding::Utf32Be, 4);
	}
	if head.starts_with(&[0xef, 0xbb, 0xbf]) {
		return (Encoding::Utf8, 3);
	}
	if head.starts_with(&[0xff, 0xfe]) {
		return (Encoding::Utf16Le, 2);
	}
	if head.starts_with(&[0xfe, 0xff]) {
		return (Encoding::Utf16Be, 2);
	}
	// BOM-less: the first four bytes of `<?xm` in each encoding
	match head {
		[0x00, 0x00, 0x00, 0x3c, ..] => (Encoding::Utf32Be, 0),
		[0x3c, 0x00, 0x00, 0x00, ..] => (Encoding::Utf32Le, 0),
		[0x00, 0x3c, 0x00, 0x3f, ..] => (Encoding::Utf16Be, 0),
		[0x3c, 0x00, 0x3f, 0x00, ..] => (Encoding::Utf16Le, 0),
		_ => (Encoding::Utf8, 0),
	}
}

fn truncated() -> Error {
	Error::io(io::Error::new(
		io::ErrorKind::UnexpectedEof,
		"truncated code unit at end of stream",
	))
}

#[inline]
fn push_scalar(cp: u32, out: &mut Vec<u16>) {
	if cp < 0x10000 {
		out.push(cp as u16);
	} else {
		let v = cp - 0x10000;
		out.push(0xd800 + (v >> 10) as u16);
		out.push(0xdc00 + (v & 0x3ff) as u16);
	}
}

/// Decode as many complete code units from `input` as possible, appending
/// them to `out`.
///
/// Returns the number of bytes consumed. An incomplete trailing sequence
/// is left unconsumed unless `eof` is set, in which case it is an error.
pub(crate) fn decode_step(
	enc: Encoding,
	input: &[u8],
	eof: bool,
	out: &mut Vec<u16>,
) -> Result<usize> {
	match enc {
		Encoding::Utf8 => decode_utf8(input, eof, out),
		Encoding::Utf16Le => decode_utf16(input, eof, out, u16::from_le_bytes),
		Encoding::Utf16Be => decode_utf16(input, eof, out, u16::from_be_bytes),
		Encoding::Utf32Le => decode_utf32(input, eof, out, u32::from_le_bytes),
		Encoding::Utf32Be => decode_utf32(input, eof, out, u32::from_be_bytes),
	}
}

/// The continuation-byte range admitted after a given lead byte, per the
/// shortest-form rules of RFC 3629 (rejects overlong forms and encoded
/// surrogates).
#[inline]
fn second_byte_range(lead: u8) -> (u8, u8) {
	match lead {
		0xe0 => (0xa0, 0xbf),
		0xed => (0x80, 0x9f),
		0xf0 => (0x90, 0xbf),
		0xf4 => (0x80, 0x8f),
		_ => (0x80, 0xbf),
	}
}

fn decode_utf8(input: &[u8], eof: bool, out: &mut Vec<u16>) -> Result<usize> {
	let mut pos = 0usize;
	while pos < input.len() {
		let lead = input[pos];
		let need = match lead {
			0x00..=0x7f => {
				out.push(lead as u16);
				pos += 1;
				continue;
			}
			0xc2..=0xdf => 2,
			0xe0..=0xef => 3,
			0xf0..=0xf4 => 4,
			_ => return Err(Error::InvalidUtf8Byte(lead)),
		};
		if input.len() - pos < need {
			if eof {
				return Err(truncated());
			}
			break;
		}
		let tail = &input[pos + 1..pos + need];
		let (lo, hi) = second_byte_range(lead);
		if tail[0] < lo || tail[0] > hi {
			return Err(Error::InvalidUtf8Byte(tail[0]));
		}
		for &b in &tail[1..] {
			if !(0x80..=0xbf).contains(&b) {
				return Err(Error::InvalidUtf8Byte(b));
			}
		}
		let cp = match need {
			2 => ((lead as u32 & 0x1f) << 6) | (tail[0] as u32 & 0x3f),
			3 => {
				((lead as u32 & 0x0f) << 12)
					| ((tail[0] as u32 & 0x3f) << 6)
					| (tail[1] as u32 & 0x3f)
			}
			_ => {
				((lead as u32 & 0x07) << 18)
					| ((tail[0] as u32 & 0x3f) << 12)
					| ((tail[1] as u32 & 0x3f) << 6)
					| (tail[2] as u32 & 0x3f)
			}
		};
		push_scalar(cp, out);
		pos += need;
	}
	Ok(pos)
}

fn decode_utf16(
	input: &[u8],
	eof: bool,
	out: &mut Vec<u16>,
	combine: fn([u8; 2]) -> u16,
) -> Result<usize> {
	let mut pos = 0usize;
	while input.len() - pos >= 2 {
		out.push(combine([input[pos], input[pos + 1]]));
		pos += 2;
	}
	if eof && pos < input.len() {
		return Err(truncated());
	}
	Ok(pos)
}

fn decode_utf32(
	input: &[u8],
	eof: bool,
	out: &mut Vec<u16>,
	combine: fn([u8; 4]) -> u32,
) -> Result<usize> {
	let mut pos = 0usize;
	while input.len() - pos >= 4 {
		let cp = combine([input[pos], input[pos + 1], input[pos + 2], input[pos + 3]]);
		if cp > 0x10ffff || (0xd800..=0xdfff).contains(&cp) {
			return Err(Error::InvalidCodepoint(cp));
		}
		push_scalar(cp, out);
		pos += 4;
	}
	if eof && pos < input.len() {
		return Err(truncated());
	}
	Ok(pos)
}
