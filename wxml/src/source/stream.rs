/*!
# Byte-stream character source

Wraps a [`std::io::Read`], sniffs the encoding from the stream head, and
decodes refill-sized chunks into an internal code-unit buffer from which
the parser reads.
*/
use std::io;

use bytes::{Buf, BytesMut};

use super::encoding::{decode_step, detect, Encoding};
use super::UnitRead;
use crate::error::Result;

const REFILL_CHUNK: usize = 4096;

/**
# Character source backed by a byte stream

On construction the first four bytes are peeked and matched against the
BOM/heuristic table of XML 1.0 Appendix F; a caller-supplied encoding
override takes precedence over detection (a BOM matching the override is
still skipped). Decoded code units accumulate in an internal buffer; the
undecoded byte tail of each refill is carried over into the next one.

[`UnitRead::preview`] never refills: it declines once the decoded buffer
holds fewer than `N` units, even if the underlying stream could still
yield more. The parser then falls back to scalar reads, which do refill.
*/
pub struct DecodingSource<R: io::Read> {
	inner: R,
	encoding: Encoding,
	bytes: BytesMut,
	units: Vec<u16>,
	pos: usize,
	eof: bool,
}

impl<R: io::Read> DecodingSource<R> {
	/// Construct a source, sniffing the encoding from the stream head.
	pub fn new(inner: R) -> Result<Self> {
		Self::with_encoding(inner, None)
	}

	/// Construct a source with an optional encoding override.
	pub fn with_encoding(mut inner: R, enc: Option<Encoding>) -> Result<Self> {
		let mut head = [0u8; 4];
		let mut have = 0usize;
		let mut eof = false;
		while have < head.len() {
			match inner.read(&mut head[have..])? {
				0 => {
					eof = true;
					break;
				}
				n => have += n,
			}
		}
		let head = &head[..have];
		let (encoding, skip) = match enc {
			Some(enc) => {
				let bom = enc.bom();
				let skip = if head.starts_with(bom) { bom.len() } else { 0 };
				(enc, skip)
			}
			None => detect(head),
		};
		let mut bytes = BytesMut::with_capacity(REFILL_CHUNK);
		bytes.extend_from_slice(&head[skip..]);
		Ok(Self {
			inner,
			encoding,
			bytes,
			units: Vec::with_capacity(REFILL_CHUNK),
			pos: 0,
			eof,
		})
	}

	/// The encoding this source committed to.
	pub fn encoding(&self) -> Encoding {
		self.encoding
	}

	/// Read one chunk from the stream and decode whatever byte prefix is
	/// complete. Consumed units are compacted away first.
	fn refill(&mut self) -> Result<()> {
		if self.pos > 0 {
			self.units.drain(..self.pos);
			self.pos = 0;
		}
		if !self.eof {
			let mut chunk = [0u8; REFILL_CHUNK];
			match self.inner.read(&mut chunk)? {
				0 => self.eof = true,
				n => self.bytes.extend_from_slice(&chunk[..n]),
			}
		}
		let consumed = decode_step(
			self.encoding,
			&self.bytes,
			self.eof,
			&mut self.units,
		)?;
		self.bytes.advance(consumed);
		Ok(())
	}
}

impl<R: io::Read> UnitRead for DecodingSource<R> {
	fn read_one(&mut self) -> Result<Option<u16>> {
		loop {
			if let Some(&u) = self.units.get(self.pos) {
				self.pos += 1;
				return Ok(Some(u));
			}
			if self.eof && self.bytes.is_empty() {
				return Ok(None);
			}
			self.refill()?;
		}
	}

	fn preview<const N: usize>(&mut self) -> Option<[u16; N]> {
		let rest = &self.units[self.pos..];
		if rest.len() < N {
			return None;
		}
		let mut lane = [0u16; N];
		lane.copy_from_slice(&rest[..N]);
		Some(lane)
	}

	fn advance(&mut self, n: usize) {
		debug_assert!(self.pos + n <= self.units.len());
		self.pos += n;
	}
}
