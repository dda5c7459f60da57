/*!
# Character sources

A character source supplies the parser with UTF-16 code units, one at a
time through [`UnitRead::read_one`] and, optionally, in fixed-width lanes
through [`UnitRead::preview`] for the vectorised fast paths.

Two sources are provided: [`BufferSource`] over an in-memory unit slice
and [`DecodingSource`] over a byte stream with encoding detection.
*/

mod encoding;
mod stream;

pub use encoding::Encoding;
pub use stream::DecodingSource;

use crate::error::Result;

/**
# Source of UTF-16 code units

The contract between the parser and its input:

* [`Self::read_one`] consumes and returns the next code unit, or `None` at
  the end of the stream.
* [`Self::preview`] returns the next `N` code units without consuming
  them, but only if at least `N` are available right now. A `None` does
  **not** imply the end of the stream; a source may decline near a buffer
  boundary even though more data exists, and an implementation is free to
  always decline, which forces the caller onto the scalar path.
* [`Self::advance`] skips exactly `n` code units previously returned by
  `preview`.

No code unit is ever skipped or duplicated: interleavings of `read_one`
and `preview`/`advance` observe one contiguous stream.
*/
pub trait UnitRead {
	/// Consume and return the next code unit.
	fn read_one(&mut self) -> Result<Option<u16>>;

	/// Return the next `N` code units without consuming them, if that
	/// many are currently available.
	fn preview<const N: usize>(&mut self) -> Option<[u16; N]>;

	/// Consume `n` code units previously returned by [`Self::preview`].
	fn advance(&mut self, n: usize);
}

/// Character source backed by a contiguous, already-decoded unit buffer.
///
/// Never blocks and never fails; `preview` succeeds whenever enough units
/// remain.
pub struct BufferSource<'a> {
	units: &'a [u16],
	pos: usize,
}

impl<'a> BufferSource<'a> {
	pub fn new(units: &'a [u16]) -> Self {
		Self { units, pos: 0 }
	}
}

impl<'a> UnitRead for BufferSource<'a> {
	#[inline(always)]
	fn read_one(&mut self) -> Result<Option<u16>> {
		match self.units.get(self.pos) {
			Some(&u) => {
				self.pos += 1;
				Ok(Some(u))
			}
			None => Ok(None),
		}
	}

	#[inline(always)]
	fn preview<const N: usize>(&mut self) -> Option<[u16; N]> {
		let rest = &self.units[self.pos..];
		if rest.len() < N {
			return None;
		}
		let mut lane = [0u16; N];
		lane.copy_from_slice(&rest[..N]);
		Some(lane)
	}

	#[inline(always)]
	fn advance(&mut self, n: usize) {
		debug_assert!(self.pos + n <= self.units.len());
		self.pos += n;
	}
}
