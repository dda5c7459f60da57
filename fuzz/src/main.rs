#[macro_use]
extern crate afl;
extern crate wxml;

use wxml::{parse_reader, parse_units, Handler, Options, Result, XmlError};

/// Flat, owned transcript of a parse, comparable across configurations.
#[derive(Default, Debug, PartialEq)]
struct Transcript {
	events: Vec<(u8, Vec<u16>, usize, usize)>,
}

impl Handler for Transcript {
	fn on_xml_declaration(
		&mut self,
		version: &[u16],
		_encoding: &[u16],
		_standalone: &[u16],
		line: usize,
		column: usize,
	) -> Result<()> {
		self.events.push((0, version.to_vec(), line, column));
		Ok(())
	}

	fn on_begin_tag(&mut self, name: &[u16], line: usize, column: usize) -> Result<()> {
		self.events.push((1, name.to_vec(), line, column));
		Ok(())
	}

	fn on_end_tag_empty(&mut self) -> Result<()> {
		self.events.push((2, Vec::new(), 0, 0));
		Ok(())
	}

	fn on_end_tag(&mut self, name: &[u16], line: usize, column: usize) -> Result<()> {
		self.events.push((3, name.to_vec(), line, column));
		Ok(())
	}

	fn on_attribute(
		&mut self,
		name: &[u16],
		value: &[u16],
		name_line: usize,
		name_column: usize,
		_value_line: usize,
		_value_column: usize,
	) -> Result<()> {
		let mut payload = name.to_vec();
		payload.push(b'=' as u16);
		payload.extend_from_slice(value);
		self.events.push((4, payload, name_line, name_column));
		Ok(())
	}

	fn on_text(&mut self, text: &[u16], line: usize, column: usize) -> Result<()> {
		self.events.push((5, text.to_vec(), line, column));
		Ok(())
	}

	fn on_comment(&mut self, body: &[u16], line: usize, column: usize) -> Result<()> {
		self.events.push((6, body.to_vec(), line, column));
		Ok(())
	}

	fn on_cdata(&mut self, body: &[u16], line: usize, column: usize) -> Result<()> {
		self.events.push((7, body.to_vec(), line, column));
		Ok(())
	}

	fn on_error(&mut self, err: &XmlError, line: usize, column: usize) -> Result<()> {
		self.events
			.push((8, err.to_string().encode_utf16().collect(), line, column));
		Ok(())
	}
}

fn parse_stream(data: &[u8], use_simd: bool) -> Option<Transcript> {
	let mut transcript = Transcript::default();
	let opts = Options {
		use_simd,
		..Options::default()
	};
	match parse_reader(data, &mut transcript, &opts) {
		Ok(()) => Some(transcript),
		// decode-level failures depend on the byte stream, not the parser
		Err(_) => None,
	}
}

fn parse_buffer(units: &[u16], use_simd: bool) -> Transcript {
	let mut transcript = Transcript::default();
	let opts = Options {
		use_simd,
		..Options::default()
	};
	parse_units(units, &mut transcript, &opts).expect("recorder swallows all parse errors");
	transcript
}

fn main() {
	fuzz!(|data: &[u8]| {
		// the vectorised fast paths must never change the event sequence
		let simd = parse_stream(data, true);
		let scalar = parse_stream(data, false);
		if simd != scalar {
			panic!("event sequence depends on use_simd");
		}

		// raw UTF-16 units exercise the surrogate handling without the
		// decoder in the way
		let units: Vec<u16> = data
			.chunks_exact(2)
			.map(|c| u16::from_le_bytes([c[0], c[1]]))
			.collect();
		let simd = parse_buffer(&units, true);
		let scalar = parse_buffer(&units, false);
		if simd != scalar {
			panic!("event sequence depends on use_simd for unit buffers");
		}
	});
}
