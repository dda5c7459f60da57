use std::io;

use wxml::{parse_reader, Error, Handler, Options, Result, XmlError};

/// Print one line per event, with its position.
struct Dump;

fn s(units: &[u16]) -> String {
	String::from_utf16_lossy(units)
}

impl Handler for Dump {
	fn on_xml_declaration(
		&mut self,
		version: &[u16],
		encoding: &[u16],
		standalone: &[u16],
		line: usize,
		column: usize,
	) -> Result<()> {
		println!(
			"{}:{} xml-declaration version={:?} encoding={:?} standalone={:?}",
			line,
			column,
			s(version),
			s(encoding),
			s(standalone)
		);
		Ok(())
	}

	fn on_begin_tag(&mut self, name: &[u16], line: usize, column: usize) -> Result<()> {
		println!("{}:{} begin-tag {}", line, column, s(name));
		Ok(())
	}

	fn on_end_tag_empty(&mut self) -> Result<()> {
		println!("    end-tag-empty");
		Ok(())
	}

	fn on_end_tag(&mut self, name: &[u16], line: usize, column: usize) -> Result<()> {
		println!("{}:{} end-tag {}", line, column, s(name));
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
		println!(
			"{}:{} attribute {}={:?}",
			name_line,
			name_column,
			s(name),
			s(value)
		);
		Ok(())
	}

	fn on_text(&mut self, text: &[u16], line: usize, column: usize) -> Result<()> {
		println!("{}:{} text {:?}", line, column, s(text));
		Ok(())
	}

	fn on_comment(&mut self, body: &[u16], line: usize, column: usize) -> Result<()> {
		println!("{}:{} comment {:?}", line, column, s(body));
		Ok(())
	}

	fn on_cdata(&mut self, body: &[u16], line: usize, column: usize) -> Result<()> {
		println!("{}:{} cdata {:?}", line, column, s(body));
		Ok(())
	}

	fn on_error(&mut self, err: &XmlError, line: usize, column: usize) -> Result<()> {
		println!("{}:{} error {}", line, column, err);
		Ok(())
	}
}

fn main() {
	let stdin = io::BufReader::new(io::stdin());
	match parse_reader(stdin, &mut Dump, &Options::default()) {
		Ok(()) => (),
		Err(Error::Io(e)) => panic!("I/O error: {}", e),
		Err(e) => panic!("invalid XML on input: {}", e),
	}
}
