use super::*;

// The components are tested in their modules; the tests here drive the
// whole crate through the public entry points and pin down the observable
// event sequences, including positions.

/// Encode a &str as UTF-16 code units.
pub(crate) fn u16s(s: &str) -> Vec<u16> {
	s.encode_utf16().collect()
}

/// Owned copy of one parse event, for comparisons.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Ev {
	Decl {
		version: String,
		encoding: String,
		standalone: String,
		line: usize,
		column: usize,
	},
	Begin {
		name: String,
		line: usize,
		column: usize,
	},
	EndEmpty,
	End {
		name: String,
		line: usize,
		column: usize,
	},
	Attr {
		name: String,
		value: String,
		name_pos: (usize, usize),
		value_pos: (usize, usize),
	},
	Text {
		text: String,
		line: usize,
		column: usize,
	},
	Comment {
		body: String,
		line: usize,
		column: usize,
	},
	CData {
		body: String,
		line: usize,
		column: usize,
	},
	Error {
		message: String,
		line: usize,
		column: usize,
	},
}

impl Ev {
	pub fn decl(version: &str, encoding: &str, standalone: &str, line: usize, column: usize) -> Ev {
		Ev::Decl {
			version: version.into(),
			encoding: encoding.into(),
			standalone: standalone.into(),
			line,
			column,
		}
	}

	pub fn begin(name: &str, line: usize, column: usize) -> Ev {
		Ev::Begin {
			name: name.into(),
			line,
			column,
		}
	}

	pub fn end(name: &str, line: usize, column: usize) -> Ev {
		Ev::End {
			name: name.into(),
			line,
			column,
		}
	}

	pub fn attr(name: &str, value: &str, name_pos: (usize, usize), value_pos: (usize, usize)) -> Ev {
		Ev::Attr {
			name: name.into(),
			value: value.into(),
			name_pos,
			value_pos,
		}
	}

	pub fn text(text: &str, line: usize, column: usize) -> Ev {
		Ev::Text {
			text: text.into(),
			line,
			column,
		}
	}

	pub fn comment(body: &str, line: usize, column: usize) -> Ev {
		Ev::Comment {
			body: body.into(),
			line,
			column,
		}
	}

	pub fn cdata(body: &str, line: usize, column: usize) -> Ev {
		Ev::CData {
			body: body.into(),
			line,
			column,
		}
	}

	pub fn error(message: &str, line: usize, column: usize) -> Ev {
		Ev::Error {
			message: message.into(),
			line,
			column,
		}
	}
}

fn owned(units: &[u16]) -> String {
	String::from_utf16(units).expect("parser emitted malformed UTF-16")
}

/// Handler which records every event and swallows errors, so that event
/// sequences around errors stay observable.
pub(crate) struct Recorder {
	pub events: Vec<Ev>,
}

impl Recorder {
	pub fn new() -> Self {
		Self { events: Vec::new() }
	}
}

impl Handler for Recorder {
	fn on_xml_declaration(
		&mut self,
		version: &[u16],
		encoding: &[u16],
		standalone: &[u16],
		line: usize,
		column: usize,
	) -> Result<()> {
		self.events.push(Ev::Decl {
			version: owned(version),
			encoding: owned(encoding),
			standalone: owned(standalone),
			line,
			column,
		});
		Ok(())
	}

	fn on_begin_tag(&mut self, name: &[u16], line: usize, column: usize) -> Result<()> {
		self.events.push(Ev::Begin {
			name: owned(name),
			line,
			column,
		});
		Ok(())
	}

	fn on_end_tag_empty(&mut self) -> Result<()> {
		self.events.push(Ev::EndEmpty);
		Ok(())
	}

	fn on_end_tag(&mut self, name: &[u16], line: usize, column: usize) -> Result<()> {
		self.events.push(Ev::End {
			name: owned(name),
			line,
			column,
		});
		Ok(())
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
		self.events.push(Ev::Attr {
			name: owned(name),
			value: owned(value),
			name_pos: (name_line, name_column),
			value_pos: (value_line, value_column),
		});
		Ok(())
	}

	fn on_text(&mut self, text: &[u16], line: usize, column: usize) -> Result<()> {
		self.events.push(Ev::Text {
			text: owned(text),
			line,
			column,
		});
		Ok(())
	}

	fn on_comment(&mut self, body: &[u16], line: usize, column: usize) -> Result<()> {
		self.events.push(Ev::Comment {
			body: owned(body),
			line,
			column,
		});
		Ok(())
	}

	fn on_cdata(&mut self, body: &[u16], line: usize, column: usize) -> Result<()> {
		self.events.push(Ev::CData {
			body: owned(body),
			line,
			column,
		});
		Ok(())
	}

	fn on_error(&mut self, err: &XmlError, line: usize, column: usize) -> Result<()> {
		self.events.push(Ev::Error {
			message: err.to_string(),
			line,
			column,
		});
		Ok(())
	}
}

fn record(doc: &str, options: &Options) -> (Vec<Ev>, Result<()>) {
	let mut rec = Recorder::new();
	let result = parse_str(doc, &mut rec, options);
	(rec.events, result)
}

fn record_default(doc: &str) -> Vec<Ev> {
	let (events, result) = record(doc, &Options::default());
	assert!(result.is_ok(), "unexpected failure: {:?}", result);
	events
}

// ---- whole-document event sequences ----

#[test]
fn declaration_root_attribute_text() {
	let evs = record_default("<?xml version=\"1.0\"?><root enabled=\"true\">Hello World!</root>");
	assert_eq!(
		evs,
		vec![
			Ev::decl("1.0", "", "", 0, 1),
			Ev::begin("root", 0, 22),
			Ev::attr("enabled", "true", (0, 27), (0, 35)),
			Ev::text("Hello World!", 0, 42),
			Ev::end("root", 0, 56),
		]
	);
}

#[test]
fn empty_element() {
	let evs = record_default("<a/>");
	assert_eq!(evs, vec![Ev::begin("a", 0, 1), Ev::EndEmpty]);
}

#[test]
fn references_in_text() {
	let evs = record_default("<a>&lt;&#65;&#x4e;</a>");
	assert_eq!(
		evs,
		vec![
			Ev::begin("a", 0, 1),
			Ev::text("<AN", 0, 3),
			Ev::end("a", 0, 20),
		]
	);
}

#[test]
fn unclosed_element_at_eof() {
	let evs = record_default("<a>");
	assert_eq!(
		evs,
		vec![
			Ev::begin("a", 0, 1),
			Ev::error("Invalid tag a not closed at the end of the document.", 0, 3),
		]
	);
}

#[test]
fn mismatched_end_tag() {
	let evs = record_default("<a></b>");
	assert_eq!(
		evs,
		vec![
			Ev::begin("a", 0, 1),
			Ev::error("Invalid end tag. No matching start tag found", 0, 5),
		]
	);
}

#[test]
fn comment_with_single_dashes() {
	let evs = record_default("<!-- a - b -->");
	assert_eq!(evs, vec![Ev::comment(" a - b ", 0, 4)]);
}

#[test]
fn nested_elements_nest_in_document_order() {
	let evs = record_default("<a><b>x</b><c/>y</a>");
	assert_eq!(
		evs,
		vec![
			Ev::begin("a", 0, 1),
			Ev::begin("b", 0, 5),
			Ev::text("x", 0, 6),
			Ev::end("b", 0, 9),
			Ev::begin("c", 0, 12),
			Ev::EndEmpty,
			Ev::text("y", 0, 15),
			Ev::end("a", 0, 18),
		]
	);
}

#[test]
fn multiple_attributes_and_both_quote_kinds() {
	let evs = record_default("<a one=\"1\" two='2'/>");
	assert_eq!(
		evs,
		vec![
			Ev::begin("a", 0, 1),
			Ev::attr("one", "1", (0, 3), (0, 7)),
			Ev::attr("two", "2", (0, 11), (0, 15)),
			Ev::EndEmpty,
		]
	);
}

#[test]
fn quotes_nest_inside_the_other_kind() {
	let evs = record_default("<a q=\"it's\" p='say \"hi\"'/>");
	assert_eq!(
		evs,
		vec![
			Ev::begin("a", 0, 1),
			Ev::attr("q", "it's", (0, 3), (0, 5)),
			Ev::attr("p", "say \"hi\"", (0, 12), (0, 14)),
			Ev::EndEmpty,
		]
	);
}

#[test]
fn cdata_section() {
	let evs = record_default("<a><![CDATA[x <&> y]]></a>");
	assert_eq!(
		evs,
		vec![
			Ev::begin("a", 0, 1),
			Ev::cdata("x <&> y", 0, 12),
			Ev::end("a", 0, 24),
		]
	);
}

#[test]
fn cdata_keeps_stray_brackets() {
	let evs = record_default("<a><![CDATA[a]] b]]></a>");
	assert_eq!(evs[1], Ev::cdata("a]] b", 0, 12));
	let evs = record_default("<a><![CDATA[x]]]></a>");
	assert_eq!(evs[1], Ev::cdata("x]", 0, 12));
}

#[test]
fn empty_cdata_and_empty_comment() {
	let evs = record_default("<a><![CDATA[]]><!----></a>");
	assert_eq!(
		evs,
		vec![
			Ev::begin("a", 0, 1),
			Ev::cdata("", 0, 12),
			Ev::comment("", 0, 19),
			Ev::end("a", 0, 24),
		]
	);
}

// ---- XML declaration ----

#[test]
fn declaration_with_encoding_and_standalone() {
	let evs = record_default("<?xml version='1.0' encoding='UTF-8' standalone='yes'?><a/>");
	assert_eq!(evs[0], Ev::decl("1.0", "UTF-8", "yes", 0, 1));
}

#[test]
fn declaration_standalone_without_encoding() {
	let evs = record_default("<?xml version='1.0' standalone='no'?><a/>");
	assert_eq!(evs[0], Ev::decl("1.0", "", "no", 0, 1));
}

#[test]
fn declaration_accepts_whitespace_around_eq() {
	let evs = record_default("<?xml version = '1.0' standalone =\t'no' ?><a/>");
	assert_eq!(evs[0], Ev::decl("1.0", "", "no", 0, 1));
}

#[test]
fn declaration_after_leading_whitespace_only() {
	let evs = record_default(" \n<?xml version='1.0'?><a/>");
	assert_eq!(evs[0], Ev::decl("1.0", "", "", 1, 1));
}

#[test]
fn declaration_after_content_is_an_error() {
	let (evs, _) = record("<a/><?xml version='1.0'?>", &Options::default());
	assert_eq!(
		evs.last().unwrap(),
		&Ev::error(
			"XML declaration is only allowed at the very beginning of the document.",
			0,
			5
		)
	);
}

#[test]
fn second_declaration_is_an_error() {
	let (evs, _) = record(
		"<?xml version='1.0'?><?xml version='1.0'?><a/>",
		&Options::default(),
	);
	assert_eq!(
		evs.last().unwrap(),
		&Ev::error(
			"XML declaration is only allowed at the very beginning of the document.",
			0,
			22
		)
	);
}

#[test]
fn processing_instructions_are_rejected() {
	let (evs, _) = record("<?foo bar?>", &Options::default());
	assert_eq!(evs, vec![Ev::error("Expecting '<?xml'.", 0, 1)]);
	let (evs, _) = record("<a><?php echo; ?></a>", &Options::default());
	assert_eq!(
		evs,
		vec![Ev::begin("a", 0, 1), Ev::error("Expecting '<?xml'.", 0, 4)]
	);
	// a longer name with the `xml` prefix is still a PI
	let (evs, _) = record("<?xmlfoo?>", &Options::default());
	assert_eq!(evs, vec![Ev::error("Expecting '<?xml'.", 0, 1)]);
}

#[test]
fn declaration_without_version_is_an_error() {
	let (evs, _) = record("<?xml?><a/>", &Options::default());
	assert_eq!(
		evs,
		vec![Ev::error("Expecting 'version' in XML declaration.", 0, 5)]
	);
	let (evs, _) = record("<?xml encoding='UTF-8'?><a/>", &Options::default());
	assert_eq!(
		evs,
		vec![Ev::error("Expecting 'version' in XML declaration.", 0, 6)]
	);
}

#[test]
fn declaration_rejects_out_of_order_keywords() {
	let (evs, _) = record(
		"<?xml version='1.0' standalone='no' encoding='UTF-8'?><a/>",
		&Options::default(),
	);
	assert_eq!(
		evs,
		vec![Ev::error(
			"Expecting '?>' to terminate the XML declaration.",
			0,
			36
		)]
	);
}

// ---- directives ----

#[test]
fn doctype_is_unsupported() {
	let (evs, _) = record("<!DOCTYPE html><a/>", &Options::default());
	assert_eq!(
		evs,
		vec![Ev::error(
			"Unsupported '<!' directive; expecting a comment or a CDATA section.",
			0,
			1
		)]
	);
}

#[test]
fn double_dash_inside_comment_is_an_error() {
	let (evs, _) = record("<!-- a -- b -->", &Options::default());
	assert_eq!(
		evs,
		vec![Ev::error("Expecting '>' after '--' in a comment.", 0, 9)]
	);
}

#[test]
fn malformed_cdata_start() {
	let (evs, _) = record("<a><![CDAT[x]]></a>", &Options::default());
	assert_eq!(evs[1], Ev::error("Expecting '<![CDATA['.", 0, 10));
}

// ---- line breaks ----

#[test]
fn text_keeps_raw_line_endings_and_counts_lines() {
	let evs = record_default("<a>x\r\ny\rz</a>");
	assert_eq!(
		evs,
		vec![
			Ev::begin("a", 0, 1),
			Ev::text("x\r\ny\rz", 0, 3),
			Ev::end("a", 2, 3),
		]
	);
}

#[test]
fn cr_cr_lf_counts_two_line_breaks() {
	let evs = record_default("<a>\r\r\nx</a>");
	assert_eq!(
		evs,
		vec![
			Ev::begin("a", 0, 1),
			Ev::text("\r\r\nx", 0, 3),
			Ev::end("a", 2, 3),
		]
	);
}

#[test]
fn lf_resets_columns() {
	let evs = record_default("<a>\n<b/>\n</a>");
	assert_eq!(
		evs,
		vec![
			Ev::begin("a", 0, 1),
			Ev::text("\n", 0, 3),
			Ev::begin("b", 1, 1),
			Ev::EndEmpty,
			Ev::text("\n", 1, 4),
			Ev::end("a", 2, 2),
		]
	);
}

#[test]
fn attribute_values_normalise_line_endings() {
	let evs = record_default("<a b='x\r\ny\rz'/>");
	assert_eq!(evs[1], Ev::attr("b", "x\ny\nz", (0, 3), (0, 5)));
}

#[test]
fn attribute_values_keep_tabs_and_references() {
	let evs = record_default("<a b='x\ty' c=\"&lt;&#x41;\"/>");
	assert_eq!(evs[1], Ev::attr("b", "x\ty", (0, 3), (0, 5)));
	assert_eq!(evs[2], Ev::attr("c", "<A", (0, 11), (0, 13)));
}

#[test]
fn comments_and_cdata_count_lines_too() {
	let evs = record_default("<a><!--x\ny--><![CDATA[p\nq]]></a>");
	assert_eq!(
		evs,
		vec![
			Ev::begin("a", 0, 1),
			Ev::comment("x\ny", 0, 7),
			Ev::cdata("p\nq", 1, 13),
			Ev::end("a", 2, 6),
		]
	);
}

// ---- surrogates ----

#[test]
fn surrogate_pairs_pass_through_text_and_attributes() {
	let evs = record_default("<a b='\u{1f600}'>\u{1f600}</a>");
	assert_eq!(evs[1], Ev::attr("b", "\u{1f600}", (0, 3), (0, 5)));
	assert_eq!(evs[2], Ev::text("\u{1f600}", 0, 10));
	assert_eq!(evs[3], Ev::end("a", 0, 14));
}

#[test]
fn lone_high_surrogate_in_text() {
	let mut units = u16s("<a>");
	units.push(0xd800);
	units.extend(u16s("x</a>"));
	let mut rec = Recorder::new();
	let r = parse_units(&units, &mut rec, &Options::default());
	assert!(r.is_ok());
	assert_eq!(
		rec.events,
		vec![
			Ev::begin("a", 0, 1),
			Ev::error("Lone surrogate code unit.", 0, 3),
		]
	);
}

#[test]
fn lone_low_surrogate_in_text() {
	let mut units = u16s("<a>");
	units.push(0xdc00);
	units.extend(u16s("</a>"));
	let mut rec = Recorder::new();
	parse_units(&units, &mut rec, &Options::default()).unwrap();
	assert_eq!(
		rec.events.last().unwrap(),
		&Ev::error("Lone surrogate code unit.", 0, 3)
	);
}

#[test]
fn high_surrogate_at_eof() {
	let mut units = u16s("<a>");
	units.push(0xd83d);
	let mut rec = Recorder::new();
	parse_units(&units, &mut rec, &Options::default()).unwrap();
	assert_eq!(
		rec.events[1],
		Ev::error("Lone surrogate code unit.", 0, 3)
	);
}

// ---- references ----

#[test]
fn numeric_reference_to_surrogate_is_an_error() {
	let (evs, _) = record("<a>&#xD800;</a>", &Options::default());
	assert_eq!(evs[1], Ev::error("Invalid character.", 0, 10));
}

#[test]
fn numeric_reference_above_plane_16_is_an_error() {
	let (evs, _) = record("<a>&#x110000;</a>", &Options::default());
	assert_eq!(evs[1], Ev::error("Invalid character.", 0, 12));
}

#[test]
fn numeric_reference_huge_value_saturates_safely() {
	let (evs, _) = record("<a>&#99999999999999999999;</a>", &Options::default());
	assert!(matches!(&evs[1], Ev::Error { message, .. } if message == "Invalid character."));
}

#[test]
fn reference_digit_errors() {
	let (evs, _) = record("<a>&#;</a>", &Options::default());
	assert_eq!(
		evs[1],
		Ev::error("Invalid decimal digit in character reference.", 0, 5)
	);
	let (evs, _) = record("<a>&#xG;</a>", &Options::default());
	assert_eq!(
		evs[1],
		Ev::error("Invalid hexadecimal digit in character reference.", 0, 6)
	);
}

#[test]
fn unknown_entities_are_rejected() {
	let (evs, _) = record("<a>&copy;</a>", &Options::default());
	assert_eq!(
		evs[1],
		Ev::error("Only the five predefined entities are supported.", 0, 8)
	);
	// case-sensitive
	let (evs, _) = record("<a>&LT;</a>", &Options::default());
	assert_eq!(
		evs[1],
		Ev::error("Only the five predefined entities are supported.", 0, 6)
	);
}

#[test]
fn reference_missing_semicolon() {
	let (evs, _) = record("<a>&lt x</a>", &Options::default());
	assert_eq!(
		evs[1],
		Ev::error("Expecting ';' to terminate the reference.", 0, 6)
	);
}

#[test]
fn all_five_entities_decode() {
	let evs = record_default("<a>&lt;&gt;&amp;&apos;&quot;</a>");
	assert_eq!(evs[1], Ev::text("<>&'\"", 0, 3));
}

#[test]
fn astral_numeric_reference_in_attribute() {
	let evs = record_default("<r a=\"&#x1F600;\"/>");
	assert_eq!(evs[1], Ev::attr("a", "\u{1f600}", (0, 3), (0, 5)));
}

// ---- structural errors ----

#[test]
fn invalid_begin_tag_name_points_at_the_lt() {
	let (evs, _) = record("<1a>", &Options::default());
	assert_eq!(evs, vec![Ev::error("Invalid begin tag name.", 0, 0)]);
}

#[test]
fn invalid_attribute_errors() {
	let (evs, _) = record("<a 1='2'/>", &Options::default());
	assert_eq!(evs[1], Ev::error("Invalid attribute name.", 0, 3));
	let (evs, _) = record("<a b '2'/>", &Options::default());
	assert_eq!(evs[1], Ev::error("Expecting '=' after attribute name.", 0, 5));
	let (evs, _) = record("<a b=2/>", &Options::default());
	assert_eq!(
		evs[1],
		Ev::error("Attribute value must be quoted with '\"' or \"'\".", 0, 5)
	);
	let (evs, _) = record("<a b=\"x<y\"/>", &Options::default());
	assert_eq!(
		evs[1],
		Ev::error("Literal '<' is not allowed in an attribute value.", 0, 7)
	);
}

#[test]
fn missing_whitespace_between_attributes() {
	let (evs, _) = record("<a b=\"1\"c=\"2\"/>", &Options::default());
	assert_eq!(evs[2], Ev::error("Expecting whitespace or '/>'.", 0, 8));
}

#[test]
fn slash_must_be_followed_by_gt() {
	let (evs, _) = record("<a/ >", &Options::default());
	assert_eq!(
		evs[1],
		Ev::error("Invalid character found after '/'; expecting '>'.", 0, 3)
	);
}

#[test]
fn unclosed_elements_report_innermost_first() {
	let evs = record_default("<a><b><c>");
	assert_eq!(
		evs,
		vec![
			Ev::begin("a", 0, 1),
			Ev::begin("b", 0, 4),
			Ev::begin("c", 0, 7),
			Ev::error("Invalid tag c not closed at the end of the document.", 0, 9),
			Ev::error("Invalid tag b not closed at the end of the document.", 0, 9),
			Ev::error("Invalid tag a not closed at the end of the document.", 0, 9),
		]
	);
}

#[test]
fn end_tag_allows_trailing_whitespace() {
	let evs = record_default("<a></a >");
	assert_eq!(evs, vec![Ev::begin("a", 0, 1), Ev::end("a", 0, 5)]);
}

#[test]
fn end_tag_with_longer_name_is_a_mismatch() {
	let (evs, _) = record("<a></ab>", &Options::default());
	assert_eq!(
		evs[1],
		Ev::error("Invalid end tag. No matching start tag found", 0, 5)
	);
}

#[test]
fn stray_end_tag_without_open_element() {
	let (evs, _) = record("<a/></a>", &Options::default());
	assert_eq!(
		evs,
		vec![
			Ev::begin("a", 0, 1),
			Ev::EndEmpty,
			Ev::error("Invalid end tag. No matching start tag found", 0, 6),
		]
	);
}

#[test]
fn nul_and_control_characters_are_invalid() {
	let (evs, _) = record("<a>\u{0}</a>", &Options::default());
	assert_eq!(evs[1], Ev::error("Invalid character.", 0, 3));
	let (evs, _) = record("<a b='\u{b}'/>", &Options::default());
	assert_eq!(evs[1], Ev::error("Invalid character in attribute value.", 0, 6));
}

// ---- matched-tag checking off ----

#[test]
fn unchecked_mode_accepts_anything_that_scans() {
	let opts = Options {
		check_begin_end_tag: false,
		..Options::default()
	};
	let (evs, r) = record("<a><b></a></b><c>", &opts);
	assert!(r.is_ok());
	assert_eq!(
		evs,
		vec![
			Ev::begin("a", 0, 1),
			Ev::begin("b", 0, 4),
			Ev::end("a", 0, 8),
			Ev::end("b", 0, 12),
			Ev::begin("c", 0, 15),
		]
	);
}

// ---- configuration equivalences ----

fn doc_corpus() -> Vec<&'static str> {
	vec![
		"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<list of=\"things\">\n  <item id=\"1\">plain</item>\n  <item id=\"2\">&lt;escaped&gt;</item>\n  <empty/>\n  <!-- a comment -->\n  <![CDATA[raw <stuff> here]]>\n</list>",
		"<a/>",
		"<long-content>aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa</long-content>",
		"<u>\u{e9}\u{24b62}\u{fb}</u>",
		"<m x='aaaaaaaaaaaaaaaaaaaaaaaa' y=\"bbbbbbbbbbbbbbbbbbb\"/>",
	]
}

#[test]
fn simd_and_scalar_parses_are_identical() {
	for doc in doc_corpus() {
		let (simd, r1) = record(
			doc,
			&Options {
				use_simd: true,
				..Options::default()
			},
		);
		let (scalar, r2) = record(
			doc,
			&Options {
				use_simd: false,
				..Options::default()
			},
		);
		assert!(r1.is_ok() && r2.is_ok());
		assert_eq!(simd, scalar, "event sequences diverge for {:?}", doc);
	}
}

fn encode_doc(doc: &str, enc: Encoding, bom: bool) -> Vec<u8> {
	let mut out = Vec::new();
	if bom {
		out.extend_from_slice(match enc {
			Encoding::Utf8 => &[0xef_u8, 0xbb, 0xbf][..],
			Encoding::Utf16Le => &[0xff, 0xfe][..],
			Encoding::Utf16Be => &[0xfe, 0xff][..],
			Encoding::Utf32Le => &[0xff, 0xfe, 0x00, 0x00][..],
			Encoding::Utf32Be => &[0x00, 0x00, 0xfe, 0xff][..],
		});
	}
	match enc {
		Encoding::Utf8 => out.extend_from_slice(doc.as_bytes()),
		Encoding::Utf16Le => {
			for u in doc.encode_utf16() {
				out.extend_from_slice(&u.to_le_bytes());
			}
		}
		Encoding::Utf16Be => {
			for u in doc.encode_utf16() {
				out.extend_from_slice(&u.to_be_bytes());
			}
		}
		Encoding::Utf32Le => {
			for c in doc.chars() {
				out.extend_from_slice(&(c as u32).to_le_bytes());
			}
		}
		Encoding::Utf32Be => {
			for c in doc.chars() {
				out.extend_from_slice(&(c as u32).to_be_bytes());
			}
		}
	}
	out
}

#[test]
fn stream_and_buffer_parses_are_identical_across_encodings() {
	let encodings = [
		Encoding::Utf8,
		Encoding::Utf16Le,
		Encoding::Utf16Be,
		Encoding::Utf32Le,
		Encoding::Utf32Be,
	];
	for doc in doc_corpus() {
		let reference = record_default(doc);
		for enc in encodings {
			for bom in [false, true] {
				// without a BOM, only documents starting with `<?xm` are
				// heuristically detectable in the non-UTF-8 encodings
				if !bom && enc != Encoding::Utf8 && !doc.starts_with("<?xml") {
					continue;
				}
				let bytes = encode_doc(doc, enc, bom);
				let mut rec = Recorder::new();
				let r = parse_reader(&bytes[..], &mut rec, &Options::default());
				assert!(r.is_ok(), "{:?} {:?} bom={}: {:?}", enc, doc, bom, r);
				assert_eq!(
					rec.events, reference,
					"event sequences diverge for {:?} in {:?} bom={}",
					doc, enc, bom
				);
			}
		}
	}
}

#[test]
fn encoding_override_is_respected() {
	let bytes = encode_doc("<a>x</a>", Encoding::Utf16Be, false);
	// detection would guess UTF-8 here; the override makes it parse
	let mut rec = Recorder::new();
	let opts = Options {
		encoding: Some(Encoding::Utf16Be),
		..Options::default()
	};
	parse_reader(&bytes[..], &mut rec, &opts).unwrap();
	assert_eq!(
		rec.events,
		vec![
			Ev::begin("a", 0, 1),
			Ev::text("x", 0, 3),
			Ev::end("a", 0, 6),
		]
	);
}

// ---- handler interaction ----

#[test]
fn default_on_error_fails_the_parse_call() {
	struct Loud;
	impl Handler for Loud {}
	let mut h = Loud;
	let r = parse_str("<1>", &mut h, &Options::default());
	match r {
		Err(Error::Parse { err, line, column }) => {
			assert_eq!(err, XmlError::InvalidBeginTagName);
			assert_eq!((line, column), (0, 0));
		}
		other => panic!("unexpected result: {:?}", other),
	}
}

#[test]
fn handler_error_cancels_the_parse() {
	struct StopAtText {
		seen: usize,
	}
	impl Handler for StopAtText {
		fn on_begin_tag(&mut self, _: &[u16], _: usize, _: usize) -> Result<()> {
			self.seen += 1;
			Ok(())
		}
		fn on_text(&mut self, _: &[u16], _: usize, _: usize) -> Result<()> {
			Err(Error::io(std::io::Error::new(
				std::io::ErrorKind::Interrupted,
				"stop",
			)))
		}
	}
	let mut h = StopAtText { seen: 0 };
	let r = parse_str("<a>one<b>two</b></a>", &mut h, &Options::default());
	assert!(matches!(r, Err(Error::Io(_))));
	assert_eq!(h.seen, 1);
}

#[test]
fn positions_are_monotonic() {
	let doc = "<?xml version='1.0'?>\n<a>\n  <b c='d\ne'>f</b>\r\n  <g/>\n</a>";
	let evs = record_default(doc);
	let mut last = (0usize, 0usize);
	for ev in &evs {
		let pos = match ev {
			Ev::Decl { line, column, .. }
			| Ev::Begin { line, column, .. }
			| Ev::End { line, column, .. }
			| Ev::Text { line, column, .. }
			| Ev::Comment { line, column, .. }
			| Ev::CData { line, column, .. }
			| Ev::Error { line, column, .. } => Some((*line, *column)),
			Ev::Attr { name_pos, .. } => Some(*name_pos),
			Ev::EndEmpty => None,
		};
		if let Some(pos) = pos {
			assert!(
				pos.0 > last.0 || (pos.0 == last.0 && pos.1 >= last.1),
				"position went backwards: {:?} after {:?}",
				pos,
				last
			);
			last = pos;
		}
	}
}

#[test]
fn begin_and_end_multisets_match_on_well_formed_input() {
	let doc = "<a><b/><c><d>x</d></c><b></b></a>";
	let evs = record_default(doc);
	let mut stack = Vec::new();
	let mut empties = 0usize;
	for ev in &evs {
		match ev {
			Ev::Begin { name, .. } => stack.push(name.clone()),
			Ev::End { name, .. } => assert_eq!(stack.pop().as_ref(), Some(name)),
			Ev::EndEmpty => {
				stack.pop().unwrap();
				empties += 1;
			}
			_ => (),
		}
	}
	assert!(stack.is_empty());
	assert_eq!(empties, 1);
}

#[test]
fn text_after_markup_boundaries() {
	let evs = record_default("<a>x<!--c-->y<![CDATA[z]]>w</a>");
	assert_eq!(
		evs,
		vec![
			Ev::begin("a", 0, 1),
			Ev::text("x", 0, 3),
			Ev::comment("c", 0, 8),
			Ev::text("y", 0, 12),
			Ev::cdata("z", 0, 22),
			Ev::text("w", 0, 26),
			Ev::end("a", 0, 29),
		]
	);
}

#[test]
fn trailing_whitespace_after_root_is_text() {
	let evs = record_default("<a/> ");
	assert_eq!(
		evs,
		vec![Ev::begin("a", 0, 1), Ev::EndEmpty, Ev::text(" ", 0, 4)]
	);
}

#[test]
fn version_constant_is_wired() {
	assert!(!VERSION.is_empty());
}
