/*!
# Error types

This module holds the parse-error taxonomy delivered through
[`Handler::on_error`](crate::Handler::on_error) and the crate-level error
type returned by the parse entry points.
*/
use std::error;
use std::fmt;
use std::io;
use std::ops::Deref;
use std::result::Result as StdResult;
use std::sync::Arc;

use smartstring::alias::String as SmartString;

/// Violation of the XML 1.0 grammar or a well-formedness constraint.
///
/// This is a closed set; every variant renders to a fixed human-readable
/// message via [`fmt::Display`]. The only variant carrying data beyond the
/// kind itself is [`XmlError::UnclosedElement`], which names the element
/// still open when the document ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlError {
	/// `<` was not followed by a valid `NameStartChar`.
	InvalidBeginTagName,
	/// `/` inside an element header was not followed by `>`.
	InvalidCharAfterSlash,
	/// Attribute or declaration keyword follows without separating
	/// whitespace.
	MissingWhitespace,
	/// Attribute position did not begin with a valid `NameStartChar`.
	InvalidAttributeName,
	/// Attribute name was not followed by `=`.
	MissingEquals,
	/// Attribute value did not start with `'` or `"`.
	UnquotedAttributeValue,
	/// Literal `<` inside an attribute value.
	LtInAttributeValue,
	/// Code unit outside the `Char` production inside an attribute value.
	InvalidAttributeValueChar,
	/// Code unit outside the `Char` production.
	InvalidChar,
	/// `&#x` was not followed by a hexadecimal digit, or the reference
	/// contained a non-digit before `;`.
	InvalidHexDigit,
	/// `&#` was not followed by a decimal digit, or the reference
	/// contained a non-digit before `;`.
	InvalidDecDigit,
	/// Reference was not terminated by `;`.
	MissingSemicolon,
	/// Named entity other than `lt`, `gt`, `amp`, `apos`, `quot`.
	UnknownEntity,
	/// `</` was not followed by a valid `NameStartChar`.
	InvalidEndTagName,
	/// End tag does not match the open element, or no element is open.
	UnmatchedEndTag,
	/// `<!` introducing anything but a comment or a CDATA section.
	UnsupportedDirective,
	/// `<![` not continued as `<![CDATA[`.
	MalformedCDataStart,
	/// `<!-` not continued as `<!--`.
	MalformedCommentStart,
	/// `--` inside a comment not followed by `>`.
	DoubleDashInComment,
	/// XML declaration after the document prolog.
	DeclarationNotFirst,
	/// `<?` with a target other than `xml`.
	UnsupportedProcessingInstruction,
	/// XML declaration without a leading `version` pseudo-attribute.
	MissingVersion,
	/// Unknown pseudo-attribute where `encoding`, `standalone` or `?>`
	/// was expected.
	ExpectedEncodingOrStandalone,
	/// Unknown pseudo-attribute where `standalone` or `?>` was expected.
	ExpectedStandalone,
	/// `?` in the XML declaration not followed by `>`.
	MissingDeclarationEnd,
	/// End of input inside an unfinished construct.
	UnexpectedEndOfInput,
	/// High surrogate without a low surrogate partner, or a stray low
	/// surrogate.
	LoneSurrogate,
	/// Element still open when the document ended. Carries the element
	/// name.
	UnclosedElement(SmartString),
}

impl fmt::Display for XmlError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::InvalidBeginTagName => f.write_str("Invalid begin tag name."),
			Self::InvalidCharAfterSlash => {
				f.write_str("Invalid character found after '/'; expecting '>'.")
			}
			Self::MissingWhitespace => f.write_str("Expecting whitespace or '/>'."),
			Self::InvalidAttributeName => f.write_str("Invalid attribute name."),
			Self::MissingEquals => f.write_str("Expecting '=' after attribute name."),
			Self::UnquotedAttributeValue => {
				f.write_str("Attribute value must be quoted with '\"' or \"'\".")
			}
			Self::LtInAttributeValue => {
				f.write_str("Literal '<' is not allowed in an attribute value.")
			}
			Self::InvalidAttributeValueChar => {
				f.write_str("Invalid character in attribute value.")
			}
			Self::InvalidChar => f.write_str("Invalid character."),
			Self::InvalidHexDigit => {
				f.write_str("Invalid hexadecimal digit in character reference.")
			}
			Self::InvalidDecDigit => f.write_str("Invalid decimal digit in character reference."),
			Self::MissingSemicolon => f.write_str("Expecting ';' to terminate the reference."),
			Self::UnknownEntity => f.write_str("Only the five predefined entities are supported."),
			Self::InvalidEndTagName => f.write_str("Invalid end tag name."),
			Self::UnmatchedEndTag => f.write_str("Invalid end tag. No matching start tag found"),
			Self::UnsupportedDirective => {
				f.write_str("Unsupported '<!' directive; expecting a comment or a CDATA section.")
			}
			Self::MalformedCDataStart => f.write_str("Expecting '<![CDATA['."),
			Self::MalformedCommentStart => f.write_str("Expecting '<!--'."),
			Self::DoubleDashInComment => f.write_str("Expecting '>' after '--' in a comment."),
			Self::DeclarationNotFirst => {
				f.write_str("XML declaration is only allowed at the very beginning of the document.")
			}
			Self::UnsupportedProcessingInstruction => f.write_str("Expecting '<?xml'."),
			Self::MissingVersion => f.write_str("Expecting 'version' in XML declaration."),
			Self::ExpectedEncodingOrStandalone => {
				f.write_str("Expecting 'encoding', 'standalone' or '?>' in XML declaration.")
			}
			Self::ExpectedStandalone => {
				f.write_str("Expecting 'standalone' or '?>' in XML declaration.")
			}
			Self::MissingDeclarationEnd => {
				f.write_str("Expecting '?>' to terminate the XML declaration.")
			}
			Self::UnexpectedEndOfInput => f.write_str("Unexpected end of input."),
			Self::LoneSurrogate => f.write_str("Lone surrogate code unit."),
			Self::UnclosedElement(name) => write!(
				f,
				"Invalid tag {} not closed at the end of the document.",
				name
			),
		}
	}
}

impl error::Error for XmlError {}

/// [`Arc`]-based wrapper around [`io::Error`] to allow cloning.
#[derive(Clone)]
pub struct IoErrorWrapper(Arc<io::Error>);

impl IoErrorWrapper {
	fn wrap(e: io::Error) -> IoErrorWrapper {
		IoErrorWrapper(Arc::new(e))
	}
}

impl fmt::Debug for IoErrorWrapper {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		fmt::Debug::fmt(&**self, f)
	}
}

impl fmt::Display for IoErrorWrapper {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		fmt::Display::fmt(&**self, f)
	}
}

impl PartialEq for IoErrorWrapper {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl AsRef<io::Error> for IoErrorWrapper {
	fn as_ref(&self) -> &io::Error {
		&*self.0
	}
}

impl Deref for IoErrorWrapper {
	type Target = io::Error;

	fn deref(&self) -> &io::Error {
		&*self.0
	}
}

/// Error type returned by the parse entry points.
///
/// All variants except [`Error::Io`] are fatal for the parse in which they
/// occurred. [`Error::Parse`] is the only variant which is also delivered
/// through [`Handler::on_error`](crate::Handler::on_error); I/O and
/// decode-level failures propagate directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
	/// I/O error from the byte stream backing a
	/// [`DecodingSource`](crate::source::DecodingSource).
	Io(IoErrorWrapper),
	/// Invalid byte encountered while decoding a UTF-8 stream.
	InvalidUtf8Byte(u8),
	/// Value which is not a Unicode scalar encountered while decoding a
	/// UTF-32 stream.
	InvalidCodepoint(u32),
	/// Violation of the XML 1.0 grammar, with the zero-based source
	/// position at which it was detected.
	Parse {
		err: XmlError,
		line: usize,
		column: usize,
	},
}

pub type Result<T> = StdResult<T, Error>;

impl Error {
	pub fn io(e: io::Error) -> Error {
		Error::Io(IoErrorWrapper::wrap(e))
	}

	pub(crate) fn parse(err: XmlError, line: usize, column: usize) -> Error {
		Error::Parse { err, line, column }
	}
}

impl From<io::Error> for Error {
	fn from(e: io::Error) -> Error {
		Error::io(e)
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::Io(e) => write!(f, "I/O error: {}", e),
			Error::InvalidUtf8Byte(b) => write!(f, "invalid utf-8 byte: \\x{:02x}", b),
			Error::InvalidCodepoint(cp) => write!(f, "invalid codepoint: U+{:08x}", cp),
			Error::Parse { err, line, column } => {
				write!(f, "parse error at {}:{}: {}", line, column, err)
			}
		}
	}
}

impl error::Error for Error {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match self {
			Error::Io(e) => Some(&**e),
			Error::Parse { err, .. } => Some(err),
			Error::InvalidUtf8Byte(_) | Error::InvalidCodepoint(_) => None,
		}
	}
}
