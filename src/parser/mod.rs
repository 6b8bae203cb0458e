//! Parse entry points and options.
//!
//! The public surface mirrors how the tree is meant to be consumed: hand a
//! whole document to [`parse_str`], [`parse_bytes`], or [`parse_file`] and
//! get back the root [`Node`]. Each entry drives the tokenizer in
//! [`crate::sax`] into a [`TreeBuilder`](crate::builder::TreeBuilder); a
//! fresh builder is created per document, so no state crosses parses.

pub(crate) mod input;

use std::fs;
use std::path::Path;

use crate::builder::TreeBuilder;
use crate::encoding::decode_to_utf8;
use crate::error::{ParseError, SourceLocation};
use crate::node::Node;
use crate::sax::parse_sax;

use input::{
    DEFAULT_MAX_ATTRIBUTES, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NAME_LENGTH, DEFAULT_MAX_TEXT_LENGTH,
};

/// Parse options controlling tokenizer security limits.
///
/// Use the builder pattern to configure options:
///
/// ```
/// use simplexml::ParseOptions;
///
/// let opts = ParseOptions::default().max_depth(128).max_attributes(32);
/// ```
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Maximum element nesting depth (default: 256).
    pub max_depth: u32,
    /// Maximum number of attributes on a single element (default: 256).
    pub max_attributes: u32,
    /// Maximum length in bytes of a single text node (default: 10 MB).
    pub max_text_length: usize,
    /// Maximum length in bytes of an element or attribute name (default: 50,000).
    pub max_name_length: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_attributes: DEFAULT_MAX_ATTRIBUTES,
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }
}

impl ParseOptions {
    /// Sets the maximum element nesting depth.
    #[must_use]
    pub fn max_depth(mut self, max: u32) -> Self {
        self.max_depth = max;
        self
    }

    /// Sets the maximum number of attributes per element.
    #[must_use]
    pub fn max_attributes(mut self, max: u32) -> Self {
        self.max_attributes = max;
        self
    }

    /// Sets the maximum text node length in bytes.
    #[must_use]
    pub fn max_text_length(mut self, max: usize) -> Self {
        self.max_text_length = max;
        self
    }

    /// Sets the maximum element/attribute name length in bytes.
    #[must_use]
    pub fn max_name_length(mut self, max: usize) -> Self {
        self.max_name_length = max;
        self
    }
}

/// Parses an XML string into its root [`Node`] with default options.
///
/// # Errors
///
/// Returns `ParseError` if the input is not well-formed XML.
///
/// # Examples
///
/// ```
/// let root = simplexml::parse_str("<store><product/></store>").unwrap();
/// assert_eq!(root.tag(), "store");
/// ```
pub fn parse_str(input: &str) -> Result<Node, ParseError> {
    parse_str_with_options(input, &ParseOptions::default())
}

/// Parses an XML string into its root [`Node`] with the given options.
///
/// # Errors
///
/// Returns `ParseError` if the input is not well-formed XML or a configured
/// limit is exceeded.
pub fn parse_str_with_options(input: &str, options: &ParseOptions) -> Result<Node, ParseError> {
    let mut builder = TreeBuilder::new();
    parse_sax(input, options, &mut builder)?;
    // The builder saw a complete, validated event stream, so this cannot
    // fail; map defensively rather than unwrap.
    builder.into_root().map_err(|e| ParseError {
        message: e.to_string(),
        location: SourceLocation::default(),
    })
}

/// Parses XML from raw bytes, detecting the encoding automatically.
///
/// Uses BOM sniffing and XML-declaration inspection to determine the
/// encoding, transcodes to UTF-8, then parses. See
/// [`crate::encoding::decode_to_utf8`].
///
/// # Errors
///
/// Returns `ParseError` if the encoding cannot be determined, the bytes
/// cannot be transcoded, or the XML is not well-formed.
///
/// # Examples
///
/// ```
/// let root = simplexml::parse_bytes(b"<root/>").unwrap();
/// assert_eq!(root.tag(), "root");
/// ```
pub fn parse_bytes(input: &[u8]) -> Result<Node, ParseError> {
    parse_bytes_with_options(input, &ParseOptions::default())
}

/// Parses XML from raw bytes with the given options.
///
/// # Errors
///
/// Same conditions as [`parse_bytes`].
pub fn parse_bytes_with_options(input: &[u8], options: &ParseOptions) -> Result<Node, ParseError> {
    let text = decode_to_utf8(input).map_err(|e| ParseError {
        message: e.to_string(),
        location: SourceLocation::default(),
    })?;
    parse_str_with_options(&text, options)
}

/// Reads and parses an XML file.
///
/// # Errors
///
/// Returns `ParseError` if the file cannot be read, its encoding cannot be
/// handled, or the XML is not well-formed.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Node, ParseError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| ParseError {
        message: format!("failed to read {}: {e}", path.display()),
        location: SourceLocation::default(),
    })?;
    parse_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_str_builds_a_tree() {
        let root = parse_str("<store><product/><product/></store>").unwrap();
        assert_eq!(root.children("product").len(), 2);
    }

    #[test]
    fn test_parse_str_rejects_malformed_input() {
        assert!(parse_str("<a><b></a></b>").is_err());
        assert!(parse_str("<a>").is_err());
        assert!(parse_str("").is_err());
    }

    #[test]
    fn test_parse_bytes_utf8() {
        let root = parse_bytes("<caf\u{e9}>ok</caf\u{e9}>".as_bytes()).unwrap();
        assert_eq!(root.tag(), "caf\u{e9}");
    }

    #[test]
    fn test_parse_bytes_utf16_bom() {
        let text = "<greeting>h\u{e9}llo</greeting>";
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let root = parse_bytes(&bytes).unwrap();
        assert_eq!(root.text(), "h\u{e9}llo");
    }

    #[test]
    fn test_parse_file_missing_file() {
        let err = parse_file("/nonexistent/file.xml").unwrap_err();
        assert!(err.message.contains("failed to read"));
    }

    #[test]
    fn test_options_builder() {
        let opts = ParseOptions::default().max_depth(4).max_text_length(16);
        assert_eq!(opts.max_depth, 4);
        assert_eq!(opts.max_text_length, 16);
        let err = parse_str_with_options("<a>this text is far too long</a>", &opts).unwrap_err();
        assert!(err.message.contains("maximum length"));
    }
}
