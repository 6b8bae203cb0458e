//! Shared low-level input handling for the tokenizer.
//!
//! [`ParserInput`] encapsulates the raw byte stream, position tracking
//! (line, column, byte offset), and common parsing primitives such as
//! peeking, advancing, name parsing, and entity reference resolution.
//!
//! # Security
//!
//! `ParserInput` tracks nesting depth and enforces size limits to guard
//! against denial-of-service input:
//!
//! - **Depth limit**: prevents stack overflow from deeply nested elements.
//! - **Name length limit**: prevents memory exhaustion from huge names.
//!
//! Only the five built-in XML entities (amp, lt, gt, apos, quot) and
//! numeric character references are resolved; no DTD entities exist, so
//! recursive expansion is impossible. No external entity loading is
//! performed (immune to XXE).

use crate::error::{ParseError, SourceLocation};

// -------------------------------------------------------------------------
// Security defaults
// -------------------------------------------------------------------------

/// Default maximum element nesting depth.
pub(crate) const DEFAULT_MAX_DEPTH: u32 = 256;

/// Default maximum number of attributes on a single element.
pub(crate) const DEFAULT_MAX_ATTRIBUTES: u32 = 256;

/// Default maximum length (in bytes) of a text node.
pub(crate) const DEFAULT_MAX_TEXT_LENGTH: usize = 10 * 1024 * 1024; // 10 MB

/// Default maximum length (in bytes) of an element or attribute name.
pub(crate) const DEFAULT_MAX_NAME_LENGTH: usize = 50_000;

// -------------------------------------------------------------------------
// XML Name character classes (XML 1.0 §2.3)
// -------------------------------------------------------------------------

/// Returns `true` if `c` is a valid `NameStartChar` per XML 1.0 §2.3 `[4]`.
pub(crate) fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z' |
        '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}' |
        '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' |
        '\u{200C}'..='\u{200D}' | '\u{2070}'..='\u{218F}' |
        '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}' |
        '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' |
        '\u{10000}'..='\u{EFFFF}'
    )
}

/// Returns `true` if `c` is a valid `NameChar` per XML 1.0 §2.3 [4a].
pub(crate) fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' |
            '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}

// -------------------------------------------------------------------------
// ParserInput
// -------------------------------------------------------------------------

/// Shared low-level input state for the tokenizer.
///
/// Tracks the byte stream, position (line/column/offset), nesting depth,
/// and configured limits.
pub(crate) struct ParserInput<'a> {
    /// The input bytes (must be valid UTF-8).
    input: &'a [u8],
    /// Current byte offset in `input`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    column: u32,
    /// Current element nesting depth.
    depth: u32,
    /// Maximum allowed nesting depth.
    max_depth: u32,
    /// Maximum allowed name length in bytes.
    max_name_length: usize,
}

impl<'a> ParserInput<'a> {
    /// Creates a new `ParserInput` from a UTF-8 string with default limits.
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }

    /// Sets the maximum nesting depth.
    pub fn set_max_depth(&mut self, max: u32) {
        self.max_depth = max;
    }

    /// Sets the maximum name length.
    pub fn set_max_name_length(&mut self, max: usize) {
        self.max_name_length = max;
    }

    // -- Depth tracking --

    /// Increments the nesting depth. Returns an error if the limit is exceeded.
    pub fn increment_depth(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.fatal(format!(
                "maximum nesting depth exceeded ({})",
                self.max_depth
            )));
        }
        Ok(())
    }

    /// Decrements the nesting depth (saturating at 0).
    pub fn decrement_depth(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // -- Position queries --

    /// Returns the current source location.
    pub fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.line,
            column: self.column,
            byte_offset: self.pos,
        }
    }

    /// Returns `true` if all input has been consumed.
    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Creates a fatal `ParseError` at the current location.
    pub fn fatal(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            location: self.location(),
        }
    }

    // -- Peek operations --

    /// Returns the byte at the current position without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Returns the byte at `current_position + offset` without consuming.
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    /// Returns the character at the current position without consuming it.
    pub fn peek_char(&self) -> Option<char> {
        if self.at_end() {
            return None;
        }
        std::str::from_utf8(&self.input[self.pos..])
            .ok()
            .and_then(|s| s.chars().next())
    }

    // -- Advance operations --

    /// Advances the position by `count` bytes, updating line/column.
    ///
    /// Byte-wise: each byte counts as one column, so this is only for
    /// ASCII markup. Use [`ParserInput::next_char`] or
    /// [`ParserInput::advance_char`] where the content may be multibyte.
    pub fn advance(&mut self, count: usize) {
        for _ in 0..count {
            if self.pos < self.input.len() {
                if self.input[self.pos] == b'\n' {
                    self.line += 1;
                    self.column = 1;
                } else {
                    self.column += 1;
                }
                self.pos += 1;
            }
        }
    }

    /// Advances by one UTF-8 character, updating line/column.
    pub fn advance_char(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.pos += ch.len_utf8();
    }

    /// Consumes and returns the next character with `\r\n` → `\n`
    /// normalization (XML 1.0 §2.11).
    pub fn next_char(&mut self) -> Result<char, ParseError> {
        let ch = self
            .peek_char()
            .ok_or_else(|| self.fatal("unexpected end of input"))?;
        self.advance_char(ch);
        if ch == '\r' {
            if self.peek() == Some(b'\n') {
                self.advance(1);
            }
            return Ok('\n');
        }
        Ok(ch)
    }

    // -- Expect operations --

    /// Consumes the next byte and asserts it matches `expected`.
    pub fn expect_byte(&mut self, expected: u8) -> Result<(), ParseError> {
        match self.peek() {
            Some(b) if b == expected => {
                self.advance(1);
                Ok(())
            }
            Some(b) => Err(self.fatal(format!(
                "expected '{}', found '{}'",
                expected as char, b as char
            ))),
            None => Err(self.fatal(format!(
                "expected '{}', found end of input",
                expected as char
            ))),
        }
    }

    /// Consumes bytes and asserts they match the `expected` sequence.
    pub fn expect_str(&mut self, expected: &[u8]) -> Result<(), ParseError> {
        for &b in expected {
            self.expect_byte(b)?;
        }
        Ok(())
    }

    // -- Lookahead --

    /// Returns `true` if the remaining input starts with `s`.
    pub fn looking_at(&self, s: &[u8]) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    // -- Whitespace --

    /// Skips whitespace characters. Returns `true` if any were consumed.
    pub fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while let Some(b' ' | b'\t' | b'\r' | b'\n') = self.peek() {
            self.advance(1);
        }
        self.pos > start
    }

    // -- Take while --

    /// Consumes bytes while `pred` returns `true` and returns the string.
    pub fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> String {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if pred(b) {
                self.advance(1);
            } else {
                break;
            }
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).to_string()
    }

    // -- Name parsing (XML 1.0 §2.3) --

    /// Parses an XML `Name` per XML 1.0 §2.3 production `[5]`.
    ///
    /// A `Name` starts with a `NameStartChar` followed by zero or more
    /// `NameChar`s. Returns an error if the name is empty or starts with
    /// an invalid character.
    pub fn parse_name(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        let first = self
            .peek_char()
            .ok_or_else(|| self.fatal("expected name, found end of input"))?;
        if !is_name_start_char(first) {
            return Err(self.fatal(format!("invalid name start character: '{first}'")));
        }
        self.advance_char(first);

        while let Some(ch) = self.peek_char() {
            if is_name_char(ch) {
                self.advance_char(ch);
            } else {
                break;
            }
        }

        let len = self.pos - start;
        if len > self.max_name_length {
            return Err(self.fatal(format!(
                "name length ({len}) exceeds maximum ({})",
                self.max_name_length
            )));
        }

        let name = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| self.fatal("invalid UTF-8 in name"))?;
        Ok(name.to_string())
    }

    // -- Reference parsing (XML 1.0 §4.1) --

    /// Parses an entity or character reference (`&...;`).
    ///
    /// Handles the five built-in XML entities (`amp`, `lt`, `gt`, `apos`,
    /// `quot`) and decimal/hexadecimal character references. Anything else
    /// is an error: DTD entity declarations are not supported.
    pub fn parse_reference(&mut self) -> Result<char, ParseError> {
        self.expect_byte(b'&')?;

        if self.peek() == Some(b'#') {
            self.advance(1);
            let value = if self.peek() == Some(b'x') {
                self.advance(1);
                let hex = self.take_while(|b| b.is_ascii_hexdigit());
                if hex.is_empty() {
                    return Err(self.fatal("empty hex character reference"));
                }
                u32::from_str_radix(&hex, 16)
                    .map_err(|_| self.fatal("invalid hex character reference"))?
            } else {
                let dec = self.take_while(|b| b.is_ascii_digit());
                if dec.is_empty() {
                    return Err(self.fatal("empty decimal character reference"));
                }
                dec.parse::<u32>()
                    .map_err(|_| self.fatal("invalid decimal character reference"))?
            };
            self.expect_byte(b';')?;

            char::from_u32(value)
                .ok_or_else(|| self.fatal(format!("invalid character reference: U+{value:04X}")))
        } else {
            let name = self.parse_name()?;
            self.expect_byte(b';')?;

            match name.as_str() {
                "amp" => Ok('&'),
                "lt" => Ok('<'),
                "gt" => Ok('>'),
                "apos" => Ok('\''),
                "quot" => Ok('"'),
                _ => Err(self.fatal(format!("unknown entity reference: &{name};"))),
            }
        }
    }

    /// Parses a quoted attribute value (`"..."` or `'...'`), resolving
    /// entity and character references.
    pub fn parse_quoted_value(&mut self) -> Result<String, ParseError> {
        let quote = match self.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.fatal("expected quoted value")),
        };
        self.advance(1);

        let mut value = String::new();
        loop {
            match self.peek() {
                None => return Err(self.fatal("unexpected end of input in attribute value")),
                Some(b) if b == quote => {
                    self.advance(1);
                    return Ok(value);
                }
                Some(b'&') => value.push(self.parse_reference()?),
                Some(b'<') => {
                    return Err(self.fatal("'<' is not allowed in attribute values"));
                }
                Some(_) => {
                    let ch = self.next_char()?;
                    // Attribute-value normalization (XML 1.0 §3.3.3):
                    // whitespace becomes a space.
                    value.push(if ch == '\t' || ch == '\n' { ' ' } else { ch });
                }
            }
        }
    }
}
