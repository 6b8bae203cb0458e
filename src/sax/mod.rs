//! Streaming event handler API and the tokenizer that drives it.
//!
//! The tree builder does not parse character-level XML syntax; it consumes a
//! flat sequence of structural events. [`SaxHandler`] is that event
//! contract, and [`parse_sax`] is the bundled tokenizer that produces the
//! events from a string — a hand-rolled recursive descent scanner covering
//! the element/attribute/text subset of XML 1.0. Comments, processing
//! instructions, the XML declaration, and any DOCTYPE are consumed and
//! discarded; namespaces are not interpreted (a qualified name is just a
//! name); only the five predefined entities and numeric character
//! references are resolved.
//!
//! Any event source that honors the same ordering contract can drive a
//! handler; the tokenizer here is one collaborator, not the only one.
//!
//! # Examples
//!
//! ```
//! use simplexml::error::BuildError;
//! use simplexml::sax::{parse_sax, SaxHandler};
//! use simplexml::ParseOptions;
//!
//! struct ElementCounter {
//!     count: usize,
//! }
//!
//! impl SaxHandler for ElementCounter {
//!     fn start_element(
//!         &mut self,
//!         _name: &str,
//!         _attributes: &[(String, String)],
//!     ) -> Result<(), BuildError> {
//!         self.count += 1;
//!         Ok(())
//!     }
//! }
//!
//! let mut handler = ElementCounter { count: 0 };
//! parse_sax("<root><a/><b/><c/></root>", &ParseOptions::default(), &mut handler).unwrap();
//! assert_eq!(handler.count, 4);
//! ```

use crate::error::{BuildError, ParseError};
use crate::parser::input::ParserInput;
use crate::parser::ParseOptions;

/// A structural event handler.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they use. Attributes are passed as `(name, value)`
/// pairs in document order, with entity references already resolved.
///
/// Returning an `Err` from any callback aborts the parse: the error is
/// converted into a located [`ParseError`] by the tokenizer and no further
/// events are delivered.
#[allow(unused_variables)]
pub trait SaxHandler {
    /// Called when an element start tag is encountered. A self-closing tag
    /// produces a start event immediately followed by an end event.
    fn start_element(
        &mut self,
        name: &str,
        attributes: &[(String, String)],
    ) -> Result<(), BuildError> {
        Ok(())
    }

    /// Called when an element end tag is encountered.
    fn end_element(&mut self, name: &str) -> Result<(), BuildError> {
        Ok(())
    }

    /// Called for character data directly inside the current element.
    /// May be called several times between a start and end event; CDATA
    /// sections arrive as ordinary character data.
    fn characters(&mut self, chars: &str) -> Result<(), BuildError> {
        Ok(())
    }

    /// Called exactly once, after all other events.
    fn end_document(&mut self) -> Result<(), BuildError> {
        Ok(())
    }
}

/// Tokenizes `input`, firing structural events on `handler`.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not well-formed under the
/// supported subset, if a configured limit is exceeded, or if the handler
/// rejects an event.
pub fn parse_sax(
    input: &str,
    options: &ParseOptions,
    handler: &mut dyn SaxHandler,
) -> Result<(), ParseError> {
    let mut parser = SaxParser::new(input, options, handler);
    parser.parse()
}

/// The event-producing tokenizer.
struct SaxParser<'a, 'h> {
    /// Low-level input state (position, peek, advance, name parsing).
    input: ParserInput<'a>,
    /// Configured limits.
    options: ParseOptions,
    /// Event sink.
    handler: &'h mut dyn SaxHandler,
}

impl<'a, 'h> SaxParser<'a, 'h> {
    fn new(input: &'a str, options: &ParseOptions, handler: &'h mut dyn SaxHandler) -> Self {
        // Leading UTF-8 BOM is an encoding artifact, not content.
        let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
        let mut pi = ParserInput::new(input);
        pi.set_max_depth(options.max_depth);
        pi.set_max_name_length(options.max_name_length);
        Self {
            input: pi,
            options: options.clone(),
            handler,
        }
    }

    /// Parses the whole document: prolog, root element, trailing misc.
    fn parse(&mut self) -> Result<(), ParseError> {
        if self.input.looking_at(b"<?xml ")
            || self.input.looking_at(b"<?xml\t")
            || self.input.looking_at(b"<?xml\r")
            || self.input.looking_at(b"<?xml\n")
        {
            self.skip_processing_instruction()?;
        }
        self.skip_misc()?;

        if self.input.looking_at(b"<!DOCTYPE") {
            self.skip_doctype()?;
            self.skip_misc()?;
        }

        if self.input.peek() == Some(b'<')
            && self
                .input
                .peek_at(1)
                .is_some_and(|b| b != b'!' && b != b'?')
        {
            self.parse_element()?;
        } else {
            return Err(self.input.fatal("missing root element"));
        }

        self.skip_misc()?;
        if !self.input.at_end() {
            return Err(self.input.fatal("content after document element"));
        }

        self.dispatch(SaxEvent::EndDocument)
    }

    /// Parses one element and its content, recursively.
    fn parse_element(&mut self) -> Result<(), ParseError> {
        self.input.increment_depth()?;
        self.input.expect_byte(b'<')?;
        let name = self.input.parse_name()?;
        let attributes = self.parse_attributes(&name)?;

        // Self-closing tag: start and end in one.
        if self.input.looking_at(b"/>") {
            self.input.expect_str(b"/>")?;
            self.dispatch(SaxEvent::Start(&name, &attributes))?;
            self.dispatch(SaxEvent::End(&name))?;
            self.input.decrement_depth();
            return Ok(());
        }
        self.input.expect_byte(b'>')?;
        self.dispatch(SaxEvent::Start(&name, &attributes))?;

        self.parse_content()?;

        // End tag; its name must match the element we opened.
        self.input.expect_str(b"</")?;
        let end_name = self.input.parse_name()?;
        if end_name != name {
            return Err(self
                .input
                .fatal(format!("end tag </{end_name}> does not match <{name}>")));
        }
        self.input.skip_whitespace();
        self.input.expect_byte(b'>')?;
        self.dispatch(SaxEvent::End(&name))?;
        self.input.decrement_depth();
        Ok(())
    }

    /// Parses the attribute list of a start tag, up to (but not including)
    /// the closing `>` or `/>`.
    fn parse_attributes(&mut self, element: &str) -> Result<Vec<(String, String)>, ParseError> {
        let mut attributes: Vec<(String, String)> = Vec::new();
        loop {
            let had_space = self.input.skip_whitespace();
            match self.input.peek() {
                Some(b'>' | b'/') => return Ok(attributes),
                None => return Err(self.input.fatal(format!("unterminated start tag <{element}"))),
                Some(_) => {
                    if !had_space {
                        return Err(self.input.fatal("whitespace required before attribute"));
                    }
                }
            }

            let name = self.input.parse_name()?;
            if attributes.iter().any(|(n, _)| *n == name) {
                return Err(self
                    .input
                    .fatal(format!("duplicate attribute '{name}' on <{element}>")));
            }
            if attributes.len() as u32 >= self.options.max_attributes {
                return Err(self.input.fatal(format!(
                    "too many attributes on <{element}> (limit {})",
                    self.options.max_attributes
                )));
            }
            self.input.skip_whitespace();
            self.input.expect_byte(b'=')?;
            self.input.skip_whitespace();
            let value = self.input.parse_quoted_value()?;
            attributes.push((name, value));
        }
    }

    /// Parses element content: character data, CDATA, comments, PIs, and
    /// child elements, until the parent's end tag is reached.
    fn parse_content(&mut self) -> Result<(), ParseError> {
        let mut text = String::new();
        // Cumulative over everything delivered for this element, across
        // flushes and CDATA sections, so interleaved markup cannot reset
        // the limit.
        let mut text_length = 0usize;
        loop {
            match self.input.peek() {
                None => return Err(self.input.fatal("unexpected end of input in element content")),
                Some(b'<') => {
                    self.flush_text(&mut text)?;
                    if self.input.looking_at(b"</") {
                        return Ok(());
                    } else if self.input.looking_at(b"<![CDATA[") {
                        let cdata = self.parse_cdata()?;
                        text_length += cdata.len();
                        self.check_text_length(text_length)?;
                        self.dispatch(SaxEvent::Characters(&cdata))?;
                    } else if self.input.looking_at(b"<!--") {
                        self.skip_comment()?;
                    } else if self.input.looking_at(b"<?") {
                        self.skip_processing_instruction()?;
                    } else {
                        self.parse_element()?;
                    }
                }
                Some(b'&') => {
                    let ch = self.input.parse_reference()?;
                    text.push(ch);
                    text_length += ch.len_utf8();
                    self.check_text_length(text_length)?;
                }
                Some(_) => {
                    let ch = self.input.next_char()?;
                    text.push(ch);
                    text_length += ch.len_utf8();
                    self.check_text_length(text_length)?;
                }
            }
        }
    }

    /// Fails when an element's accumulated character data exceeds the
    /// configured limit.
    fn check_text_length(&self, length: usize) -> Result<(), ParseError> {
        if length > self.options.max_text_length {
            return Err(self.input.fatal(format!(
                "text node exceeds maximum length ({})",
                self.options.max_text_length
            )));
        }
        Ok(())
    }

    /// Delivers any buffered character data and clears the buffer.
    fn flush_text(&mut self, text: &mut String) -> Result<(), ParseError> {
        if !text.is_empty() {
            let chars = std::mem::take(text);
            self.dispatch(SaxEvent::Characters(&chars))?;
        }
        Ok(())
    }

    /// Parses a `<![CDATA[...]]>` section and returns its raw content.
    fn parse_cdata(&mut self) -> Result<String, ParseError> {
        self.input.expect_str(b"<![CDATA[")?;
        let mut content = String::new();
        while !self.input.looking_at(b"]]>") {
            if self.input.at_end() {
                return Err(self.input.fatal("unterminated CDATA section"));
            }
            content.push(self.input.next_char()?);
        }
        self.input.expect_str(b"]]>")?;
        Ok(content)
    }

    /// Consumes a comment without delivering it.
    fn skip_comment(&mut self) -> Result<(), ParseError> {
        self.input.expect_str(b"<!--")?;
        while !self.input.looking_at(b"-->") {
            if self.input.at_end() {
                return Err(self.input.fatal("unterminated comment"));
            }
            // '--' is not allowed inside comments (XML 1.0 §2.5).
            if self.input.looking_at(b"--") {
                return Err(self.input.fatal("'--' is not allowed inside a comment"));
            }
            self.input.next_char()?;
        }
        self.input.expect_str(b"-->")?;
        Ok(())
    }

    /// Consumes a processing instruction (or the XML declaration) without
    /// delivering it.
    fn skip_processing_instruction(&mut self) -> Result<(), ParseError> {
        self.input.expect_str(b"<?")?;
        while !self.input.looking_at(b"?>") {
            if self.input.at_end() {
                return Err(self.input.fatal("unterminated processing instruction"));
            }
            self.input.next_char()?;
        }
        self.input.expect_str(b"?>")?;
        Ok(())
    }

    /// Consumes a DOCTYPE declaration, including any internal subset,
    /// without interpreting it.
    fn skip_doctype(&mut self) -> Result<(), ParseError> {
        self.input.expect_str(b"<!DOCTYPE")?;
        let mut bracket_depth: u32 = 0;
        loop {
            match self.input.peek() {
                None => return Err(self.input.fatal("unterminated DOCTYPE declaration")),
                Some(b'[') => {
                    bracket_depth += 1;
                    self.input.advance(1);
                }
                Some(b']') => {
                    bracket_depth = bracket_depth.saturating_sub(1);
                    self.input.advance(1);
                }
                Some(b'"' | b'\'') => {
                    // Quoted literals may contain '>' or brackets.
                    let quote = self.input.peek();
                    self.input.advance(1);
                    while !self.input.at_end() && self.input.peek() != quote {
                        self.input.next_char()?;
                    }
                    self.input.advance(1);
                }
                Some(b'>') if bracket_depth == 0 => {
                    self.input.advance(1);
                    return Ok(());
                }
                Some(_) => {
                    self.input.next_char()?;
                }
            }
        }
    }

    /// Skips whitespace, comments, and processing instructions at document
    /// level (prolog and epilog).
    fn skip_misc(&mut self) -> Result<(), ParseError> {
        loop {
            self.input.skip_whitespace();
            if self.input.looking_at(b"<!--") {
                self.skip_comment()?;
            } else if self.input.looking_at(b"<?") {
                self.skip_processing_instruction()?;
            } else {
                return Ok(());
            }
        }
    }

    /// Delivers one event to the handler, converting a handler rejection
    /// into a located `ParseError`.
    fn dispatch(&mut self, event: SaxEvent<'_>) -> Result<(), ParseError> {
        let result = match event {
            SaxEvent::Start(name, attributes) => self.handler.start_element(name, attributes),
            SaxEvent::End(name) => self.handler.end_element(name),
            SaxEvent::Characters(chars) => self.handler.characters(chars),
            SaxEvent::EndDocument => self.handler.end_document(),
        };
        result.map_err(|e| self.input.fatal(e.to_string()))
    }
}

/// Internal event representation for uniform dispatch.
enum SaxEvent<'e> {
    Start(&'e str, &'e [(String, String)]),
    End(&'e str),
    Characters(&'e str),
    EndDocument,
}
