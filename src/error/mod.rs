//! Error types for parsing, tree building, and value coercion.
//!
//! Three failure domains, kept separate because they surface at different
//! times:
//!
//! - [`ParseError`] — the tokenizer rejected the input (or a builder defect
//!   was detected mid-parse). Carries a [`SourceLocation`]. Fatal: no
//!   partial tree is returned.
//! - [`BuildError`] — the structural event stream fed to
//!   [`TreeBuilder`](crate::builder::TreeBuilder) was malformed (an end tag
//!   with no matching open element, elements still open at document end,
//!   and so on). Fatal to the build.
//! - [`ValueError`] — typed value coercion failed at
//!   [`Node::value`](crate::node::Node::value) call time. Local to that
//!   call; the tree remains valid and traversable.

use std::fmt;

/// Source location within an XML document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number (in characters, not bytes).
    pub column: u32,
    /// 0-based byte offset from the start of the input.
    pub byte_offset: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The error type returned when XML parsing fails.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// The primary error message.
    pub message: String,
    /// Where in the source the error occurred.
    pub location: SourceLocation,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at {}: {}", self.location, self.message)
    }
}

impl std::error::Error for ParseError {}

/// A defect in the structural event stream fed to the tree builder.
///
/// The builder assumes well-formed, properly nested start/end events
/// (normally guaranteed by the tokenizer). Any of these conditions means
/// the event source violated that contract; the build is aborted and no
/// partial tree is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// An end event arrived for a tag with no matching open element.
    MismatchedEnd {
        /// The tag name of the stray end event.
        name: String,
    },
    /// A start event arrived after the root element had already closed.
    SecondRoot {
        /// The tag name of the offending start event.
        name: String,
    },
    /// Non-whitespace character data arrived with no element open.
    TextOutsideRoot,
    /// The document-end event arrived while elements were still open.
    UnclosedElements {
        /// How many elements were still open.
        count: usize,
    },
    /// The document-end event arrived before any element was opened.
    NoRootElement,
    /// An event arrived after the document-end event.
    AfterDocumentEnd,
    /// The finished tree was requested before the document-end event.
    Unfinished,
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MismatchedEnd { name } => {
                write!(f, "end tag </{name}> does not match any open element")
            }
            Self::SecondRoot { name } => {
                write!(f, "element <{name}> opened after the root element closed")
            }
            Self::TextOutsideRoot => write!(f, "character data outside any open element"),
            Self::UnclosedElements { count } => {
                write!(f, "document ended with {count} element(s) still open")
            }
            Self::NoRootElement => write!(f, "document ended without a root element"),
            Self::AfterDocumentEnd => write!(f, "event received after end of document"),
            Self::Unfinished => write!(f, "document tree requested before end of document"),
        }
    }
}

impl std::error::Error for BuildError {}

/// The error returned when typed value coercion fails.
///
/// Produced by [`Node::value`](crate::node::Node::value) when the trimmed
/// text selects the numeric branch (leading digit, or a sign followed by a
/// digit) but the remainder is not a valid numeric literal — e.g.
/// `"5 apples"` or `"-12x"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueError {
    /// The trimmed text that failed to convert.
    pub text: String,
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "text '{}' looks numeric but is not a valid number",
            self.text
        )
    }
}

impl std::error::Error for ValueError {}
