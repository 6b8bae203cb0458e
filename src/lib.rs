//! # simplexml
//!
//! Parses well-formed XML into a tree that is easy to traverse with
//! ordinary lookups and indexing, with on-demand typed coercion of leaf
//! text (integer, float, boolean, string).
//!
//! Repeated sibling tags of the same name become an ordered list, and tag
//! names recurring at different depths are kept apart — `<a><a/></a>` and
//! `<a/><a/>` both do what you'd expect.
//!
//! ## Quick Start
//!
//! ```
//! use simplexml::Value;
//!
//! let store = simplexml::parse_str(
//!     r#"<store>
//!          <product category="Vehicles">
//!            <name>Car</name>
//!            <price>5000</price>
//!          </product>
//!          <product category="Electronics">
//!            <name>Video Game Console</name>
//!            <price>250</price>
//!          </product>
//!        </store>"#,
//! )
//! .unwrap();
//!
//! assert_eq!(store.children("product")[0].children("name")[0].text(), "Car");
//! assert_eq!(
//!     store.children("product")[1].attribute("category"),
//!     Some("Electronics")
//! );
//! assert_eq!(
//!     store.children("product")[0].children("price")[0].value().unwrap(),
//!     Value::Int(5000)
//! );
//! ```
//!
//! ## Architecture
//!
//! The crate is split along the event boundary: [`sax`] tokenizes character
//! data into structural events (`start_element`, `characters`,
//! `end_element`, `end_document`), and [`builder::TreeBuilder`] — which
//! never sees character-level XML syntax — assembles those events into the
//! [`Node`] tree. Any event source honoring the same contract can drive
//! the builder directly.

pub mod builder;
pub mod encoding;
pub mod error;
pub mod node;
pub mod parser;
pub mod sax;

// Re-export the primary types at the crate root for convenience.
pub use error::{BuildError, ParseError, ValueError};
pub use node::{Node, Value};
pub use parser::{
    parse_bytes, parse_bytes_with_options, parse_file, parse_str, parse_str_with_options,
    ParseOptions,
};
