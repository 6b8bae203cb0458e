//! The element tree: [`Node`] and typed [`Value`] coercion.
//!
//! A `Node` represents one XML element: its tag name, its attributes, the
//! character data that appeared directly in its body, and its child
//! elements grouped by tag name. Children with the same tag form an ordered
//! list (document order); distinct tag names keep their first-appearance
//! order, so traversal matches the source document.
//!
//! Unlike a generic DOM, attributes and child elements live in two separate
//! maps — an attribute lookup can never shadow a child lookup or vice versa.
//!
//! # Examples
//!
//! ```
//! let store = simplexml::parse_str(
//!     r#"<store>
//!          <product category="Vehicles"><name>Car</name><price>5000</price></product>
//!          <product category="Electronics"><name>Console</name><price>250</price></product>
//!        </store>"#,
//! )
//! .unwrap();
//!
//! let products = store.children("product");
//! assert_eq!(products.len(), 2);
//! assert_eq!(products[0].attribute("category"), Some("Vehicles"));
//! assert_eq!(products[0].children("name")[0].text(), "Car");
//! ```

use crate::error::ValueError;
use std::fmt;

/// A typed value coerced from an element's text content.
///
/// Returned by [`Node::value`]. The coercion rules (applied in order to the
/// trimmed text):
///
/// 1. First character is a digit, or a `+`/`-` sign followed by a digit —
///    parsed as a number: [`Value::Float`] if the text contains a decimal
///    point, else [`Value::Int`].
/// 2. Equals `"true"` or `"false"` case-insensitively — [`Value::Bool`].
/// 3. Anything else — [`Value::Text`], unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An integer, e.g. `<id>1450060</id>`.
    Int(i64),
    /// A floating-point number, e.g. `<version>2.7</version>`.
    Float(f64),
    /// A boolean, e.g. `<tested>true</tested>`.
    Bool(bool),
    /// Plain text that matched no other rule.
    Text(String),
}

impl Value {
    /// Returns the integer value, if this is an [`Value::Int`].
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the float value, if this is a [`Value::Float`].
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a [`Value::Bool`].
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text, if this is a [`Value::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Children sharing one tag name, in document order.
#[derive(Debug, Clone)]
struct ChildSet {
    name: String,
    nodes: Vec<Node>,
}

/// One XML element: tag, attributes, direct text, and named child lists.
///
/// Nodes are immutable once the parse completes. Text accumulates only from
/// character data directly inside this element's body — a child's text never
/// leaks into its parent (mixed content is preserved: `<p>Hello<b>World</b></p>`
/// gives `p` the text `"Hello"` and `b` the text `"World"`).
#[derive(Debug, Clone)]
pub struct Node {
    tag: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<ChildSet>,
}

impl Node {
    /// Creates an element node with the given tag and attributes.
    ///
    /// Attribute order is preserved as given.
    #[must_use]
    pub fn new(tag: impl Into<String>, attributes: Vec<(String, String)>) -> Self {
        Self {
            tag: tag.into(),
            attributes,
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// The element's tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The element's direct text content, trimmed.
    ///
    /// This is the unconverted form of [`Node::value`] — use it when
    /// automatic type coercion is not wanted. Returns the empty string if
    /// no character data was ever accumulated.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// The element's direct text content exactly as accumulated, untrimmed.
    #[must_use]
    pub fn raw_text(&self) -> &str {
        &self.text
    }

    /// Coerces the trimmed text content to a typed [`Value`].
    ///
    /// See [`Value`] for the coercion rules. Calling this repeatedly on the
    /// same node always returns the same result; the node is not mutated.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError`] if the text selects the numeric rule (leading
    /// digit, or sign followed by a digit) but does not parse as a number —
    /// e.g. `"5 apples"`. The tree remains valid.
    ///
    /// # Examples
    ///
    /// ```
    /// use simplexml::Value;
    ///
    /// let config = simplexml::parse_str(
    ///     "<config><id>1450060</id><version>2.70</version><tested>true</tested></config>",
    /// )
    /// .unwrap();
    /// assert_eq!(config.children("id")[0].value().unwrap(), Value::Int(1450060));
    /// assert_eq!(config.children("version")[0].value().unwrap(), Value::Float(2.7));
    /// assert_eq!(config.children("tested")[0].value().unwrap(), Value::Bool(true));
    /// ```
    pub fn value(&self) -> Result<Value, ValueError> {
        let text = self.text();
        if looks_numeric(text) {
            return if text.contains('.') {
                text.parse::<f64>().map(Value::Float).map_err(|_| ValueError {
                    text: text.to_string(),
                })
            } else {
                text.parse::<i64>().map(Value::Int).map_err(|_| ValueError {
                    text: text.to_string(),
                })
            };
        }
        if text.eq_ignore_ascii_case("true") {
            return Ok(Value::Bool(true));
        }
        if text.eq_ignore_ascii_case("false") {
            return Ok(Value::Bool(false));
        }
        Ok(Value::Text(text.to_string()))
    }

    // -- Attributes --

    /// Returns the value of the named attribute, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if the element has an attribute with the given name.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|(n, _)| n == name)
    }

    /// All attributes in document order, as `(name, value)` pairs.
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    // -- Children --

    /// Returns all direct children with the given tag name, in document
    /// order. An absent tag yields an empty slice, not an error.
    #[must_use]
    pub fn children(&self, name: &str) -> &[Node] {
        self.children
            .iter()
            .find(|set| set.name == name)
            .map_or(&[], |set| set.nodes.as_slice())
    }

    /// Returns the first direct child with the given tag name, if any.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children(name).first()
    }

    /// Returns `true` if the element has at least one child with the given
    /// tag name.
    #[must_use]
    pub fn has_child(&self, name: &str) -> bool {
        !self.children(name).is_empty()
    }

    /// Returns `true` if the element has any children at all.
    #[must_use]
    pub fn has_children(&self) -> bool {
        self.children.iter().any(|set| !set.nodes.is_empty())
    }

    /// Iterates over all direct children: document order within each tag
    /// name, first-appearance order across tag names.
    ///
    /// Filtering is ordinary iterator combinator work:
    ///
    /// ```
    /// let root = simplexml::parse_str("<r><a x='1'/><b/><a/></r>").unwrap();
    /// let flagged: Vec<_> = root
    ///     .child_nodes()
    ///     .filter(|n| n.has_attribute("x"))
    ///     .collect();
    /// assert_eq!(flagged.len(), 1);
    /// ```
    pub fn child_nodes(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().flat_map(|set| set.nodes.iter())
    }

    // -- Construction (used by the tree builder) --

    /// Appends character data to this element's text buffer.
    pub(crate) fn append_text(&mut self, chars: &str) {
        self.text.push_str(chars);
    }

    /// Appends a child element, extending the existing same-tag list or
    /// starting a new one.
    pub(crate) fn append_child(&mut self, child: Node) {
        match self.children.iter_mut().find(|set| set.name == child.tag) {
            Some(set) => set.nodes.push(child),
            None => self.children.push(ChildSet {
                name: child.tag.clone(),
                nodes: vec![child],
            }),
        }
    }
}

/// String conversion yields the trimmed text, or `""` if none accumulated.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Returns `true` if `text` selects the numeric coercion rule: the first
/// character is an ASCII digit, or a `+`/`-` sign followed by a digit.
fn looks_numeric(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('+' | '-') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}
