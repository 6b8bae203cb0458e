//! Event-driven tree construction.
//!
//! [`TreeBuilder`] consumes the flat structural event stream produced by a
//! tokenizer (see [`crate::sax`]) and incrementally assembles a [`Node`]
//! tree. The two cases that make this non-trivial:
//!
//! - **Repeated siblings** — `<a/><a/>` under one parent must become an
//!   ordered two-element list, not an overwrite.
//! - **Same-name open elements** — a tag name may be open several times at
//!   once, among siblings' subtrees or along the ancestor chain
//!   (`<a><a><a/></a></a>`). An end event must restore the correct
//!   in-progress element.
//!
//! The original design for the second case keyed a flat open-elements table
//! by tag name with an escalating marker suffix per simultaneously-open
//! instance. Here that table is an explicit map from tag name to a stack of
//! open-element positions: each `end_element(name)` resolves to the
//! deepest, most recently opened instance of `name`, exactly the element
//! the escalation rule would have found, without any string concatenation.
//!
//! # Examples
//!
//! ```
//! use simplexml::builder::TreeBuilder;
//! use simplexml::sax::SaxHandler;
//!
//! let mut builder = TreeBuilder::new();
//! builder.start_element("store", &[]).unwrap();
//! builder.start_element("name", &[]).unwrap();
//! builder.characters("Corner Shop").unwrap();
//! builder.end_element("name").unwrap();
//! builder.end_element("store").unwrap();
//! builder.end_document().unwrap();
//!
//! let root = builder.into_root().unwrap();
//! assert_eq!(root.children("name")[0].text(), "Corner Shop");
//! ```

use std::collections::HashMap;

use crate::error::BuildError;
use crate::node::Node;
use crate::sax::SaxHandler;

/// Where the builder is in the document lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// No element has been opened yet.
    Empty,
    /// The root element has been seen; zero or more elements are open.
    Building,
    /// The document-end event has been processed. Terminal: no further
    /// events are accepted.
    Done,
}

/// A stateful visitor that assembles a [`Node`] tree from structural events.
///
/// Feed events through the [`SaxHandler`] implementation, then call
/// [`TreeBuilder::into_root`] to take the finished tree. A builder is
/// single-use: create a fresh one per document.
#[derive(Debug)]
pub struct TreeBuilder {
    /// Open elements, outermost first. The last entry is the element
    /// currently accepting text and children.
    stack: Vec<Node>,
    /// Tag name → positions in `stack` of currently-open elements with that
    /// name. Each entry is used as a stack: the back is the deepest, most
    /// recently opened instance, which is the one an end event closes.
    open: HashMap<String, Vec<usize>>,
    /// The completed root, set when the outermost element closes.
    root: Option<Node>,
    state: State,
}

impl TreeBuilder {
    /// Creates a builder in the `Empty` state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            open: HashMap::new(),
            root: None,
            state: State::Empty,
        }
    }

    /// Takes the finished root node.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Unfinished`] if the document-end event has not
    /// been processed yet.
    pub fn into_root(self) -> Result<Node, BuildError> {
        match (self.state, self.root) {
            (State::Done, Some(root)) => Ok(root),
            _ => Err(BuildError::Unfinished),
        }
    }

    fn guard_not_done(&self) -> Result<(), BuildError> {
        if self.state == State::Done {
            return Err(BuildError::AfterDocumentEnd);
        }
        Ok(())
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SaxHandler for TreeBuilder {
    fn start_element(
        &mut self,
        name: &str,
        attributes: &[(String, String)],
    ) -> Result<(), BuildError> {
        self.guard_not_done()?;
        if self.stack.is_empty() && self.root.is_some() {
            return Err(BuildError::SecondRoot {
                name: name.to_string(),
            });
        }
        self.stack.push(Node::new(name, attributes.to_vec()));
        self.open
            .entry(name.to_string())
            .or_default()
            .push(self.stack.len() - 1);
        self.state = State::Building;
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> Result<(), BuildError> {
        self.guard_not_done()?;
        let mismatched = || BuildError::MismatchedEnd {
            name: name.to_string(),
        };

        let positions = self.open.get_mut(name).ok_or_else(mismatched)?;
        let position = positions.pop().ok_or_else(mismatched)?;
        if positions.is_empty() {
            self.open.remove(name);
        }
        // The deepest open instance of `name` must be the innermost open
        // element overall, or the stream's nesting is broken.
        if position + 1 != self.stack.len() {
            return Err(mismatched());
        }

        let closed = self.stack.pop().ok_or_else(mismatched)?;
        match self.stack.last_mut() {
            Some(parent) => parent.append_child(closed),
            None => self.root = Some(closed),
        }
        Ok(())
    }

    fn characters(&mut self, chars: &str) -> Result<(), BuildError> {
        self.guard_not_done()?;
        match self.stack.last_mut() {
            Some(current) => {
                current.append_text(chars);
                Ok(())
            }
            // Inter-element document whitespace is legitimate for some
            // drivers to report; anything else has nowhere to go.
            None if chars.trim().is_empty() => Ok(()),
            None => Err(BuildError::TextOutsideRoot),
        }
    }

    fn end_document(&mut self) -> Result<(), BuildError> {
        self.guard_not_done()?;
        if !self.stack.is_empty() {
            return Err(BuildError::UnclosedElements {
                count: self.stack.len(),
            });
        }
        if self.root.is_none() {
            return Err(BuildError::NoRootElement);
        }
        self.state = State::Done;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(events: &[Event]) -> Result<Node, BuildError> {
        let mut builder = TreeBuilder::new();
        for event in events {
            match event {
                Event::Start(name) => builder.start_element(name, &[])?,
                Event::End(name) => builder.end_element(name)?,
                Event::Text(chars) => builder.characters(chars)?,
            }
        }
        builder.end_document()?;
        builder.into_root()
    }

    enum Event {
        Start(&'static str),
        End(&'static str),
        Text(&'static str),
    }
    use Event::{End, Start, Text};

    #[test]
    fn test_single_element() {
        let root = build(&[Start("root"), Text("hi"), End("root")]).unwrap();
        assert_eq!(root.tag(), "root");
        assert_eq!(root.text(), "hi");
        assert!(!root.has_children());
    }

    #[test]
    fn test_repeated_siblings_become_a_list() {
        let root = build(&[
            Start("store"),
            Start("product"),
            End("product"),
            Start("product"),
            End("product"),
            End("store"),
        ])
        .unwrap();
        assert_eq!(root.children("product").len(), 2);
    }

    #[test]
    fn test_sibling_subtrees_stay_independent() {
        // <a><b>one</b></a><a><b>two</b></a> under a root: each a owns its
        // own b, with no cross-contamination.
        let root = build(&[
            Start("r"),
            Start("a"),
            Start("b"),
            Text("one"),
            End("b"),
            End("a"),
            Start("a"),
            Start("b"),
            Text("two"),
            End("b"),
            End("a"),
            End("r"),
        ])
        .unwrap();
        let a = root.children("a");
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].children("b").len(), 1);
        assert_eq!(a[1].children("b").len(), 1);
        assert_eq!(a[0].children("b")[0].text(), "one");
        assert_eq!(a[1].children("b")[0].text(), "two");
    }

    #[test]
    fn test_same_name_nesting_closes_in_order() {
        // <a><a><a/></a></a>: three open instances of "a" at once; each end
        // event must close the innermost one.
        let root = build(&[
            Start("a"),
            Start("a"),
            Start("a"),
            End("a"),
            End("a"),
            End("a"),
        ])
        .unwrap();
        assert_eq!(root.tag(), "a");
        let middle = &root.children("a")[0];
        let inner = &middle.children("a")[0];
        assert_eq!(inner.tag(), "a");
        assert!(!inner.has_children());
    }

    #[test]
    fn test_same_name_across_siblings_and_depth() {
        // "a" recurs both as nested descendant and as a later sibling.
        let root = build(&[
            Start("r"),
            Start("a"),
            Start("a"),
            End("a"),
            End("a"),
            Start("a"),
            End("a"),
            End("r"),
        ])
        .unwrap();
        let outer = root.children("a");
        assert_eq!(outer.len(), 2);
        assert_eq!(outer[0].children("a").len(), 1);
        assert!(!outer[1].has_children());
    }

    #[test]
    fn test_text_accumulates_across_events() {
        let root = build(&[Start("t"), Text("Hel"), Text("lo"), End("t")]).unwrap();
        assert_eq!(root.text(), "Hello");
    }

    #[test]
    fn test_mixed_content_text_stays_with_its_element() {
        // <p>Hello<b>World</b></p>
        let root = build(&[
            Start("p"),
            Text("Hello"),
            Start("b"),
            Text("World"),
            End("b"),
            End("p"),
        ])
        .unwrap();
        assert_eq!(root.text(), "Hello");
        assert_eq!(root.children("b")[0].text(), "World");
        assert_eq!(root.child_nodes().count(), 1);
    }

    #[test]
    fn test_mismatched_end_is_fatal() {
        let err = build(&[Start("a"), End("b")]).unwrap_err();
        assert_eq!(
            err,
            BuildError::MismatchedEnd {
                name: "b".to_string()
            }
        );
    }

    #[test]
    fn test_interleaved_end_is_fatal() {
        // </a> while <b> is still open inside it.
        let err = build(&[Start("a"), Start("b"), End("a")]).unwrap_err();
        assert_eq!(
            err,
            BuildError::MismatchedEnd {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn test_unclosed_elements_at_document_end() {
        let err = build(&[Start("a"), Start("b")]).unwrap_err();
        assert_eq!(err, BuildError::UnclosedElements { count: 2 });
    }

    #[test]
    fn test_empty_document_is_fatal() {
        let err = build(&[]).unwrap_err();
        assert_eq!(err, BuildError::NoRootElement);
    }

    #[test]
    fn test_second_root_is_fatal() {
        let err = build(&[Start("a"), End("a"), Start("b")]).unwrap_err();
        assert_eq!(
            err,
            BuildError::SecondRoot {
                name: "b".to_string()
            }
        );
    }

    #[test]
    fn test_events_after_done_are_rejected() {
        let mut builder = TreeBuilder::new();
        builder.start_element("a", &[]).unwrap();
        builder.end_element("a").unwrap();
        builder.end_document().unwrap();
        assert_eq!(
            builder.characters("late").unwrap_err(),
            BuildError::AfterDocumentEnd
        );
    }

    #[test]
    fn test_into_root_before_end_document() {
        let mut builder = TreeBuilder::new();
        builder.start_element("a", &[]).unwrap();
        builder.end_element("a").unwrap();
        assert_eq!(builder.into_root().unwrap_err(), BuildError::Unfinished);
    }

    #[test]
    fn test_whitespace_outside_root_is_ignored() {
        let mut builder = TreeBuilder::new();
        builder.characters("\n  ").unwrap();
        builder.start_element("a", &[]).unwrap();
        builder.end_element("a").unwrap();
        builder.characters("\n").unwrap();
        builder.end_document().unwrap();
        assert_eq!(builder.into_root().unwrap().tag(), "a");
    }

    #[test]
    fn test_text_outside_root_is_fatal() {
        let mut builder = TreeBuilder::new();
        assert_eq!(
            builder.characters("stray").unwrap_err(),
            BuildError::TextOutsideRoot
        );
    }

    #[test]
    fn test_attributes_reach_the_node() {
        let mut builder = TreeBuilder::new();
        builder
            .start_element(
                "product",
                &[("category".to_string(), "Vehicles".to_string())],
            )
            .unwrap();
        builder.end_element("product").unwrap();
        builder.end_document().unwrap();
        let root = builder.into_root().unwrap();
        assert_eq!(root.attribute("category"), Some("Vehicles"));
    }
}
