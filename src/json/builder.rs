use std::collections::BTreeMap;

use super::node::Node;

/// Fluent constructor for `Node::Map` values. Each call is valid from any
/// state of the builder and returns the next state, so response-building
/// code reads as a flat chain instead of nested literals.
#[derive(Default)]
pub struct MapBuilder {
    entries: BTreeMap<String, Node>,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl Into<Node>) -> Self {
        self.entries.insert(key.to_string(), value.into());
        self
    }

    pub fn build(self) -> Node {
        Node::Map(self.entries)
    }
}

/// Fluent constructor for `Node::Array` values.
#[derive(Default)]
pub struct ArrayBuilder {
    items: Vec<Node>,
}

impl ArrayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, value: impl Into<Node>) -> Self {
        self.items.push(value.into());
        self
    }

    pub fn extend(mut self, values: impl IntoIterator<Item = Node>) -> Self {
        self.items.extend(values);
        self
    }

    pub fn build(self) -> Node {
        Node::Array(self.items)
    }
}
