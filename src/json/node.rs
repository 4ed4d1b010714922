use std::collections::BTreeMap;

use thiserror::Error;

/// A value in the structured-value tree used for every request and response
/// payload. Map keys are kept in sorted order so the printer never has to
/// re-sort on the way out.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Array(Vec<Node>),
    Map(BTreeMap<String, Node>),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NodeError {
    #[error("expected a {expected} node")]
    WrongType { expected: &'static str },
    #[error("missing key {0:?}")]
    MissingKey(String),
}

impl Node {
    pub fn map() -> Self {
        Node::Map(BTreeMap::new())
    }

    pub fn array() -> Self {
        Node::Array(Vec::new())
    }

    pub fn as_map(&self) -> Result<&BTreeMap<String, Node>, NodeError> {
        match self {
            Node::Map(m) => Ok(m),
            _ => Err(NodeError::WrongType { expected: "map" }),
        }
    }

    pub fn as_array(&self) -> Result<&[Node], NodeError> {
        match self {
            Node::Array(a) => Ok(a),
            _ => Err(NodeError::WrongType { expected: "array" }),
        }
    }

    pub fn as_str(&self) -> Result<&str, NodeError> {
        match self {
            Node::String(s) => Ok(s),
            _ => Err(NodeError::WrongType { expected: "string" }),
        }
    }

    pub fn as_i64(&self) -> Result<i64, NodeError> {
        match self {
            Node::Int(v) => Ok(*v),
            _ => Err(NodeError::WrongType { expected: "int" }),
        }
    }

    pub fn as_f64(&self) -> Result<f64, NodeError> {
        match self {
            Node::Int(v) => Ok(*v as f64),
            Node::Double(v) => Ok(*v),
            _ => Err(NodeError::WrongType { expected: "number" }),
        }
    }

    pub fn as_bool(&self) -> Result<bool, NodeError> {
        match self {
            Node::Bool(v) => Ok(*v),
            _ => Err(NodeError::WrongType { expected: "bool" }),
        }
    }

    /// Looks up a required key in a map node.
    pub fn get(&self, key: &str) -> Result<&Node, NodeError> {
        self.as_map()?
            .get(key)
            .ok_or_else(|| NodeError::MissingKey(key.to_string()))
    }

    /// Looks up an optional key in a map node; missing key yields `None`,
    /// wrong node type (not a map) still errors.
    pub fn get_opt(&self, key: &str) -> Result<Option<&Node>, NodeError> {
        Ok(self.as_map()?.get(key))
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::String(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Int(value)
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Double(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(value: Vec<T>) -> Self {
        Node::Array(value.into_iter().map(Into::into).collect())
    }
}
