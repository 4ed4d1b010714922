mod builder;
mod node;
mod parser;
mod printer;

pub use builder::{ArrayBuilder, MapBuilder};
pub use node::{Node, NodeError};
pub use parser::{ParseError, Parser, parse};
pub use printer::print;
