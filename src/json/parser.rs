use std::collections::BTreeMap;

use thiserror::Error;

use super::node::Node;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected character {found:?} at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },
    #[error("invalid escape sequence at offset {offset}")]
    InvalidEscape { offset: usize },
    #[error("invalid number literal at offset {offset}")]
    InvalidNumber { offset: usize },
    #[error("trailing data after the top-level value at offset {offset}")]
    TrailingData { offset: usize },
}

/// A recursive-descent reader over the structured-value text grammar:
/// objects, arrays, strings, numbers (int vs. double distinguished
/// lexically), booleans and null.
pub struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    pub fn parse(source: &str) -> Result<Node, ParseError> {
        let mut parser = Self::new(source);
        parser.skip_whitespace();
        let value = parser.parse_value()?;
        parser.skip_whitespace();
        if parser.pos != parser.chars.len() {
            return Err(ParseError::TrailingData { offset: parser.pos });
        }
        Ok(value)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.advance() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(ParseError::UnexpectedChar {
                found: c,
                offset: self.pos - 1,
            }),
            None => Err(ParseError::UnexpectedEof),
        }
    }

    fn parse_value(&mut self) -> Result<Node, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some('{') => self.parse_map(),
            Some('[') => self.parse_array(),
            Some('"') => Ok(Node::String(self.parse_string()?)),
            Some('t') | Some('f') => self.parse_bool(),
            Some('n') => self.parse_null(),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(c) => Err(ParseError::UnexpectedChar {
                found: c,
                offset: self.pos,
            }),
            None => Err(ParseError::UnexpectedEof),
        }
    }

    fn parse_map(&mut self) -> Result<Node, ParseError> {
        self.expect('{')?;
        let mut entries = BTreeMap::new();
        self.skip_whitespace();
        if self.peek() == Some('}') {
            self.advance();
            return Ok(Node::Map(entries));
        }
        loop {
            self.skip_whitespace();
            let key = self.parse_string()?;
            self.skip_whitespace();
            self.expect(':')?;
            let value = self.parse_value()?;
            entries.insert(key, value);
            self.skip_whitespace();
            match self.advance() {
                Some(',') => continue,
                Some('}') => break,
                Some(c) => {
                    return Err(ParseError::UnexpectedChar {
                        found: c,
                        offset: self.pos - 1,
                    });
                }
                None => return Err(ParseError::UnexpectedEof),
            }
        }
        Ok(Node::Map(entries))
    }

    fn parse_array(&mut self) -> Result<Node, ParseError> {
        self.expect('[')?;
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.advance();
            return Ok(Node::Array(items));
        }
        loop {
            let value = self.parse_value()?;
            items.push(value);
            self.skip_whitespace();
            match self.advance() {
                Some(',') => continue,
                Some(']') => break,
                Some(c) => {
                    return Err(ParseError::UnexpectedChar {
                        found: c,
                        offset: self.pos - 1,
                    });
                }
                None => return Err(ParseError::UnexpectedEof),
            }
        }
        Ok(Node::Array(items))
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        self.expect('"')?;
        let mut out = String::new();
        loop {
            match self.advance() {
                Some('"') => break,
                Some('\\') => {
                    let escape_offset = self.pos - 1;
                    match self.advance() {
                        Some('"') => out.push('"'),
                        Some('\\') => out.push('\\'),
                        Some('/') => out.push('/'),
                        Some('n') => out.push('\n'),
                        Some('t') => out.push('\t'),
                        Some('r') => out.push('\r'),
                        Some('u') => {
                            let mut code = 0u32;
                            for _ in 0..4 {
                                let digit = self
                                    .advance()
                                    .and_then(|c| c.to_digit(16))
                                    .ok_or(ParseError::InvalidEscape {
                                        offset: escape_offset,
                                    })?;
                                code = code * 16 + digit;
                            }
                            out.push(char::from_u32(code).ok_or(ParseError::InvalidEscape {
                                offset: escape_offset,
                            })?);
                        }
                        _ => {
                            return Err(ParseError::InvalidEscape {
                                offset: escape_offset,
                            });
                        }
                    }
                }
                Some(c) => out.push(c),
                None => return Err(ParseError::UnexpectedEof),
            }
        }
        Ok(out)
    }

    fn parse_bool(&mut self) -> Result<Node, ParseError> {
        if self.try_literal("true") {
            Ok(Node::Bool(true))
        } else if self.try_literal("false") {
            Ok(Node::Bool(false))
        } else {
            Err(ParseError::UnexpectedChar {
                found: self.peek().unwrap_or('\0'),
                offset: self.pos,
            })
        }
    }

    fn parse_null(&mut self) -> Result<Node, ParseError> {
        if self.try_literal("null") {
            Ok(Node::Null)
        } else {
            Err(ParseError::UnexpectedChar {
                found: self.peek().unwrap_or('\0'),
                offset: self.pos,
            })
        }
    }

    fn try_literal(&mut self, literal: &str) -> bool {
        let chars: Vec<char> = literal.chars().collect();
        if self.pos + chars.len() > self.chars.len() {
            return false;
        }
        if self.chars[self.pos..self.pos + chars.len()] == chars[..] {
            self.pos += chars.len();
            true
        } else {
            false
        }
    }

    fn parse_number(&mut self) -> Result<Node, ParseError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance();
        }
        let mut is_double = false;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') {
            is_double = true;
            self.advance();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            is_double = true;
            self.advance();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.advance();
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if is_double {
            text.parse::<f64>()
                .map(Node::Double)
                .map_err(|_| ParseError::InvalidNumber { offset: start })
        } else {
            text.parse::<i64>()
                .map(Node::Int)
                .map_err(|_| ParseError::InvalidNumber { offset: start })
        }
    }
}

/// Convenience wrapper mirroring [`Parser::parse`].
pub fn parse(source: &str) -> Result<Node, ParseError> {
    Parser::parse(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scalars() {
        assert_eq!(parse("null").unwrap(), Node::Null);
        assert_eq!(parse("true").unwrap(), Node::Bool(true));
        assert_eq!(parse("false").unwrap(), Node::Bool(false));
        assert_eq!(parse("42").unwrap(), Node::Int(42));
        assert_eq!(parse("-7").unwrap(), Node::Int(-7));
        assert_eq!(parse("3.5").unwrap(), Node::Double(3.5));
        assert_eq!(parse("\"hi\"").unwrap(), Node::String("hi".into()));
    }

    #[test]
    fn parses_nested_structure() {
        let node = parse(r#"{"a": [1, 2, {"b": true}], "c": null}"#).unwrap();
        let map = node.as_map().unwrap();
        assert!(map.contains_key("a"));
        assert!(map.contains_key("c"));
        let arr = map["a"].as_array().unwrap();
        assert_eq!(arr.len(), 3);
    }

    #[test]
    fn parses_escapes() {
        let node = parse(r#""line\nbreak\ttab\"quote""#).unwrap();
        assert_eq!(node.as_str().unwrap(), "line\nbreak\ttab\"quote");
    }

    #[test]
    fn rejects_trailing_data() {
        assert!(matches!(
            parse("1 2"),
            Err(ParseError::TrailingData { .. })
        ));
    }

    #[test]
    fn rejects_unterminated_string() {
        assert!(matches!(parse("\"abc"), Err(ParseError::UnexpectedEof)));
    }

    #[test]
    fn distinguishes_int_and_double() {
        assert_eq!(parse("5").unwrap(), Node::Int(5));
        assert_eq!(parse("5.0").unwrap(), Node::Double(5.0));
    }
}
