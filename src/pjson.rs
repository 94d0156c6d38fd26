//! A permissive JSON reader shared by the resource-config (§6.2) and symbol
//! database (§6.3) file formats: ordinary JSON plus single-quoted keys and
//! string values and `//` line comments. Per the design notes (§9), this is
//! a dedicated parser rather than a rewrite pass over a strict-JSON string —
//! the character-by-character style mirrors [`crate::compiler::scanner`].

use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n as i64),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parses a complete permissive-JSON document. An empty (all-whitespace,
/// all-comment) input is accepted as [`Value::Null`], matching §6.3's
/// "top-level `null` is valid".
pub fn parse(source: &str) -> Result<Value, ParseError> {
    let mut reader = Reader {
        chars: source.chars().collect(),
        cursor: 0,
    };
    reader.skip_trivia();
    if reader.at_end() {
        return Ok(Value::Null);
    }
    let value = reader.parse_value()?;
    reader.skip_trivia();
    if !reader.at_end() {
        return Err(reader.error("trailing data after top-level value"));
    }
    Ok(value)
}

struct Reader {
    chars: Vec<char>,
    cursor: usize,
}

impl Reader {
    fn at_end(&self) -> bool {
        self.cursor >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.cursor).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += 1;
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
        }
    }

    /// Whitespace and `//` line comments, both skipped before every token.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.chars.get(self.cursor + 1) == Some(&'/') => {
                    while !self.at_end() && self.peek() != Some('\n') {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        self.skip_trivia();
        match self.peek() {
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some('"') | Some('\'') => self.parse_string().map(Value::String),
            Some('t') => self.parse_keyword("true", Value::Bool(true)),
            Some('f') => self.parse_keyword("false", Value::Bool(false)),
            Some('n') => self.parse_keyword("null", Value::Null),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(c) => Err(self.error(format!("unexpected character '{c}'"))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_keyword(&mut self, word: &str, value: Value) -> Result<Value, ParseError> {
        for expected in word.chars() {
            if self.advance() != Some(expected) {
                return Err(self.error(format!("expected '{word}'")));
            }
        }
        Ok(value)
    }

    fn parse_object(&mut self) -> Result<Value, ParseError> {
        self.advance(); // '{'
        let mut map = BTreeMap::new();
        self.skip_trivia();
        if self.peek() == Some('}') {
            self.advance();
            return Ok(Value::Object(map));
        }
        loop {
            self.skip_trivia();
            let key = self.parse_string()?;
            self.skip_trivia();
            if self.advance() != Some(':') {
                return Err(self.error("expected ':' after object key"));
            }
            let value = self.parse_value()?;
            map.insert(key, value);
            self.skip_trivia();
            match self.advance() {
                Some(',') => continue,
                Some('}') => break,
                _ => return Err(self.error("expected ',' or '}' in object")),
            }
        }
        Ok(Value::Object(map))
    }

    fn parse_array(&mut self) -> Result<Value, ParseError> {
        self.advance(); // '['
        let mut items = Vec::new();
        self.skip_trivia();
        if self.peek() == Some(']') {
            self.advance();
            return Ok(Value::Array(items));
        }
        loop {
            items.push(self.parse_value()?);
            self.skip_trivia();
            match self.advance() {
                Some(',') => continue,
                Some(']') => break,
                _ => return Err(self.error("expected ',' or ']' in array")),
            }
        }
        Ok(Value::Array(items))
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        let quote = match self.advance() {
            Some(c @ ('"' | '\'')) => c,
            _ => return Err(self.error("expected a quoted string")),
        };
        let mut result = String::new();
        loop {
            match self.advance() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => break,
                Some('\\') => match self.advance() {
                    Some('n') => result.push('\n'),
                    Some('t') => result.push('\t'),
                    Some('r') => result.push('\r'),
                    Some(c @ ('"' | '\'' | '\\' | '/')) => result.push(c),
                    Some('u') => {
                        let code: String = (0..4).filter_map(|_| self.advance()).collect();
                        let point = u32::from_str_radix(&code, 16)
                            .map_err(|_| self.error("invalid \\u escape"))?;
                        result.push(char::from_u32(point).unwrap_or('\u{fffd}'));
                    }
                    Some(other) => result.push(other),
                    None => return Err(self.error("unterminated escape sequence")),
                },
                Some(c) => result.push(c),
            }
        }
        Ok(result)
    }

    fn parse_number(&mut self) -> Result<Value, ParseError> {
        let start = self.cursor;
        if self.peek() == Some('-') {
            self.advance();
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || c == '+' || c == '-')
        {
            self.advance();
        }
        let text: String = self.chars[start..self.cursor].iter().collect();
        text.parse::<f64>()
            .map(Value::Number)
            .map_err(|_| self.error(format!("invalid number '{text}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_null() {
        assert_eq!(parse("   // just a comment\n").unwrap(), Value::Null);
    }

    #[test]
    fn literal_null_is_null() {
        assert_eq!(parse("null").unwrap(), Value::Null);
    }

    #[test]
    fn single_quoted_keys_and_strings_are_accepted() {
        let value = parse("{ 'scripts': 'lib', // trailing comment\n 'db': \"db.json\" }").unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.get("scripts").unwrap().as_str(), Some("lib"));
        assert_eq!(object.get("db").unwrap().as_str(), Some("db.json"));
    }

    #[test]
    fn nested_objects_and_numbers_parse() {
        let value = parse(r#"{"pkg": {"Foo": {"type": "Class", "filename": "a.as", "line": 12}}}"#).unwrap();
        let pkg = value.as_object().unwrap().get("pkg").unwrap().as_object().unwrap();
        let foo = pkg.get("Foo").unwrap().as_object().unwrap();
        assert_eq!(foo.get("line").unwrap().as_i64(), Some(12));
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(parse("{ not json").is_err());
    }
}
