//! CSON reader.
//!
//! Handles the data subset of CoffeeScript: `#` and `###` comments, single,
//! double and triple-quoted strings, decimal and hex numbers, `true`/`false`
//! with their `yes`/`no`/`on`/`off` aliases, `null`, bracketed arrays and
//! braced objects separated by commas or newlines, and implicit
//! indentation-delimited objects.
//!
//! An implicit object collects `key: value` members that start at the same
//! column. It ends at a line indented less than its keys, at a `,`, `]` or
//! `}`, or at end of input; a member line indented further is an error.
//! Double-quoted strings are read literally; `#{}` interpolation is not
//! evaluated.

use super::ser::{is_identifier_char, is_identifier_start};
use super::CsonFormat;
use crate::formats::MAX_DEPTH;
use crate::{Error, Map, Number, Result, Value};

/// Parses a complete CSON document.
pub(crate) fn from_str(input: &str) -> Result<Value> {
    let mut parser = Parser::new(input);
    parser.skip_trivia();
    if parser.at_end() {
        return Err(parser.error("empty document"));
    }
    let value = parser.parse_value()?;
    parser.skip_trivia();
    match parser.peek_char() {
        None => Ok(value),
        Some(c) => Err(parser.error(&format!("unexpected `{}` after the document", c))),
    }
}

#[derive(Clone, Copy)]
struct Mark {
    position: usize,
    line: usize,
    column: usize,
}

struct Parser<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            input,
            position: 0,
            line: 1,
            column: 1,
            depth: 0,
        }
    }

    fn error(&self, message: &str) -> Error {
        Error::syntax(CsonFormat::NAME, self.line, self.column, message)
    }

    fn mark(&self) -> Mark {
        Mark {
            position: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn reset(&mut self, mark: Mark) {
        self.position = mark.position;
        self.line = mark.line;
        self.column = mark.column;
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.position..].chars().nth(n)
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn starts_with(&self, pattern: &str) -> bool {
        self.input[self.position..].starts_with(pattern)
    }

    fn skip_spaces(&mut self) {
        while matches!(self.peek_char(), Some(' ' | '\t' | '\r')) {
            self.next_char();
        }
    }

    fn skip_line_comment(&mut self) {
        while !matches!(self.peek_char(), None | Some('\n')) {
            self.next_char();
        }
    }

    /// Skips spaces and a trailing `#` comment, stopping before the newline.
    fn skip_inline(&mut self) {
        self.skip_spaces();
        if self.peek_char() == Some('#') {
            self.skip_line_comment();
        }
    }

    /// Skips whitespace, newlines and comments of both kinds.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(' ' | '\t' | '\r' | '\n') => {
                    self.next_char();
                }
                Some('#') if self.starts_with("###") && self.peek_nth(3) != Some('#') => {
                    self.skip_block_comment();
                }
                Some('#') => self.skip_line_comment(),
                _ => break,
            }
        }
    }

    fn skip_block_comment(&mut self) {
        for _ in 0..3 {
            self.next_char();
        }
        while !self.at_end() && !self.starts_with("###") {
            self.next_char();
        }
        for _ in 0..3 {
            self.next_char();
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.peek_char() {
            Some(c) if c == expected => {
                self.next_char();
                Ok(())
            }
            Some(c) => Err(self.error(&format!("expected `{}`, found `{}`", expected, c))),
            None => Err(self.error(&format!("expected `{}`, found end of input", expected))),
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        if self.depth == MAX_DEPTH {
            return Err(self.error(&format!("nesting deeper than {} levels", MAX_DEPTH)));
        }
        self.depth += 1;
        let value = if self.looks_like_key() {
            self.parse_implicit_object()
        } else {
            self.parse_inline()
        };
        self.depth -= 1;
        value
    }

    fn parse_inline(&mut self) -> Result<Value> {
        match self.peek_char() {
            Some('{') => self.parse_braced_object(),
            Some('[') => self.parse_array(),
            Some('\'' | '"') => self.parse_string().map(Value::String),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.parse_number(),
            Some(c) if is_identifier_start(c) => self.parse_keyword(),
            Some(c) => Err(self.error(&format!("unexpected character `{}`", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_keyword(&mut self) -> Result<Value> {
        let start = self.mark();
        let word = self.parse_identifier();
        match word {
            "true" | "yes" | "on" => Ok(Value::Bool(true)),
            "false" | "no" | "off" => Ok(Value::Bool(false)),
            "null" | "undefined" => Ok(Value::Null),
            "NaN" => Ok(Value::Number(Number::Float(f64::NAN))),
            "Infinity" => Ok(Value::Number(Number::Float(f64::INFINITY))),
            other => {
                let message = format!("unexpected identifier `{}`", other);
                self.reset(start);
                Err(self.error(&message))
            }
        }
    }

    fn parse_identifier(&mut self) -> &'a str {
        let input = self.input;
        let start = self.position;
        while self.peek_char().is_some_and(is_identifier_char) {
            self.next_char();
        }
        &input[start..self.position]
    }

    /// Looks ahead for `key:` without consuming input.
    fn looks_like_key(&mut self) -> bool {
        let start = self.mark();
        let key = match self.peek_char() {
            Some(c) if is_identifier_start(c) => {
                self.parse_identifier();
                true
            }
            Some(c) if c.is_ascii_digit() => {
                while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                    self.next_char();
                }
                true
            }
            Some(quote @ ('\'' | '"')) => {
                let triple = self.peek_nth(1) == Some(quote) && self.peek_nth(2) == Some(quote);
                !triple && self.parse_string().is_ok()
            }
            _ => false,
        };
        let is_key = key && {
            self.skip_spaces();
            self.peek_char() == Some(':')
        };
        self.reset(start);
        is_key
    }

    fn parse_key(&mut self) -> Result<String> {
        match self.peek_char() {
            Some(c) if is_identifier_start(c) => Ok(self.parse_identifier().to_string()),
            Some(c) if c.is_ascii_digit() => {
                let start = self.position;
                while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                    self.next_char();
                }
                Ok(self.input[start..self.position].to_string())
            }
            Some('\'' | '"') => self.parse_string(),
            _ => Err(self.error("expected a key")),
        }
    }

    fn parse_implicit_object(&mut self) -> Result<Value> {
        let indent = self.column;
        let mut map = Map::new();
        loop {
            let key = self.parse_key()?;
            self.skip_spaces();
            self.expect(':')?;
            let value = self.parse_member_value(indent)?;
            map.insert(key, value);

            self.skip_inline();
            if self.peek_char() == Some(',') {
                let before_comma = self.mark();
                self.next_char();
                self.skip_inline();
                if !matches!(self.peek_char(), None | Some('\n')) {
                    if self.looks_like_key() {
                        continue;
                    }
                    self.reset(before_comma);
                    return Ok(Value::Object(map));
                }
            }

            let line = self.line;
            let end = self.mark();
            self.skip_trivia();
            match self.peek_char() {
                None | Some(']' | '}' | ',') => {
                    self.reset(end);
                    return Ok(Value::Object(map));
                }
                Some(_) if self.line == line => {
                    return Err(self.error("expected a newline or `,` between members"));
                }
                Some(_) if self.column == indent => {}
                Some(_) if self.column < indent => {
                    self.reset(end);
                    return Ok(Value::Object(map));
                }
                Some(_) => return Err(self.error("unexpected indentation")),
            }
        }
    }

    /// Reads the value after `key:`, either on the same line or as an
    /// indented block below it.
    fn parse_member_value(&mut self, indent: usize) -> Result<Value> {
        self.skip_inline();
        if !matches!(self.peek_char(), None | Some('\n')) {
            return self.parse_value();
        }
        self.skip_trivia();
        match self.peek_char() {
            Some(c) if self.column > indent && !matches!(c, ']' | '}' | ',') => self.parse_value(),
            _ => Err(self.error("missing value after `:`")),
        }
    }

    fn parse_braced_object(&mut self) -> Result<Value> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_trivia();
            match self.peek_char() {
                Some('}') => {
                    self.next_char();
                    return Ok(Value::Object(map));
                }
                Some(',') => {
                    self.next_char();
                }
                None => return Err(self.error("unterminated object")),
                Some(_) => {
                    let key = self.parse_key()?;
                    self.skip_spaces();
                    self.expect(':')?;
                    self.skip_inline();
                    if matches!(self.peek_char(), None | Some('\n')) {
                        self.skip_trivia();
                    }
                    let value = self.parse_value()?;
                    map.insert(key, value);
                    self.expect_separator('}')?;
                }
            }
        }
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek_char() {
                Some(']') => {
                    self.next_char();
                    return Ok(Value::Array(items));
                }
                Some(',') => {
                    self.next_char();
                }
                None => return Err(self.error("unterminated array")),
                Some(_) => {
                    items.push(self.parse_value()?);
                    self.expect_separator(']')?;
                }
            }
        }
    }

    /// After a collection element: a comma, newline, the closing bracket or
    /// end of input must follow on the same line.
    fn expect_separator(&mut self, close: char) -> Result<()> {
        self.skip_inline();
        match self.peek_char() {
            None | Some(',' | '\n') => Ok(()),
            Some(c) if c == close => Ok(()),
            Some(c) => Err(self.error(&format!("expected `,` or `{}`, found `{}`", close, c))),
        }
    }

    fn parse_string(&mut self) -> Result<String> {
        let quote = match self.next_char() {
            Some(quote @ ('\'' | '"')) => quote,
            _ => return Err(self.error("expected a string")),
        };
        if self.peek_char() == Some(quote) && self.peek_nth(1) == Some(quote) {
            self.next_char();
            self.next_char();
            return self.parse_block_string(quote);
        }

        let mut out = String::new();
        loop {
            match self.next_char() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => self.parse_escape(&mut out)?,
                Some('\r') if self.peek_char() == Some('\n') => {}
                Some('\n') => {
                    // Line breaks inside a single-line string fold to one space.
                    while out.ends_with(' ') || out.ends_with('\t') {
                        out.pop();
                    }
                    while matches!(self.peek_char(), Some(' ' | '\t')) {
                        self.next_char();
                    }
                    out.push(' ');
                }
                Some(c) => out.push(c),
            }
        }
    }

    /// Reads a `'''` or `"""` string after its opening quotes. The common
    /// leading indentation is removed, as are a leading and a trailing blank
    /// line.
    fn parse_block_string(&mut self, quote: char) -> Result<String> {
        let input = self.input;
        let start = self.position;
        loop {
            if self.at_end() {
                return Err(self.error("unterminated block string"));
            }
            if self.peek_char() == Some(quote)
                && self.peek_nth(1) == Some(quote)
                && self.peek_nth(2) == Some(quote)
            {
                break;
            }
            if self.next_char() == Some('\\') {
                self.next_char();
            }
        }
        let raw = &input[start..self.position];
        for _ in 0..3 {
            self.next_char();
        }

        let mut lines: Vec<&str> = raw.split('\n').map(|l| l.trim_end_matches('\r')).collect();
        if lines.len() > 1 && lines.first().is_some_and(|l| l.trim().is_empty()) {
            lines.remove(0);
        }
        if lines.len() > 1 && lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }
        let common = lines
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.len() - l.trim_start_matches([' ', '\t']).len())
            .min()
            .unwrap_or(0);
        let body = lines
            .iter()
            .map(|l| l.get(common..).unwrap_or_else(|| l.trim_start()))
            .collect::<Vec<_>>()
            .join("\n");

        let mut inner = Parser::new(&body);
        let mut out = String::with_capacity(body.len());
        while let Some(c) = inner.next_char() {
            if c == '\\' {
                inner.parse_escape(&mut out)?;
            } else {
                out.push(c);
            }
        }
        Ok(out)
    }

    fn parse_escape(&mut self, out: &mut String) -> Result<()> {
        match self.next_char() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some('u') => {
                let unit = self.parse_hex4()?;
                let code = if (0xD800..0xDC00).contains(&unit) && self.starts_with("\\u") {
                    self.next_char();
                    self.next_char();
                    let low = self.parse_hex4()?;
                    0x10000 + ((unit - 0xD800) << 10) + (low.wrapping_sub(0xDC00) & 0x3FF)
                } else {
                    unit
                };
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            Some('\n') => {
                while matches!(self.peek_char(), Some(' ' | '\t')) {
                    self.next_char();
                }
            }
            Some(c) => out.push(c),
            None => return Err(self.error("unterminated escape sequence")),
        }
        Ok(())
    }

    fn parse_hex4(&mut self) -> Result<u32> {
        let mut code = 0;
        for _ in 0..4 {
            let digit = self
                .next_char()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error("invalid unicode escape"))?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn parse_number(&mut self) -> Result<Value> {
        let negative = match self.peek_char() {
            Some('-') => {
                self.next_char();
                true
            }
            Some('+') => {
                self.next_char();
                false
            }
            _ => false,
        };

        if self.peek_char() == Some('I') {
            return match self.parse_identifier() {
                "Infinity" => Ok(Value::Number(Number::Float(if negative {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                }))),
                _ => Err(self.error("invalid number")),
            };
        }

        if self.starts_with("0x") || self.starts_with("0X") {
            self.next_char();
            self.next_char();
            let start = self.position;
            while self.peek_char().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.next_char();
            }
            let magnitude = i64::from_str_radix(&self.input[start..self.position], 16)
                .map_err(|_| self.error("invalid hexadecimal number"))?;
            return Ok(Value::Number(Number::Integer(if negative {
                -magnitude
            } else {
                magnitude
            })));
        }

        let start = self.position;
        let mut is_float = false;
        while let Some(c) = self.peek_char() {
            match c {
                '0'..='9' => {}
                '.' | 'e' | 'E' => is_float = true,
                '+' | '-' if matches!(self.input[..self.position].chars().last(), Some('e' | 'E')) => {}
                _ => break,
            }
            self.next_char();
        }
        let digits = &self.input[start..self.position];
        if digits.is_empty() {
            return Err(self.error("invalid number"));
        }

        if !is_float {
            if let Ok(integer) = digits.parse::<i64>() {
                return Ok(Value::Number(Number::Integer(if negative {
                    -integer
                } else {
                    integer
                })));
            }
        }
        let float = digits
            .parse::<f64>()
            .map_err(|_| self.error(&format!("invalid number `{}`", digits)))?;
        Ok(Value::Number(Number::Float(if negative { -float } else { float })))
    }
}
