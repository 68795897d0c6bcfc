//! CSON writer.
//!
//! Objects at the top level and as member values are written as indented
//! `key: value` blocks without braces. Objects inside arrays keep braces,
//! since an implicit object there would merge with its neighbours.

use crate::{Map, Number, Value};

/// Keywords that must be quoted when used as keys.
const RESERVED: &[&str] = &[
    "true", "false", "yes", "no", "on", "off", "null", "undefined", "NaN", "Infinity",
];

pub(crate) struct Writer {
    output: String,
    indent: usize,
}

impl Writer {
    pub(crate) fn new(indent: usize) -> Self {
        Writer {
            output: String::with_capacity(128),
            indent,
        }
    }

    pub(crate) fn into_inner(self) -> String {
        self.output
    }

    pub(crate) fn write_document(&mut self, value: &Value) {
        match value {
            Value::Object(map) if !map.is_empty() => self.write_members(map, 0),
            other => self.write_value(other, 0),
        }
    }

    fn pad(&mut self, level: usize) {
        for _ in 0..level * self.indent {
            self.output.push(' ');
        }
    }

    fn write_members(&mut self, map: &Map, level: usize) {
        for (index, (key, member)) in map.iter().enumerate() {
            if index > 0 {
                self.output.push('\n');
            }
            self.pad(level);
            self.write_key(key);
            self.output.push(':');
            match member {
                Value::Object(child) if !child.is_empty() => {
                    self.output.push('\n');
                    self.write_members(child, level + 1);
                }
                other => {
                    self.output.push(' ');
                    self.write_value(other, level);
                }
            }
        }
    }

    /// Writes `value` at the current position; continuation lines are
    /// indented relative to `level`.
    fn write_value(&mut self, value: &Value, level: usize) {
        match value {
            Value::Null => self.output.push_str("null"),
            Value::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => self.write_number(n),
            Value::String(s) => self.write_string(s),
            Value::Array(items) if items.is_empty() => self.output.push_str("[]"),
            Value::Array(items) => {
                self.output.push_str("[\n");
                for item in items {
                    self.pad(level + 1);
                    self.write_value(item, level + 1);
                    self.output.push('\n');
                }
                self.pad(level);
                self.output.push(']');
            }
            Value::Object(map) if map.is_empty() => self.output.push_str("{}"),
            Value::Object(map) => {
                self.output.push_str("{\n");
                self.write_members(map, level + 1);
                self.output.push('\n');
                self.pad(level);
                self.output.push('}');
            }
        }
    }

    fn write_number(&mut self, number: &Number) {
        match number {
            Number::Float(f) if f.is_nan() => self.output.push_str("NaN"),
            Number::Float(f) if f.is_infinite() => {
                self.output
                    .push_str(if *f > 0.0 { "Infinity" } else { "-Infinity" });
            }
            other => self.output.push_str(&other.to_string()),
        }
    }

    fn write_key(&mut self, key: &str) {
        if is_bare_key(key) {
            self.output.push_str(key);
        } else {
            self.write_string(key);
        }
    }

    fn write_string(&mut self, s: &str) {
        self.output.push('\'');
        for ch in s.chars() {
            match ch {
                '\'' => self.output.push_str("\\'"),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                '\u{8}' => self.output.push_str("\\b"),
                '\u{c}' => self.output.push_str("\\f"),
                c if c.is_control() => {
                    self.output.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => self.output.push(c),
            }
        }
        self.output.push('\'');
    }
}

pub(crate) fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn is_bare_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => {
            chars.all(is_identifier_char) && !RESERVED.contains(&key)
        }
        _ => false,
    }
}
