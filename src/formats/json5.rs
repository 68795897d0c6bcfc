//! JSON5: a hand-written writer and the `json5` crate for reading.
//!
//! The writer lays out one item per line like `JSON.stringify` with an
//! indent (a zero indent gives single-line output). Keys stay bare when they
//! are plain identifiers, and every float is written so it reads back as a
//! float. Decode accepts the full grammar (comments, trailing commas,
//! unquoted keys, single-quoted strings).

use crate::format::Format;
use crate::formats::float_text;
use crate::{Error, Map, Number, Result, Value};

pub const DEFAULT_INDENT: usize = 4;

/// Identifiers that must stay quoted when used as keys.
const RESERVED: &[&str] = &[
    "true", "false", "null", "NaN", "Infinity", "break", "case", "catch", "class", "const",
    "continue", "debugger", "default", "delete", "do", "else", "enum", "export", "extends",
    "finally", "for", "function", "if", "import", "in", "instanceof", "new", "return", "super",
    "switch", "this", "throw", "try", "typeof", "var", "void", "while", "with",
];

/// JSON5 adapter. Supports decode transforms.
#[derive(Clone, Debug)]
pub struct Json5Format {
    indent: usize,
}

impl Json5Format {
    pub const NAME: &'static str = "json5";

    #[must_use]
    pub fn new() -> Self {
        Json5Format {
            indent: DEFAULT_INDENT,
        }
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

impl Default for Json5Format {
    fn default() -> Self {
        Self::new()
    }
}

impl Format for Json5Format {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn encode(&self, value: &Value) -> Result<String> {
        let mut writer = Writer {
            output: String::with_capacity(128),
            indent: self.indent,
        };
        writer.write_value(value, 0);
        Ok(writer.output)
    }

    fn decode(&self, text: &str) -> Result<Value> {
        json5::from_str(text).map_err(|e| Error::decoding(Self::NAME, e))
    }

    fn supports_transform(&self) -> bool {
        true
    }
}

struct Writer {
    output: String,
    indent: usize,
}

impl Writer {
    /// Starts a new line at `level`. A zero indent keeps everything on one
    /// line.
    fn break_line(&mut self, level: usize) {
        if self.indent == 0 {
            return;
        }
        self.output.push('\n');
        for _ in 0..level * self.indent {
            self.output.push(' ');
        }
    }

    fn write_value(&mut self, value: &Value, level: usize) {
        match value {
            Value::Null => self.output.push_str("null"),
            Value::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Value::Number(Number::Float(f)) => match float_text(*f) {
                Some(text) => self.output.push_str(&text),
                None if f.is_nan() => self.output.push_str("NaN"),
                None if *f > 0.0 => self.output.push_str("Infinity"),
                None => self.output.push_str("-Infinity"),
            },
            Value::Number(n) => self.output.push_str(&n.to_string()),
            Value::String(s) => self.write_string(s),
            Value::Array(items) if items.is_empty() => self.output.push_str("[]"),
            Value::Array(items) => {
                self.output.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.output.push(',');
                    }
                    self.break_line(level + 1);
                    self.write_value(item, level + 1);
                }
                self.break_line(level);
                self.output.push(']');
            }
            Value::Object(map) if map.is_empty() => self.output.push_str("{}"),
            Value::Object(map) => self.write_object(map, level),
        }
    }

    fn write_object(&mut self, map: &Map, level: usize) {
        self.output.push('{');
        for (i, (key, member)) in map.iter().enumerate() {
            if i > 0 {
                self.output.push(',');
            }
            self.break_line(level + 1);
            if is_bare_key(key) {
                self.output.push_str(key);
            } else {
                self.write_string(key);
            }
            self.output.push_str(if self.indent == 0 { ":" } else { ": " });
            self.write_value(member, level + 1);
        }
        self.break_line(level);
        self.output.push('}');
    }

    /// Double-quoted, with line and paragraph separators escaped since the
    /// reader rejects them raw.
    fn write_string(&mut self, s: &str) {
        self.output.push('"');
        for c in s.chars() {
            match c {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                c if c.is_control() || matches!(c, '\u{2028}' | '\u{2029}') => {
                    self.output.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => self.output.push(c),
            }
        }
        self.output.push('"');
    }
}

fn is_bare_key(key: &str) -> bool {
    key.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && !RESERVED.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    #[test]
    fn test_decode_extensions() {
        let text = "{\n  // comment\n  unquoted: 'single',\n  list: [1, 2,],\n}";
        let value = Json5Format::new().decode(text).unwrap();
        assert_eq!(
            value,
            value!({ "unquoted": "single", "list": [1, 2] })
        );
    }

    #[test]
    fn test_encode_layout() {
        let value = value!({ "name": "alice", "tags": ["a", 2], "odd key": null, "null": {} });
        let text = Json5Format::new().encode(&value).unwrap();
        assert_eq!(
            text,
            "{\n    name: \"alice\",\n    tags: [\n        \"a\",\n        2\n    ],\n    \"odd key\": null,\n    \"null\": {}\n}"
        );
        let narrow = Json5Format::new().with_indent(2).encode(&value!([1])).unwrap();
        assert_eq!(narrow, "[\n  1\n]");
        let compact = Json5Format::new().with_indent(0).encode(&value).unwrap();
        assert_eq!(compact, "{name:\"alice\",tags:[\"a\",2],\"odd key\":null,\"null\":{}}");
    }

    #[test]
    fn test_roundtrip() {
        let value = value!({ "a": "x", "b": [true, null, 1.5], "c": {}, "d": [] });
        let format = Json5Format::new();
        let text = format.encode(&value).unwrap();
        assert_eq!(format.decode(&text).unwrap(), value);
    }

    #[test]
    fn test_large_floats_read_back() {
        let value = value!({ "n": 1.5e20, "big": 1e300, "tiny": 2.5e-300, "whole": 7.0 });
        let format = Json5Format::new();
        let text = format.encode(&value).unwrap();
        assert!(text.contains("n: 1.5e20,"), "{}", text);
        assert_eq!(format.decode(&text).unwrap(), value);
    }

    #[test]
    fn test_line_separators_are_escaped() {
        let value = value!({ "s": "ls\u{2028}x\u{2029}y", "ctl": "a\u{1}b\tc" });
        let format = Json5Format::new();
        let text = format.encode(&value).unwrap();
        assert!(text.contains("\"ls\\u2028x\\u2029y\""), "{}", text);
        assert!(!text.contains('\u{2028}'));
        assert_eq!(format.decode(&text).unwrap(), value);
    }

    #[test]
    fn test_non_finite_floats() {
        let value = Value::Array(vec![
            Value::from(f64::INFINITY),
            Value::from(f64::NEG_INFINITY),
            Value::from(f64::NAN),
        ]);
        let text = Json5Format::new().with_indent(0).encode(&value).unwrap();
        assert_eq!(text, "[Infinity,-Infinity,NaN]");
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(Json5Format::new().decode("{a: }").unwrap_err().is_decoding());
    }
}
