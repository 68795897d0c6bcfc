//! Hjson: a hand-written writer and `deser-hjson` for reading.
//!
//! The writer always emits root braces, one member per line without commas,
//! and quoteless keys and strings wherever Hjson reads them back unchanged.
//! Anything else is written as a JSON string, which Hjson accepts verbatim.

use crate::format::Format;
use crate::formats::float_text;
use crate::{Error, Map, Number, Result, Value};

pub const DEFAULT_INDENT: usize = 2;

/// Words that Hjson would read back as something other than a string.
const KEYWORDS: &[&str] = &["true", "false", "null", "NaN", "Infinity"];

/// Hjson adapter.
#[derive(Clone, Debug)]
pub struct HjsonFormat {
    indent: usize,
}

impl HjsonFormat {
    pub const NAME: &'static str = "hjson";

    #[must_use]
    pub fn new() -> Self {
        HjsonFormat {
            indent: DEFAULT_INDENT,
        }
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

impl Default for HjsonFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl Format for HjsonFormat {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn encode(&self, value: &Value) -> Result<String> {
        let mut writer = Writer {
            output: String::with_capacity(128),
            indent: self.indent,
        };
        writer.write_value(value, 0)?;
        Ok(writer.output)
    }

    fn decode(&self, text: &str) -> Result<Value> {
        deser_hjson::from_str(text).map_err(|e| Error::decoding(Self::NAME, e))
    }
}

struct Writer {
    output: String,
    indent: usize,
}

impl Writer {
    fn pad(&mut self, level: usize) {
        for _ in 0..level * self.indent {
            self.output.push(' ');
        }
    }

    fn write_value(&mut self, value: &Value, level: usize) -> Result<()> {
        match value {
            Value::Null => self.output.push_str("null"),
            Value::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Value::Number(Number::Float(f)) => match float_text(*f) {
                Some(text) => self.output.push_str(&text),
                None => self.output.push_str("null"),
            },
            Value::Number(n) => self.output.push_str(&n.to_string()),
            Value::String(s) => self.write_string(s)?,
            Value::Array(items) if items.is_empty() => self.output.push_str("[]"),
            Value::Array(items) => {
                self.output.push_str("[\n");
                for item in items {
                    self.pad(level + 1);
                    self.write_value(item, level + 1)?;
                    self.output.push('\n');
                }
                self.pad(level);
                self.output.push(']');
            }
            Value::Object(map) if map.is_empty() => self.output.push_str("{}"),
            Value::Object(map) => self.write_object(map, level)?,
        }
        Ok(())
    }

    fn write_object(&mut self, map: &Map, level: usize) -> Result<()> {
        self.output.push_str("{\n");
        for (key, member) in map {
            self.pad(level + 1);
            if is_quoteless_key(key) {
                self.output.push_str(key);
            } else {
                self.write_json_string(key)?;
            }
            self.output.push_str(": ");
            self.write_value(member, level + 1)?;
            self.output.push('\n');
        }
        self.pad(level);
        self.output.push('}');
        Ok(())
    }

    fn write_string(&mut self, s: &str) -> Result<()> {
        if is_quoteless_string(s) {
            self.output.push_str(s);
            Ok(())
        } else {
            self.write_json_string(s)
        }
    }

    fn write_json_string(&mut self, s: &str) -> Result<()> {
        let quoted = serde_json::to_string(s).map_err(|e| Error::encoding(HjsonFormat::NAME, e))?;
        self.output.push_str(&quoted);
        Ok(())
    }
}

fn is_quoteless_key(key: &str) -> bool {
    key.starts_with(|c: char| c.is_alphabetic() || c == '_')
        && key
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '$'))
}

/// A quoteless string runs to the end of its line, so it must not start like
/// any other value, must not contain comment or structural characters, and
/// must not carry surrounding whitespace.
fn is_quoteless_string(s: &str) -> bool {
    let mut chars = s.chars();
    let starts_plain = chars.next().is_some_and(char::is_alphabetic);
    starts_plain
        && !s.ends_with(char::is_whitespace)
        && !KEYWORDS.iter().any(|keyword| s.starts_with(keyword))
        && s.chars().all(|c| {
            c.is_alphanumeric() || matches!(c, ' ' | '_' | '-' | '.' | '@' | '!' | '?' | '(' | ')' | '&' | '%' | '+')
        })
}
