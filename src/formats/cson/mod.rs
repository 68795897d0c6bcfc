//! CSON (CoffeeScript Object Notation).
//!
//! No maintained serde backend exists for CSON, so this module carries its
//! own writer ([`ser`]) and reader ([`de`]). The writer emits two-space
//! indented CoffeeScript with single-quoted strings; the reader accepts the
//! data subset of CoffeeScript described in [`de`].

pub mod de;
pub mod ser;

use crate::format::Format;
use crate::{Result, Value};

pub const DEFAULT_INDENT: usize = 2;

/// CSON adapter. Supports decode transforms.
#[derive(Clone, Debug)]
pub struct CsonFormat {
    indent: usize,
}

impl CsonFormat {
    pub const NAME: &'static str = "cson";

    #[must_use]
    pub fn new() -> Self {
        CsonFormat {
            indent: DEFAULT_INDENT,
        }
    }

    /// Indent width. Clamped to at least one space, since block structure
    /// depends on indentation.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent.max(1);
        self
    }
}

impl Default for CsonFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl Format for CsonFormat {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn encode(&self, value: &Value) -> Result<String> {
        let mut writer = ser::Writer::new(self.indent);
        writer.write_document(value);
        Ok(writer.into_inner())
    }

    fn decode(&self, text: &str) -> Result<Value> {
        tracing::trace!(bytes = text.len(), "parsing cson");
        de::from_str(text)
    }

    fn supports_transform(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    #[test]
    fn test_roundtrip_nested_document() {
        let value = value!({
            "name": "An ice sculpture",
            "price": 12.5,
            "tags": ["cold", "ice"],
            "dimensions": { "length": 7, "width": 12, "height": 9.5 },
            "stock": [{ "warehouse": "north", "count": 3 }, { "warehouse": "south", "count": 0 }],
            "notes": "line one\nline 'two'",
            "empty": {},
            "none": null
        });
        let format = CsonFormat::new();
        let text = format.encode(&value).unwrap();
        assert_eq!(format.decode(&text).unwrap(), value);
    }

    #[test]
    fn test_roundtrip_with_wide_indent() {
        let value = value!({ "a": { "b": [1, { "c": [] }] } });
        let format = CsonFormat::new().with_indent(4);
        assert_eq!(format.decode(&format.encode(&value).unwrap()).unwrap(), value);
    }

    #[test]
    fn test_top_level_array_of_objects() {
        let value = value!([{ "id": 2 }, { "id": 3 }]);
        let format = CsonFormat::new();
        let text = format.encode(&value).unwrap();
        assert_eq!(text, "[\n  {\n    id: 2\n  }\n  {\n    id: 3\n  }\n]");
        assert_eq!(format.decode(&text).unwrap(), value);
    }

    #[test]
    fn test_transform() {
        let double = |_: &str, value: Value| match value.as_i64() {
            Some(n) => Some(Value::from(n * 2)),
            None => Some(value),
        };
        let value = CsonFormat::new().decode_with("a: 1\nb: [2]", &double).unwrap();
        assert_eq!(value, value!({ "a": 2, "b": [4] }));
    }
}
