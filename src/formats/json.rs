//! JSON via `serde_json`.
//!
//! Output is pretty-printed with a four-space indent by default. Input may
//! carry `//` and `/* */` comments, which are stripped before parsing.

use crate::format::Format;
use crate::{Error, Result, Value};
use json_comments::{CommentSettings, StripComments};
use serde::Serialize;

pub const DEFAULT_INDENT: usize = 4;

/// JSON adapter. Supports decode transforms.
#[derive(Clone, Debug)]
pub struct JsonFormat {
    indent: usize,
    strip_comments: bool,
}

impl JsonFormat {
    pub const NAME: &'static str = "json";

    #[must_use]
    pub fn new() -> Self {
        JsonFormat {
            indent: DEFAULT_INDENT,
            strip_comments: true,
        }
    }

    /// Indent width; `0` produces compact single-line output.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_comments(mut self, strip: bool) -> Self {
        self.strip_comments = strip;
        self
    }
}

impl Default for JsonFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl Format for JsonFormat {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn encode(&self, value: &Value) -> Result<String> {
        if self.indent == 0 {
            return serde_json::to_string(value).map_err(|e| Error::encoding(Self::NAME, e));
        }
        let indent = vec![b' '; self.indent];
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
        let mut serializer = serde_json::Serializer::with_formatter(Vec::with_capacity(128), formatter);
        value
            .serialize(&mut serializer)
            .map_err(|e| Error::encoding(Self::NAME, e))?;
        String::from_utf8(serializer.into_inner()).map_err(|e| Error::encoding(Self::NAME, e))
    }

    fn decode(&self, text: &str) -> Result<Value> {
        tracing::trace!(strip_comments = self.strip_comments, "parsing json");
        let parsed = if self.strip_comments {
            let stripped = StripComments::with_settings(CommentSettings::c_style(), text.as_bytes());
            serde_json::from_reader(stripped)
        } else {
            serde_json::from_str(text)
        };
        parsed.map_err(|e| Error::decoding(Self::NAME, e))
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
    fn test_encode_uses_four_space_indent() {
        let text = JsonFormat::new().encode(&value!({ "a": [1] })).unwrap();
        assert_eq!(text, "{\n    \"a\": [\n        1\n    ]\n}");
    }

    #[test]
    fn test_encode_compact() {
        let text = JsonFormat::new()
            .with_indent(0)
            .encode(&value!({ "a": [1, 2] }))
            .unwrap();
        assert_eq!(text, r#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_non_finite_numbers_encode_as_null() {
        let text = JsonFormat::new()
            .with_indent(0)
            .encode(&Value::from(f64::NAN))
            .unwrap();
        assert_eq!(text, "null");
    }

    #[test]
    fn test_decode_strips_comments() {
        let text = "{\n  // line comment\n  \"a\": 1, /* block */ \"b\": \"//not a comment\"\n}";
        let value = JsonFormat::new().decode(text).unwrap();
        assert_eq!(value, value!({ "a": 1, "b": "//not a comment" }));
    }

    #[test]
    fn test_decode_rejects_comments_when_disabled() {
        let err = JsonFormat::new()
            .with_comments(false)
            .decode("{ // no\n }")
            .unwrap_err();
        assert!(err.is_decoding());
    }

    #[test]
    fn test_decode_rejects_malformed() {
        let err = JsonFormat::new().decode("{\"a\": }").unwrap_err();
        assert!(matches!(err, Error::Decoding { ref format, .. } if format == "json"));
    }
}
