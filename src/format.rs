//! The two-method contract every format adapter fulfils.
//!
//! An adapter wraps one serialization backend behind [`Format::encode`] and
//! [`Format::decode`], applying whatever shape normalization the backend needs
//! so that callers only ever see [`Value`]s. Adapters hold nothing but their
//! construction-time options, so a single instance can serve concurrent calls.
//!
//! ## Implementing a new format
//!
//! ```rust
//! use anyfmt::{Error, Format, FormatOptions, Registry, Result, Value};
//!
//! /// Writes scalars as plain text lines.
//! struct Lines;
//!
//! impl Format for Lines {
//!     fn name(&self) -> &str {
//!         "lines"
//!     }
//!
//!     fn encode(&self, value: &Value) -> Result<String> {
//!         match value {
//!             Value::Array(items) => Ok(items.iter().map(|v| v.to_string() + "\n").collect()),
//!             other => Err(Error::encoding("lines", format!("expected array, found {}", other.kind()))),
//!         }
//!     }
//!
//!     fn decode(&self, text: &str) -> Result<Value> {
//!         Ok(Value::Array(text.lines().map(Value::from).collect()))
//!     }
//! }
//!
//! let mut registry = Registry::with_options(&FormatOptions::default()).unwrap();
//! registry.register(Box::new(Lines)).unwrap();
//! assert_eq!(registry.decode("a\nb\n", "lines").unwrap().as_array().unwrap().len(), 2);
//! ```

use crate::transform::{revive, Transform};
use crate::{Error, Result, Value};

/// A format adapter: one serialization backend behind a uniform encode/decode pair.
pub trait Format: Send + Sync {
    /// The identifier this adapter is registered under, e.g. `"yaml"`.
    fn name(&self) -> &str;

    /// Serializes `value` into this format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] when the value's shape cannot be expressed
    /// in the format.
    fn encode(&self, value: &Value) -> Result<String>;

    /// Parses `text` into a [`Value`].
    ///
    /// # Errors
    ///
    /// Returns a decoding error when `text` is not well-formed for the format.
    fn decode(&self, text: &str) -> Result<Value>;

    /// Whether [`Format::decode_with`] applies a transform for this format.
    fn supports_transform(&self) -> bool {
        false
    }

    /// Parses `text` and applies `transform` to every decoded key/value pair,
    /// innermost first, finishing with the root under the key `""`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransformUnsupported`] for adapters that do not
    /// declare transform support, and any error [`Format::decode`] returns.
    fn decode_with(&self, text: &str, transform: &Transform<'_>) -> Result<Value> {
        if !self.supports_transform() {
            return Err(Error::transform_unsupported(self.name()));
        }
        self.decode(text).map(|value| revive(value, transform))
    }
}
