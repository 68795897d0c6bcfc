//! # anyfmt
//!
//! One entry point for converting structured data between nine text
//! serialization formats.
//!
//! Every format is reached through the same two calls, [`encode`] and
//! [`decode`], with the format chosen by a lowercase identifier at runtime:
//!
//! | Identifier | Format | Backend |
//! |------------|--------|---------|
//! | `json`  | JSON (comments tolerated on decode) | `serde_json`, `json_comments` |
//! | `json5` | JSON5 | `json5` |
//! | `yaml`  | YAML | `serde_yaml` |
//! | `toml`  | TOML | `toml` |
//! | `csv`   | CSV with a header row | `csv` |
//! | `ini`   | INI with dotted section nesting | `rust-ini` |
//! | `xml`   | XML, xml2js-style mapping | `quick-xml` |
//! | `cson`  | CoffeeScript Object Notation | built in |
//! | `hjson` | Human JSON | built in writer, `deser-hjson` reader |
//!
//! Decoded documents are [`Value`] trees. Values built from typed data with
//! [`to_value`] can be encoded to any format, and decoded values bind back to
//! typed data with [`from_value`].
//!
//! ## Quick Start
//!
//! ```rust
//! use anyfmt::{decode, encode, value};
//!
//! let data = value!({ "name": "Alice", "tags": ["admin", "user"] });
//!
//! let yaml = encode(&data, "yaml").unwrap();
//! assert_eq!(yaml, "name: Alice\ntags:\n- admin\n- user\n");
//!
//! let back = decode(&yaml, "yaml").unwrap();
//! assert_eq!(back, data);
//! ```
//!
//! ### Converting between formats
//!
//! ```rust
//! use anyfmt::{decode, encode};
//!
//! let value = decode("[server]\nport = 8080\n", "toml").unwrap();
//! let json = encode(&value, "json").unwrap();
//! assert_eq!(json, "{\n    \"server\": {\n        \"port\": 8080\n    }\n}");
//! ```
//!
//! ### Typed data
//!
//! ```rust
//! use anyfmt::{decode, encode, from_value, to_value};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Product { id: u32, name: String, price: f64 }
//!
//! let product = Product { id: 2, name: "An ice sculpture".into(), price: 12.5 };
//! let text = encode(&to_value(&product).unwrap(), "cson").unwrap();
//!
//! let back: Product = from_value(decode(&text, "cson").unwrap()).unwrap();
//! assert_eq!(back, product);
//! ```
//!
//! ## Lossy formats
//!
//! Several formats cannot carry every value shape:
//!
//! - **CSV** only encodes arrays of objects and decodes every cell as a string.
//! - **INI** decodes every value as a string except `true`, `false` and `null`.
//!   A top-level object whose keys are exactly `0..n` decodes as an array.
//! - **XML** decodes to the xml2js shape: attributes under `$`, text under `_`,
//!   and every child element wrapped in an array.
//! - **TOML** cannot encode a top-level non-object or any `null`.
//!
//! ## Concurrency
//!
//! A [`Registry`] is immutable once built and adapters keep no per-call state,
//! so the shared [`default_registry`] serves concurrent callers without locking.

pub mod de;
pub mod error;
pub mod format;
pub mod formats;
pub mod macros;
pub mod map;
pub mod options;
pub mod registry;
pub mod ser;
pub mod transform;
pub mod value;

pub use de::{from_value, ValueDeserializer};
pub use error::{Error, Result};
pub use format::Format;
pub use map::Map;
pub use options::FormatOptions;
pub use registry::Registry;
pub use ser::{to_value, ValueSerializer};
pub use transform::Transform;
pub use value::{Number, Value};

use std::io;
use std::sync::OnceLock;

/// The process-wide registry holding the nine built-in adapters with default options.
///
/// Built on first use and shared afterwards.
pub fn default_registry() -> &'static Registry {
    static DEFAULT: OnceLock<Registry> = OnceLock::new();
    DEFAULT.get_or_init(|| {
        Registry::with_options(&FormatOptions::default()).unwrap_or_else(|e| {
            tracing::error!(error = %e, "built-in adapters could not be registered");
            Registry::empty()
        })
    })
}

/// Identifiers of the built-in formats, in registration order.
///
/// # Examples
///
/// ```rust
/// let names: Vec<&str> = anyfmt::formats().collect();
/// assert_eq!(names.len(), 9);
/// assert_eq!(names[0], "json");
/// ```
pub fn formats() -> impl Iterator<Item = &'static str> {
    default_registry().names()
}

/// Encode `value` into the format named `format`.
///
/// # Examples
///
/// ```rust
/// use anyfmt::{encode, value};
///
/// let csv = encode(&value!([{ "a": 1, "b": 2 }]), "csv").unwrap();
/// assert_eq!(csv, "a,b\n1,2\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::UnknownFormat`] if `format` is not a registered identifier
/// (matching is case-sensitive), or [`Error::Encoding`] if the value cannot be
/// represented in the format.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode(value: &Value, format: &str) -> Result<String> {
    default_registry().encode(value, format)
}

/// Decode `text` written in the format named `format`.
///
/// # Examples
///
/// ```rust
/// use anyfmt::{decode, value};
///
/// let value = decode("a: 1\nb: [true, null]\n", "yaml").unwrap();
/// assert_eq!(value, value!({ "a": 1, "b": [true, null] }));
/// ```
///
/// # Errors
///
/// Returns [`Error::UnknownFormat`] if `format` is not a registered identifier,
/// or a decoding error if `text` is not well-formed for the format.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode(text: &str, format: &str) -> Result<Value> {
    default_registry().decode(text, format)
}

/// Decode `text` and pass every key/value pair through `transform`.
///
/// Only `json`, `json5` and `cson` accept a transform; see [`transform`] for
/// the visiting order and removal rules.
///
/// # Errors
///
/// Returns [`Error::TransformUnsupported`] for the other formats, in addition
/// to the errors of [`decode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_with_transform(
    text: &str,
    format: &str,
    transform: &Transform<'_>,
) -> Result<Value> {
    default_registry().decode_with_transform(text, format, transform)
}

/// Encode `value` and write the text to `writer`.
///
/// # Examples
///
/// ```rust
/// use anyfmt::{encode_to_writer, value};
///
/// let mut buffer = Vec::new();
/// encode_to_writer(&mut buffer, &value!({ "a": 1 }), "toml").unwrap();
/// assert_eq!(buffer, b"a = 1\n");
/// ```
///
/// # Errors
///
/// Returns the errors of [`encode`], or [`Error::Io`] if writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_to_writer<W>(mut writer: W, value: &Value, format: &str) -> Result<()>
where
    W: io::Write,
{
    let text = encode(value, format)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))
}

/// Read all of `reader` and decode it.
///
/// # Examples
///
/// ```rust
/// use anyfmt::{decode_from_reader, value};
/// use std::io::Cursor;
///
/// let value = decode_from_reader(Cursor::new("a = 1"), "ini").unwrap();
/// assert_eq!(value, value!({ "a": "1" }));
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails or the input is not UTF-8, and the
/// errors of [`decode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_from_reader<R>(mut reader: R, format: &str) -> Result<Value>
where
    R: io::Read,
{
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| Error::io(&e.to_string()))?;
    decode(&text, format)
}
