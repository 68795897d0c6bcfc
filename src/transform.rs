//! Reviver-style decode transforms.
//!
//! A transform receives each key/value pair of a decoded document and returns
//! the value to keep. Children are visited before their parent, array
//! elements receive their index as the key, and the root is visited last
//! under the empty key.
//!
//! Returning `None` removes an object member. Array elements cannot be
//! removed without shifting indices, so a `None` for an element leaves
//! [`Value::Null`] in its slot; `None` for the root yields `Null`.
//!
//! ```rust
//! use anyfmt::{decode_with_transform, Value};
//!
//! let drop_private = |key: &str, value: Value| {
//!     if key.starts_with('_') { None } else { Some(value) }
//! };
//! let value = decode_with_transform(r#"{"a": 1, "_secret": 2}"#, "json", &drop_private).unwrap();
//! assert_eq!(value.as_object().unwrap().len(), 1);
//! ```

use crate::Value;

/// Signature of a decode transform: `(key, value) -> Some(kept value) | None`.
pub type Transform<'a> = dyn Fn(&str, Value) -> Option<Value> + 'a;

/// Applies `transform` to every key/value pair of `value`, bottom-up.
pub fn revive(value: Value, transform: &Transform<'_>) -> Value {
    let value = revive_children(value, transform);
    transform("", value).unwrap_or(Value::Null)
}

fn revive_children(value: Value, transform: &Transform<'_>) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    let item = revive_children(item, transform);
                    transform(&index.to_string(), item).unwrap_or(Value::Null)
                })
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter_map(|(key, member)| {
                    let member = revive_children(member, transform);
                    transform(&key, member).map(|kept| (key, kept))
                })
                .collect(),
        ),
        scalar => scalar,
    }
}
