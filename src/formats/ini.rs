//! INI via `rust-ini`.
//!
//! Nested objects map to dotted section names (`[server.tls]`), arrays of
//! scalars to repeated `key[]` entries, and a top-level array to sections
//! named by index. INI is text-only: on decode every value is a string except
//! the literals `true`, `false` and `null`, and a top-level object whose keys
//! are exactly `"0"..n` is turned back into an array.
//!
//! Strings the reader would alter (surrounding whitespace, a leading quote, a
//! bare `true`/`false`/`null`) are written as JSON string literals and read
//! back through `serde_json`. Keys have `=`, `:`, `;` and `#` escaped.

use crate::format::Format;
use crate::{Error, Map, Result, Value};
use ini::{EscapePolicy, Ini, LineSeparator, WriteOption};

const ARRAY_SUFFIX: &str = "[]";

/// INI adapter.
#[derive(Clone, Copy, Debug, Default)]
pub struct IniFormat;

impl IniFormat {
    pub const NAME: &'static str = "ini";
}

impl Format for IniFormat {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn encode(&self, value: &Value) -> Result<String> {
        let mut doc = Ini::new();
        match value {
            Value::Object(map) => write_section(&mut doc, None, map)?,
            Value::Array(items) => {
                let indexed: Map = items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| (index.to_string(), item.clone()))
                    .collect();
                write_section(&mut doc, None, &indexed)?;
            }
            other => {
                return Err(Error::encoding(
                    Self::NAME,
                    format!("INI encoding requires an object or array, found {}", other.kind()),
                ))
            }
        }

        let mut out = Vec::new();
        let option = WriteOption {
            escape_policy: EscapePolicy::Reserved,
            line_separator: LineSeparator::CR,
            kv_separator: "=",
        };
        doc.write_to_opt(&mut out, option)
            .map_err(|e| Error::encoding(Self::NAME, e))?;
        String::from_utf8(out).map_err(|e| Error::encoding(Self::NAME, e))
    }

    fn decode(&self, text: &str) -> Result<Value> {
        let doc = Ini::load_from_str(text).map_err(|e| Error::decoding(Self::NAME, e))?;
        let mut root = Map::new();
        for (section, properties) in doc.iter() {
            let target = match section {
                None => &mut root,
                Some(name) => section_map(&mut root, name)?,
            };
            for (key, raw) in properties.iter() {
                insert_property(target, key, raw);
            }
        }
        Ok(into_sequence(root))
    }
}

/// Writes the scalar and array members of `map` into `section`, then each
/// nested object as a dotted child section.
fn write_section(doc: &mut Ini, section: Option<&str>, map: &Map) -> Result<()> {
    for (key, member) in map {
        match member {
            Value::Object(_) => {}
            Value::Array(items) => {
                let array_key = format!("{}{}", key, ARRAY_SUFFIX);
                check_key(key)?;
                for item in items {
                    let text = property_text(item)?.ok_or_else(|| {
                        Error::encoding(
                            IniFormat::NAME,
                            format!("array `{}` holds {}, INI arrays hold scalars only", key, item.kind()),
                        )
                    })?;
                    doc.with_section(section).add(array_key.as_str(), text);
                }
            }
            scalar => {
                check_key(key)?;
                let text = property_text(scalar)?.unwrap_or_default();
                doc.with_section(section).set(key.as_str(), text);
            }
        }
    }

    for (key, member) in map {
        if let Value::Object(child) = member {
            let name = match section {
                Some(parent) => format!("{}.{}", parent, key),
                None => key.clone(),
            };
            tracing::trace!(section = %name, "writing ini section");
            write_section(doc, Some(&name), child)?;
        }
    }
    Ok(())
}

/// The reader trims keys and starts a section at a leading `[`.
fn check_key(key: &str) -> Result<()> {
    if key.trim() != key || key.starts_with('[') {
        return Err(Error::encoding(
            IniFormat::NAME,
            format!("key {:?} cannot be written as an INI property", key),
        ));
    }
    Ok(())
}

fn property_text(value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(Some("null".to_string())),
        Value::String(s) if needs_quoting(s) => {
            let literal = serde_json::to_string(s).map_err(|e| Error::encoding(IniFormat::NAME, e))?;
            Ok(Some(quote_segments(&literal)))
        }
        other => Ok(other.scalar_text()),
    }
}

fn needs_quoting(s: &str) -> bool {
    s.trim() != s || s.starts_with(['"', '\'']) || matches!(s, "true" | "false" | "null")
}

/// Wraps `text` in quote segments the reader strips and joins back together,
/// switching between `'` and `"` whenever the text holds the current quote.
fn quote_segments(text: &str) -> String {
    let mut quote = if text.starts_with('\'') { '"' } else { '\'' };
    let mut out = String::with_capacity(text.len() + 4);
    out.push(quote);
    for c in text.chars() {
        if c == quote {
            out.push(quote);
            quote = if quote == '"' { '\'' } else { '"' };
            out.push(quote);
        }
        out.push(c);
    }
    out.push(quote);
    out
}

/// Walks (creating as needed) the object a dotted section name points at.
fn section_map<'a>(root: &'a mut Map, name: &str) -> Result<&'a mut Map> {
    let mut current = root;
    for part in name.split('.') {
        if !current.contains_key(part) {
            current.insert(part.to_string(), Value::Object(Map::new()));
        }
        current = match current.get_mut(part) {
            Some(Value::Object(child)) => child,
            _ => {
                return Err(Error::decoding(
                    IniFormat::NAME,
                    format!("section [{}] conflicts with the value at `{}`", name, part),
                ))
            }
        };
    }
    Ok(current)
}

fn insert_property(target: &mut Map, key: &str, raw: &str) {
    match key.strip_suffix(ARRAY_SUFFIX) {
        Some(array_key) => match target.get_mut(array_key) {
            Some(Value::Array(items)) => items.push(coerce(raw)),
            _ => {
                target.insert(array_key.to_string(), Value::Array(vec![coerce(raw)]));
            }
        },
        None => {
            target.insert(key.to_string(), coerce(raw));
        }
    }
}

fn coerce(raw: &str) -> Value {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        if let Ok(text) = serde_json::from_str::<String>(raw) {
            return Value::String(text);
        }
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        text => Value::String(text.to_string()),
    }
}

/// Turns the top-level object back into an array when its keys are exactly
/// `"0"..n`. Nested objects are left alone.
fn into_sequence(root: Map) -> Value {
    if looks_like_array(&root) {
        tracing::trace!(len = root.len(), "ini top level decoded as array");
        Value::Array(into_ordered(root))
    } else {
        Value::Object(root)
    }
}

/// Whether the keys of `map` are exactly the canonical decimal indices
/// `0..map.len()` in any order.
///
/// An empty map qualifies. Keys with leading zeros (`"01"`) or signs do not.
///
/// ```rust
/// use anyfmt::formats::ini::looks_like_array;
/// use anyfmt::{value, Value};
///
/// let indexed = value!({ "1": "b", "0": "a" });
/// assert!(looks_like_array(indexed.as_object().unwrap()));
///
/// let gapped = value!({ "0": "a", "2": "c" });
/// assert!(!looks_like_array(gapped.as_object().unwrap()));
/// ```
#[must_use]
pub fn looks_like_array(map: &Map) -> bool {
    let mut seen = vec![false; map.len()];
    for key in map.keys() {
        match canonical_index(key) {
            Some(index) if index < seen.len() && !seen[index] => seen[index] = true,
            _ => return false,
        }
    }
    true
}

fn canonical_index(key: &str) -> Option<usize> {
    let digits_only = !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit());
    if !digits_only || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    key.parse().ok()
}

fn into_ordered(map: Map) -> Vec<Value> {
    let mut slots = vec![Value::Null; map.len()];
    for (key, member) in map {
        if let Some(slot) = canonical_index(&key).and_then(|index| slots.get_mut(index)) {
            *slot = member;
        }
    }
    slots
}
