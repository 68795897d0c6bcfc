//! TOML via the `toml` crate.
//!
//! TOML documents are always tables and have no null, so encoding rejects a
//! non-object root and any null inside the tree. Decoded datetimes become
//! their RFC 3339 string form.

use crate::format::Format;
use crate::{Error, Map, Number, Result, Value};

/// TOML adapter.
#[derive(Clone, Copy, Debug, Default)]
pub struct TomlFormat;

impl TomlFormat {
    pub const NAME: &'static str = "toml";
}

impl Format for TomlFormat {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn encode(&self, value: &Value) -> Result<String> {
        let table = match value {
            Value::Object(map) => to_table(map, "")?,
            other => {
                return Err(Error::encoding(
                    Self::NAME,
                    format!(
                        "a TOML document must be a table, found {}; wrap the value in a named key",
                        other.kind()
                    ),
                ))
            }
        };
        toml::to_string(&table).map_err(|e| Error::encoding(Self::NAME, e))
    }

    fn decode(&self, text: &str) -> Result<Value> {
        let table = text
            .parse::<toml::Table>()
            .map_err(|e| Error::decoding(Self::NAME, e))?;
        Ok(Value::Object(from_table(table)))
    }
}

fn to_table(map: &Map, path: &str) -> Result<toml::Table> {
    let mut table = toml::Table::new();
    for (key, member) in map {
        let member_path = if path.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", path, key)
        };
        table.insert(key.clone(), to_toml(member, &member_path)?);
    }
    Ok(table)
}

fn to_toml(value: &Value, path: &str) -> Result<toml::Value> {
    Ok(match value {
        Value::Null => {
            return Err(Error::encoding(
                TomlFormat::NAME,
                format!("TOML has no null value (at `{}`)", path),
            ))
        }
        Value::Bool(b) => toml::Value::Boolean(*b),
        Value::Number(Number::Integer(i)) => toml::Value::Integer(*i),
        Value::Number(Number::Float(f)) => toml::Value::Float(*f),
        Value::String(s) => toml::Value::String(s.clone()),
        Value::Array(items) => toml::Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| to_toml(item, &format!("{}[{}]", path, index)))
                .collect::<Result<Vec<_>>>()?,
        ),
        Value::Object(map) => toml::Value::Table(to_table(map, path)?),
    })
}

fn from_table(table: toml::Table) -> Map {
    table
        .into_iter()
        .map(|(key, member)| (key, from_toml(member)))
        .collect()
}

fn from_toml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(Number::Integer(i)),
        toml::Value::Float(f) => Value::Number(Number::Float(f)),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(datetime) => Value::String(datetime.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(from_toml).collect()),
        toml::Value::Table(table) => Value::Object(from_table(table)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    #[test]
    fn test_encode_nested_tables() {
        let value = value!({ "title": "demo", "owner": { "name": "Tom" } });
        let text = TomlFormat.encode(&value).unwrap();
        assert_eq!(text, "title = \"demo\"\n\n[owner]\nname = \"Tom\"\n");
    }

    #[test]
    fn test_encode_rejects_non_table_root() {
        let err = TomlFormat.encode(&value!([1, 2])).unwrap_err();
        assert!(err.is_encoding());
        assert!(err.to_string().contains("wrap the value in a named key"));
    }

    #[test]
    fn test_encode_rejects_null_with_path() {
        let err = TomlFormat
            .encode(&value!({ "a": { "b": [1, null] } }))
            .unwrap_err();
        assert!(err.to_string().contains("a.b[1]"));
    }

    #[test]
    fn test_decode_preserves_types_and_order() {
        let value = TomlFormat
            .decode("z = 1\na = 2.5\nflag = false\nlist = [\"x\"]\n")
            .unwrap();
        assert_eq!(
            value,
            value!({ "z": 1, "a": 2.5, "flag": false, "list": ["x"] })
        );
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["z", "a", "flag", "list"]);
    }

    #[test]
    fn test_decode_datetime_as_string() {
        let value = TomlFormat.decode("at = 1979-05-27T07:32:00Z\n").unwrap();
        assert_eq!(value, value!({ "at": "1979-05-27T07:32:00Z" }));
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(TomlFormat.decode("a = ").unwrap_err().is_decoding());
    }
}
