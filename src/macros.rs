/// Builds a [`Value`](crate::Value) from JSON-like literal syntax.
///
/// ```rust
/// use anyfmt::{value, Value};
///
/// let v = value!({ "a": 1, "b": [2, 3], "c": null });
/// assert_eq!(v.as_object().unwrap().len(), 3);
/// assert_eq!(value!([]), Value::Array(vec![]));
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::Map::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::Map::new();
        $(
            object.insert($key.to_string(), $crate::value!($value));
        )*
        $crate::Value::Object(object)
    }};

    // Any other expression goes through its `From` conversion
    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Map, Number, Value};

    #[test]
    fn test_value_macro_primitives() {
        assert_eq!(value!(null), Value::Null);
        assert_eq!(value!(true), Value::Bool(true));
        assert_eq!(value!(false), Value::Bool(false));
        assert_eq!(value!(42), Value::Number(Number::Integer(42)));
        assert_eq!(value!(3.5), Value::Number(Number::Float(3.5)));
        assert_eq!(value!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_value_macro_nested() {
        assert_eq!(value!({}), Value::Object(Map::new()));

        let obj = value!({
            "name": "Alice",
            "tags": ["a", "b"],
            "dims": { "w": 1 }
        });

        match obj {
            Value::Object(map) => {
                assert_eq!(map.len(), 3);
                assert_eq!(map.get("name"), Some(&Value::from("Alice")));
                assert_eq!(
                    map.get("tags"),
                    Some(&Value::Array(vec![Value::from("a"), Value::from("b")]))
                );
                assert!(map.get("dims").map(Value::is_object).unwrap_or(false));
            }
            _ => panic!("Expected object"),
        }
    }
}
