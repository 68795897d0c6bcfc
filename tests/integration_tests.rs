use anyfmt::{
    decode, decode_with_transform, default_registry, encode, formats, from_value, to_value, value,
    Error, Format, FormatOptions, Registry, Result, Value,
};
use serde::{Deserialize, Serialize};
use std::thread;

const ALL_FORMATS: [&str; 9] = [
    "json", "json5", "yaml", "toml", "csv", "ini", "xml", "cson", "hjson",
];

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Dimensions {
    length: f64,
    width: f64,
    height: f64,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Product {
    id: u32,
    name: String,
    price: f64,
    tags: Vec<String>,
    dimensions: Dimensions,
}

fn ice_sculpture() -> Product {
    Product {
        id: 2,
        name: "An ice sculpture".to_string(),
        price: 12.5,
        tags: vec!["cold".to_string(), "ice".to_string()],
        dimensions: Dimensions {
            length: 7.0,
            width: 12.0,
            height: 9.5,
        },
    }
}

#[test]
fn test_json_and_yaml_end_to_end() {
    let value = value!({ "a": 1, "b": [2, 3] });

    let json = encode(&value, "json").unwrap();
    assert!(serde_json::from_str::<serde_json::Value>(&json).is_ok());
    assert_eq!(decode(&json, "json").unwrap(), value);

    let yaml = encode(&value, "yaml").unwrap();
    assert_eq!(decode(&yaml, "yaml").unwrap(), value);
}

#[test]
fn test_registered_identifiers() {
    assert_eq!(formats().collect::<Vec<_>>(), ALL_FORMATS);
    for name in ALL_FORMATS {
        assert!(default_registry().contains(name));
    }
}

#[test]
fn test_unknown_format_for_encode_and_decode() {
    let value = value!({ "a": 1 });
    for name in ["JSON", "Yaml", "yml", "xml ", "", "unknown-format", "toml5"] {
        match encode(&value, name) {
            Err(Error::UnknownFormat(reported)) => assert_eq!(reported, name),
            other => panic!("encode with {:?} returned {:?}", name, other),
        }
        match decode("{}", name) {
            Err(Error::UnknownFormat(reported)) => assert_eq!(reported, name),
            other => panic!("decode with {:?} returned {:?}", name, other),
        }
    }
}

#[test]
fn test_unknown_format_message() {
    let err = decode("", "foo").unwrap_err();
    assert_eq!(err.to_string(), "Unknown format foo!");
}

#[test]
fn test_csv_rejects_mapping() {
    let err = encode(&value!({ "a": 1 }), "csv").unwrap_err();
    assert!(matches!(err, Error::Encoding { ref format, .. } if format == "csv"));
}

#[test]
fn test_ini_sequence_detection() {
    assert_eq!(
        decode("0=a\n1=b\n2=c\n", "ini").unwrap(),
        value!(["a", "b", "c"])
    );
    assert_eq!(
        decode("0=a\n2=c\n", "ini").unwrap(),
        value!({ "0": "a", "2": "c" })
    );
}

#[test]
fn test_json_comments_are_decode_only() {
    let value = decode("// header\n{\"a\": 1}\n", "json").unwrap();
    assert_eq!(value, value!({ "a": 1 }));
    let text = encode(&value, "json").unwrap();
    assert!(!text.contains("//"));
}

#[test]
fn test_toml_top_level_sequence_fails() {
    let err = encode(&value!([1, 2, 3]), "toml").unwrap_err();
    assert!(err.is_encoding());
    let wrapped = encode(&value!({ "items": [1, 2, 3] }), "toml").unwrap();
    assert_eq!(decode(&wrapped, "toml").unwrap(), value!({ "items": [1, 2, 3] }));
}

#[test]
fn test_typed_roundtrip_through_lossless_formats() {
    let product = ice_sculpture();
    let value = to_value(&product).unwrap();
    for format in ["json", "json5", "yaml", "toml", "cson", "hjson"] {
        let text = encode(&value, format).unwrap();
        let back: Product = from_value(decode(&text, format).unwrap()).unwrap();
        assert_eq!(back, product, "{} output was:\n{}", format, text);
    }
}

#[test]
fn test_typed_binding_through_ini_strings() {
    let value = to_value(&ice_sculpture()).unwrap();
    let text = encode(&value, "ini").unwrap();
    let decoded = decode(&text, "ini").unwrap();
    assert_eq!(decoded.as_object().unwrap().get("id"), Some(&value!("2")));
    let back: Product = from_value(decoded).unwrap();
    assert_eq!(back, ice_sculpture());
}

#[test]
fn test_cross_format_conversion() {
    let toml = "title = \"demo\"\n\n[owner]\nname = \"Tom\"\nadmin = true\n";
    let value = decode(toml, "toml").unwrap();
    let cson = encode(&value, "cson").unwrap();
    let hjson = encode(&decode(&cson, "cson").unwrap(), "hjson").unwrap();
    let json5 = encode(&decode(&hjson, "hjson").unwrap(), "json5").unwrap();
    assert_eq!(decode(&json5, "json5").unwrap(), value);
}

#[test]
fn test_transform_supported_formats() {
    let uppercase = |_: &str, value: Value| match value {
        Value::String(s) => Some(Value::String(s.to_uppercase())),
        other => Some(other),
    };
    let expected = value!({ "name": "ALICE", "tags": ["A", "B"] });
    let inputs = [
        ("json", r#"{"name": "alice", "tags": ["a", "b"]}"#),
        ("json5", "{name: 'alice', tags: ['a', 'b']}"),
        ("cson", "name: 'alice'\ntags: ['a', 'b']"),
    ];
    for (format, text) in inputs {
        assert_eq!(
            decode_with_transform(text, format, &uppercase).unwrap(),
            expected,
            "format {}",
            format
        );
    }
}

#[test]
fn test_transform_rejected_by_other_formats() {
    let identity = |_: &str, value: Value| Some(value);
    for format in ["yaml", "toml", "csv", "ini", "xml", "hjson"] {
        match decode_with_transform("", format, &identity) {
            Err(Error::TransformUnsupported(name)) => assert_eq!(name, format),
            other => panic!("{} returned {:?}", format, other),
        }
    }
}

#[test]
fn test_transform_removes_members() {
    let drop_nulls = |_: &str, value: Value| if value.is_null() { None } else { Some(value) };
    let value = decode_with_transform(r#"{"a": null, "b": {"c": null, "d": 1}}"#, "json", &drop_nulls)
        .unwrap();
    assert_eq!(value, value!({ "b": { "d": 1 } }));
}

#[test]
fn test_errors_propagate_from_each_adapter() {
    let malformed = [
        ("json", "{"),
        ("json5", "{a:"),
        ("yaml", "a: [1"),
        ("toml", "a ="),
        ("csv", "a,b\n1,2,3\n"),
        ("xml", "<a>"),
        ("cson", "a: [1"),
        ("hjson", "{ a: [1, 2 }"),
    ];
    for (format, text) in malformed {
        let err = decode(text, format).unwrap_err();
        assert!(err.is_decoding(), "{}: {:?}", format, err);
        assert!(err.to_string().starts_with(format), "{}: {}", format, err);
    }
}

#[test]
fn test_concurrent_calls_share_registry() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let format = ALL_FORMATS[i % ALL_FORMATS.len()];
                let value = match format {
                    "csv" => value!([{ "n": "1" }]),
                    _ => value!({ "n": 1 }),
                };
                let text = encode(&value, format).unwrap();
                decode(&text, format).unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().is_ok());
    }
}

/// Reverses every string it decodes.
struct Backwards;

impl Format for Backwards {
    fn name(&self) -> &str {
        "backwards"
    }

    fn encode(&self, value: &Value) -> Result<String> {
        match value {
            Value::String(s) => Ok(s.chars().rev().collect()),
            other => Err(Error::encoding("backwards", format!("cannot reverse {}", other.kind()))),
        }
    }

    fn decode(&self, text: &str) -> Result<Value> {
        Ok(Value::String(text.chars().rev().collect()))
    }
}

#[test]
fn test_custom_adapter_registration() {
    let mut registry = Registry::with_options(&FormatOptions::default()).unwrap();
    registry.register(Box::new(Backwards)).unwrap();
    assert_eq!(registry.len(), 10);
    assert_eq!(registry.encode(&value!("abc"), "backwards").unwrap(), "cba");
    assert!(matches!(
        registry.register(Box::new(Backwards)),
        Err(Error::DuplicateFormat(_))
    ));
    assert!(matches!(
        registry.decode_with_transform("x", "backwards", &|_: &str, v: Value| Some(v)),
        Err(Error::TransformUnsupported(_))
    ));
}

#[test]
fn test_registry_options() {
    let options = FormatOptions::new()
        .with_indent(2)
        .with_root_name("catalog")
        .with_delimiter(b'|')
        .with_json_comments(false);
    let registry = Registry::with_options(&options).unwrap();

    let csv = registry
        .encode(&value!([{ "a": 1, "b": 2 }]), "csv")
        .unwrap();
    assert_eq!(csv, "a|b\n1|2\n");

    let xml = registry.encode(&value!({ "a": 1, "b": 2 }), "xml").unwrap();
    assert!(xml.contains("<catalog>"));

    let json = registry.encode(&value!({ "a": 1 }), "json").unwrap();
    assert_eq!(json, "{\n  \"a\": 1\n}");

    let json5 = registry.encode(&value!({ "a": [1] }), "json5").unwrap();
    assert_eq!(json5, "{\n  a: [\n    1\n  ]\n}");

    assert!(registry.decode("// c\n{}", "json").is_err());
}
