//! Conversion of the product fixtures through every format, pinning down
//! what each format preserves and what it loses.

use anyfmt::{decode, encode, value, Value};

const PRODUCT_SET: &str = include_str!("fixtures/product-set.json");
const PRODUCT: &str = include_str!("fixtures/product.json");

fn product_set() -> Value {
    decode(PRODUCT_SET, "json").unwrap()
}

fn product() -> Value {
    decode(PRODUCT, "json").unwrap()
}

fn roundtrip(value: &Value, format: &str) -> Value {
    let text = encode(value, format).unwrap();
    decode(&text, format).unwrap_or_else(|e| panic!("{} failed on:\n{}\n{}", format, text, e))
}

#[test]
fn test_lossless_formats_roundtrip_product_set() {
    let value = product_set();
    for format in ["json", "json5", "yaml", "cson", "hjson"] {
        assert_eq!(roundtrip(&value, format), value, "format {}", format);
    }
}

#[test]
fn test_toml_roundtrips_single_product() {
    let value = product();
    assert_eq!(roundtrip(&value, "toml"), value);
}

#[test]
fn test_toml_rejects_product_set() {
    assert!(encode(&product_set(), "toml").unwrap_err().is_encoding());
}

#[test]
fn test_csv_product_set() {
    let text = encode(&product_set(), "csv").unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("id,name,price,tags,dimensions,warehouseLocation")
    );
    assert_eq!(
        lines.next(),
        Some(r#"2,An ice sculpture,12.5,"[""cold"",""ice""]","{""length"":7.0,""width"":12.0,""height"":9.5}","{""latitude"":-78.75,""longitude"":20.4}""#)
    );

    let rows = decode(&text, "csv").unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].as_object().unwrap().get("name"), Some(&value!("A blue mouse")));
    assert_eq!(rows[1].as_object().unwrap().get("price"), Some(&value!("25.5")));

    let tags = rows[0].as_object().unwrap().get("tags").and_then(Value::as_str).unwrap();
    assert_eq!(decode(tags, "json").unwrap(), value!(["cold", "ice"]));
}

#[test]
fn test_ini_product_set() {
    let text = encode(&product_set(), "ini").unwrap();
    assert!(text.contains("[0]\n"));
    assert!(text.contains("[0.dimensions]\n"));
    assert!(text.contains("tags[]=cold\n"));

    let decoded = decode(&text, "ini").unwrap();
    let expected = value!([
        {
            "id": "2",
            "name": "An ice sculpture",
            "price": "12.5",
            "tags": ["cold", "ice"],
            "dimensions": { "length": "7", "width": "12", "height": "9.5" },
            "warehouseLocation": { "latitude": "-78.75", "longitude": "20.4" }
        },
        {
            "id": "3",
            "name": "A blue mouse",
            "price": "25.5",
            "tags": ["blue", "toy"],
            "dimensions": { "length": "3.1", "width": "1", "height": "1" },
            "warehouseLocation": { "latitude": "54.4", "longitude": "-32.7" }
        }
    ]);
    assert_eq!(decoded, expected);
}

#[test]
fn test_xml_product_set() {
    let text = encode(&product_set(), "xml").unwrap();
    assert!(text.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
    assert!(text.contains("<root>"));
    assert!(text.contains("<name>An ice sculpture</name>"));

    let decoded = decode(&text, "xml").unwrap();
    let items = decoded
        .as_object()
        .and_then(|root| root.get("root"))
        .and_then(Value::as_object)
        .and_then(|root| root.get("item"))
        .and_then(Value::as_array)
        .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(
        items[0],
        value!({
            "id": ["2"],
            "name": ["An ice sculpture"],
            "price": ["12.5"],
            "tags": ["cold", "ice"],
            "dimensions": [{ "length": ["7"], "width": ["12"], "height": ["9.5"] }],
            "warehouseLocation": [{ "latitude": ["-78.75"], "longitude": ["20.4"] }]
        })
    );
}

#[test]
fn test_xml_single_product_names_root() {
    let wrapped = value!({ "product": { "name": "An ice sculpture" } });
    let text = encode(&wrapped, "xml").unwrap();
    assert!(text.contains("<product>"));
    assert_eq!(
        decode(&text, "xml").unwrap(),
        value!({ "product": { "name": ["An ice sculpture"] } })
    );
}

#[test]
fn test_yaml_output_is_readable() {
    let text = encode(&product(), "yaml").unwrap();
    assert!(text.starts_with("id: 2\nname: An ice sculpture\n"));
    assert!(text.contains("dimensions:\n  length: 7.0\n"));
}

#[test]
fn test_cson_output_shape() {
    let text = encode(&product(), "cson").unwrap();
    assert!(text.starts_with("id: 2\nname: 'An ice sculpture'\nprice: 12.5\ninStock: true\n"));
    assert!(text.contains("dimensions:\n  length: 7\n"));
}

#[test]
fn test_hjson_output_shape() {
    let text = encode(&product(), "hjson").unwrap();
    assert!(text.starts_with("{\n  id: 2\n  name: An ice sculpture\n"));
    assert!(text.ends_with("}"));
}

#[test]
fn test_json5_output_is_indented() {
    let text = encode(&value!({ "a": [1, "x"] }), "json5").unwrap();
    assert_eq!(text, "{\n    a: [\n        1,\n        \"x\"\n    ]\n}");
    assert_eq!(decode(&text, "json5").unwrap(), value!({ "a": [1, "x"] }));
}

#[test]
fn test_json_indentation() {
    let text = encode(&value!({ "a": { "b": 1 } }), "json").unwrap();
    assert_eq!(text, "{\n    \"a\": {\n        \"b\": 1\n    }\n}");
}
