//! XML via `quick-xml`, using the xml2js value mapping.
//!
//! # Value mapping
//!
//! | XML | Value |
//! |-----|-------|
//! | element with neither attributes nor children | its text, `""` when empty |
//! | attributes | object under `"$"` |
//! | non-whitespace text beside attributes or children | string under `"_"` |
//! | child elements | one array per child name, even for a single child |
//! | document | `{ root-name: root-content }` |
//!
//! Encoding accepts the same shape and is lenient about arrays: an array
//! member repeats its element once per item, and arrays that have no element
//! name of their own (nested or top-level) render as `<item>` children.
//! A value that is an object with exactly one key names its own root element;
//! anything else is wrapped in the configured root name.

use crate::format::Format;
use crate::formats::MAX_DEPTH;
use crate::options::DEFAULT_ROOT_NAME;
use crate::{Error, Map, Result, Value};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

pub const DEFAULT_INDENT: usize = 2;

/// Member holding an element's attributes.
pub const ATTRIBUTES_KEY: &str = "$";
/// Member holding an element's character data.
pub const TEXT_KEY: &str = "_";
const ITEM_NAME: &str = "item";

/// XML adapter.
#[derive(Clone, Debug)]
pub struct XmlFormat {
    root_name: String,
    indent: usize,
}

impl XmlFormat {
    pub const NAME: &'static str = "xml";

    #[must_use]
    pub fn new() -> Self {
        XmlFormat {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            indent: DEFAULT_INDENT,
        }
    }

    #[must_use]
    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }

    /// Indent width; `0` writes the document on a single line.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    fn root<'v>(&'v self, value: &'v Value) -> (&'v str, &'v Value) {
        if let Value::Object(map) = value {
            if map.len() == 1 {
                if let Some((name, content)) = map.iter().next() {
                    if name != ATTRIBUTES_KEY && name != TEXT_KEY {
                        return (name.as_str(), content);
                    }
                }
            }
        }
        (self.root_name.as_str(), value)
    }
}

impl Default for XmlFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl Format for XmlFormat {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn encode(&self, value: &Value) -> Result<String> {
        let (root, content) = self.root(value);
        tracing::trace!(root, "writing xml document");

        let mut writer = if self.indent > 0 {
            Writer::new_with_indent(Vec::new(), b' ', self.indent)
        } else {
            Writer::new(Vec::new())
        };
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(encode_error)?;
        write_element(&mut writer, root, content)?;
        String::from_utf8(writer.into_inner()).map_err(encode_error)
    }

    fn decode(&self, text: &str) -> Result<Value> {
        let mut reader = Reader::from_str(text);
        let mut stack: Vec<Element> = Vec::new();
        let mut document: Option<Value> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(start)) => {
                    if stack.len() == MAX_DEPTH {
                        return Err(decode_error(format!(
                            "elements nested deeper than {} levels",
                            MAX_DEPTH
                        )));
                    }
                    stack.push(Element::open(&start)?);
                }
                Ok(Event::Empty(start)) => {
                    let element = Element::open(&start)?;
                    close(&mut stack, &mut document, element)?;
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| decode_error("closing tag without an open element"))?;
                    close(&mut stack, &mut document, element)?;
                }
                Ok(Event::Text(text)) => {
                    let content = text.unescape().map_err(decode_error)?;
                    append_text(&mut stack, &content)?;
                }
                Ok(Event::CData(data)) => {
                    let content = String::from_utf8_lossy(&data).into_owned();
                    append_text(&mut stack, &content)?;
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(decode_error(format!(
                        "{} at position {}",
                        e,
                        reader.buffer_position()
                    )))
                }
            }
        }

        if let Some(open) = stack.last() {
            return Err(decode_error(format!("unclosed element <{}>", open.name)));
        }
        document.ok_or_else(|| decode_error("document has no root element"))
    }
}

fn encode_error<E: std::fmt::Display>(e: E) -> Error {
    Error::encoding(XmlFormat::NAME, e)
}

fn decode_error<E: std::fmt::Display>(e: E) -> Error {
    Error::decoding(XmlFormat::NAME, e)
}

/// Accepts the `Name` production for the ASCII range and any alphabetic
/// character beyond it.
fn check_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == ':' => {
            chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_' | ':'))
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(encode_error(format!("`{}` is not a valid XML name", name)))
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<()> {
    check_name(name)?;
    match value {
        Value::Object(map) => write_object(writer, name, map),
        Value::Array(items) if items.is_empty() => writer
            .write_event(Event::Empty(BytesStart::new(name)))
            .map_err(encode_error),
        Value::Array(items) => {
            writer
                .write_event(Event::Start(BytesStart::new(name)))
                .map_err(encode_error)?;
            for item in items {
                write_element(writer, ITEM_NAME, item)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(encode_error)
        }
        scalar => write_text_element(writer, name, &scalar.scalar_text().unwrap_or_default()),
    }
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    if text.is_empty() {
        return writer
            .write_event(Event::Empty(BytesStart::new(name)))
            .map_err(encode_error);
    }
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(encode_error)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(encode_error)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(encode_error)
}

fn write_object(writer: &mut Writer<Vec<u8>>, name: &str, map: &Map) -> Result<()> {
    let mut start = BytesStart::new(name);
    let mut text = String::new();
    let mut children = Vec::new();

    for (key, member) in map {
        match key.as_str() {
            ATTRIBUTES_KEY => {
                let attributes = member.as_object().ok_or_else(|| {
                    encode_error(format!(
                        "`{}` must hold an object of attributes, found {}",
                        ATTRIBUTES_KEY,
                        member.kind()
                    ))
                })?;
                for (attribute, attribute_value) in attributes {
                    check_name(attribute)?;
                    let attribute_text = match attribute_value {
                        Value::Null => String::new(),
                        other => other.scalar_text().ok_or_else(|| {
                            encode_error(format!(
                                "attribute `{}` must be a scalar, found {}",
                                attribute,
                                other.kind()
                            ))
                        })?,
                    };
                    start.push_attribute((attribute.as_str(), attribute_text.as_str()));
                }
            }
            TEXT_KEY => {
                text = match member {
                    Value::Null => String::new(),
                    other => other.scalar_text().ok_or_else(|| {
                        encode_error(format!(
                            "`{}` must hold text, found {}",
                            TEXT_KEY,
                            other.kind()
                        ))
                    })?,
                };
            }
            _ => children.push((key.as_str(), member)),
        }
    }

    if children.is_empty() && text.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(encode_error);
    }
    writer.write_event(Event::Start(start)).map_err(encode_error)?;
    if !text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(&text)))
            .map_err(encode_error)?;
    }
    for (child, member) in children {
        match member {
            Value::Array(items) => {
                for item in items {
                    write_element(writer, child, item)?;
                }
            }
            other => write_element(writer, child, other)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(encode_error)
}

/// An element whose end tag has not been read yet.
struct Element {
    name: String,
    attributes: Map,
    children: Map,
    text: String,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(decode_error)?
            .to_string();
        let mut attributes = Map::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(decode_error)?;
            let key = std::str::from_utf8(attribute.key.as_ref())
                .map_err(decode_error)?
                .to_string();
            let value = attribute.unescape_value().map_err(decode_error)?.into_owned();
            attributes.insert(key, Value::String(value));
        }
        Ok(Element {
            name,
            attributes,
            children: Map::new(),
            text: String::new(),
        })
    }

    fn finish(self) -> (String, Value) {
        let has_text = !self.text.trim().is_empty();
        if self.attributes.is_empty() && self.children.is_empty() {
            let text = if has_text { self.text } else { String::new() };
            return (self.name, Value::String(text));
        }

        let mut object = Map::with_capacity(self.children.len() + 2);
        if !self.attributes.is_empty() {
            object.insert(ATTRIBUTES_KEY.to_string(), Value::Object(self.attributes));
        }
        if has_text {
            object.insert(TEXT_KEY.to_string(), Value::String(self.text));
        }
        for (child, items) in self.children {
            object.insert(child, items);
        }
        (self.name, Value::Object(object))
    }
}

fn append_text(stack: &mut [Element], content: &str) -> Result<()> {
    match stack.last_mut() {
        Some(element) => {
            element.text.push_str(content);
            Ok(())
        }
        None if content.trim().is_empty() => Ok(()),
        None => Err(decode_error("text outside the root element")),
    }
}

fn close(stack: &mut [Element], document: &mut Option<Value>, element: Element) -> Result<()> {
    let (name, content) = element.finish();
    match stack.last_mut() {
        Some(parent) => {
            match parent.children.get_mut(&name) {
                Some(Value::Array(items)) => items.push(content),
                _ => {
                    parent.children.insert(name, Value::Array(vec![content]));
                }
            }
            Ok(())
        }
        None if document.is_none() => {
            let mut root = Map::with_capacity(1);
            root.insert(name, content);
            *document = Some(Value::Object(root));
            Ok(())
        }
        None => Err(decode_error("document has more than one root element")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

    #[test]
    fn test_encode_single_key_names_root() {
        let text = XmlFormat::new()
            .encode(&value!({ "note": { "to": "Tove", "from": "Jani" } }))
            .unwrap();
        assert_eq!(
            text,
            format!("{}\n<note>\n  <to>Tove</to>\n  <from>Jani</from>\n</note>", DECLARATION)
        );
    }

    #[test]
    fn test_encode_default_root() {
        let text = XmlFormat::new()
            .with_indent(0)
            .encode(&value!({ "a": 1, "b": null }))
            .unwrap();
        assert_eq!(text, format!("{}<root><a>1</a><b/></root>", DECLARATION));
    }

    #[test]
    fn test_encode_custom_root_and_items() {
        let text = XmlFormat::new()
            .with_indent(0)
            .with_root_name("products")
            .encode(&value!([{ "id": 2 }, { "id": 3 }]))
            .unwrap();
        assert_eq!(
            text,
            format!(
                "{}<products><item><id>2</id></item><item><id>3</id></item></products>",
                DECLARATION
            )
        );
    }

    #[test]
    fn test_encode_attributes_text_and_repeats() {
        let value = value!({
            "list": {
                "$": { "kind": "tags" },
                "tag": ["a", "b"]
            }
        });
        let text = XmlFormat::new().with_indent(0).encode(&value).unwrap();
        assert_eq!(
            text,
            format!(
                "{}<list kind=\"tags\"><tag>a</tag><tag>b</tag></list>",
                DECLARATION
            )
        );
    }

    #[test]
    fn test_encode_escapes_text() {
        let text = XmlFormat::new()
            .with_indent(0)
            .encode(&value!({ "a": "x < y & z" }))
            .unwrap();
        assert!(text.ends_with("<a>x &lt; y &amp; z</a>"));
    }

    #[test]
    fn test_encode_rejects_invalid_names() {
        let err = XmlFormat::new()
            .encode(&value!({ "a": { "1bad": true } }))
            .unwrap_err();
        assert!(err.is_encoding());
        assert!(err.to_string().contains("1bad"));
    }

    #[test]
    fn test_decode_xml2js_shape() {
        let text = r#"<?xml version="1.0"?>
<note priority="high">
  <to>Tove</to>
  <from>Jani</from>
  <tag>a</tag>
  <tag>b</tag>
  <empty/>
</note>"#;
        let value = XmlFormat::new().decode(text).unwrap();
        assert_eq!(
            value,
            value!({
                "note": {
                    "$": { "priority": "high" },
                    "to": ["Tove"],
                    "from": ["Jani"],
                    "tag": ["a", "b"],
                    "empty": [""]
                }
            })
        );
    }

    #[test]
    fn test_decode_text_beside_attributes() {
        let value = XmlFormat::new()
            .decode(r#"<price currency="EUR">12.50</price>"#)
            .unwrap();
        assert_eq!(
            value,
            value!({ "price": { "$": { "currency": "EUR" }, "_": "12.50" } })
        );
    }

    #[test]
    fn test_decode_unescapes_entities() {
        let value = XmlFormat::new()
            .decode(r#"<a t="&quot;q&quot;">x &lt; y</a>"#)
            .unwrap();
        assert_eq!(value, value!({ "a": { "$": { "t": "\"q\"" }, "_": "x < y" } }));
    }

    #[test]
    fn test_decode_errors() {
        let format = XmlFormat::new();
        assert!(format.decode("").unwrap_err().is_decoding());
        assert!(format.decode("<a><b></a>").unwrap_err().is_decoding());
        assert!(format.decode("<a>").unwrap_err().is_decoding());
        assert!(format.decode("<a/><b/>").unwrap_err().is_decoding());
    }

    fn nested_elements(depth: usize) -> String {
        format!("{}x{}", "<a>".repeat(depth), "</a>".repeat(depth))
    }

    #[test]
    fn test_nesting_limit() {
        let format = XmlFormat::new();
        assert!(format.decode(&nested_elements(MAX_DEPTH)).is_ok());
        assert!(format.decode(&nested_elements(MAX_DEPTH + 1)).unwrap_err().is_decoding());
        assert!(format.decode(&nested_elements(200_000)).unwrap_err().is_decoding());
    }

    #[test]
    fn test_roundtrip_of_decoded_shape() {
        let format = XmlFormat::new();
        let text = r#"<catalog><book id="1"><title>Rust</title></book><book id="2"><title>Go</title></book></catalog>"#;
        let decoded = format.decode(text).unwrap();
        let again = format.decode(&format.encode(&decoded).unwrap()).unwrap();
        assert_eq!(again, decoded);
    }
}
