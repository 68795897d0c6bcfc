//! Built-in format adapters.
//!
//! Each adapter wraps one backend and normalizes its output so that every
//! format decodes to, and encodes from, the same [`Value`](crate::Value) model.

pub mod cson;
pub mod csv;
pub mod hjson;
pub mod ini;
pub mod json;
pub mod json5;
pub mod toml;
pub mod xml;
pub mod yaml;

pub use self::cson::CsonFormat;
pub use self::csv::CsvFormat;
pub use self::hjson::HjsonFormat;
pub use self::ini::IniFormat;
pub use self::json::JsonFormat;
pub use self::json5::Json5Format;
pub use self::toml::TomlFormat;
pub use self::xml::XmlFormat;
pub use self::yaml::YamlFormat;

use crate::format::Format;
use crate::options::FormatOptions;

/// Deepest array/object nesting the hand-written readers accept, matching
/// `serde_json`'s recursion limit.
pub(crate) const MAX_DEPTH: usize = 128;

/// Shortest text for a finite float that always reads back as a float,
/// never as an integer: `7.0`, `1.5e20`, `1.0e300`. `None` for NaN and the
/// infinities.
pub(crate) fn float_text(f: f64) -> Option<String> {
    let text = serde_json::Number::from_f64(f)?.to_string();
    Some(match text.find(['e', 'E']) {
        Some(exponent) if !text[..exponent].contains('.') => {
            format!("{}.0{}", &text[..exponent], &text[exponent..])
        }
        _ => text,
    })
}

/// The nine built-in adapters, configured by `options`, in registration order.
pub(crate) fn builtin(options: &FormatOptions) -> Vec<Box<dyn Format>> {
    vec![
        Box::new(
            JsonFormat::new()
                .with_indent(options.indent_or(json::DEFAULT_INDENT))
                .with_comments(options.json_comments),
        ),
        Box::new(Json5Format::new().with_indent(options.indent_or(json5::DEFAULT_INDENT))),
        Box::new(YamlFormat),
        Box::new(TomlFormat),
        Box::new(CsvFormat::new().with_delimiter(options.delimiter)),
        Box::new(IniFormat),
        Box::new(
            XmlFormat::new()
                .with_root_name(options.root_name.clone())
                .with_indent(options.indent_or(xml::DEFAULT_INDENT)),
        ),
        Box::new(CsonFormat::new().with_indent(options.indent_or(cson::DEFAULT_INDENT))),
        Box::new(HjsonFormat::new().with_indent(options.indent_or(hjson::DEFAULT_INDENT))),
    ]
}
