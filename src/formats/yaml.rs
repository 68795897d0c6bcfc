//! YAML via `serde_yaml`.

use crate::format::Format;
use crate::{Error, Result, Value};

/// YAML adapter.
#[derive(Clone, Copy, Debug, Default)]
pub struct YamlFormat;

impl YamlFormat {
    pub const NAME: &'static str = "yaml";
}

impl Format for YamlFormat {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn encode(&self, value: &Value) -> Result<String> {
        serde_yaml::to_string(value).map_err(|e| Error::encoding(Self::NAME, e))
    }

    fn decode(&self, text: &str) -> Result<Value> {
        serde_yaml::from_str(text).map_err(|e| Error::decoding(Self::NAME, e))
    }
}
