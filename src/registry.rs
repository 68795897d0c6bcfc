//! Name-to-adapter dispatch.
//!
//! A [`Registry`] owns one adapter per format identifier and routes
//! encode/decode calls by exact, case-sensitive name. It is populated once
//! and read afterwards, so a shared `&Registry` serves any number of threads.
//!
//! ```rust
//! use anyfmt::{FormatOptions, Registry, value};
//!
//! let registry = Registry::with_options(&FormatOptions::default()).unwrap();
//! assert!(registry.contains("yaml"));
//! assert!(!registry.contains("YAML"));
//!
//! let yaml = registry.encode(&value!({ "a": 1 }), "yaml").unwrap();
//! assert_eq!(yaml, "a: 1\n");
//! ```

use crate::format::Format;
use crate::formats;
use crate::options::FormatOptions;
use crate::transform::Transform;
use crate::{Error, Result, Value};
use indexmap::IndexMap;
use tracing::debug;

/// A set of format adapters keyed by identifier, in registration order.
pub struct Registry {
    formats: IndexMap<String, Box<dyn Format>>,
}

impl Registry {
    /// Creates a registry holding no adapters.
    #[must_use]
    pub fn empty() -> Self {
        Registry {
            formats: IndexMap::new(),
        }
    }

    /// Creates a registry from `adapters`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateFormat`] if two adapters share an identifier.
    pub fn new<I>(adapters: I) -> Result<Self>
    where
        I: IntoIterator<Item = Box<dyn Format>>,
    {
        let mut registry = Registry::empty();
        for adapter in adapters {
            registry.register(adapter)?;
        }
        Ok(registry)
    }

    /// Creates a registry holding the nine built-in adapters, configured by `options`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use anyfmt::{FormatOptions, Registry, value};
    ///
    /// let registry = Registry::with_options(&FormatOptions::new().with_indent(2)).unwrap();
    /// let json = registry.encode(&value!({ "a": 1 }), "json").unwrap();
    /// assert_eq!(json, "{\n  \"a\": 1\n}");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateFormat`] under the same rule as [`Registry::new`].
    pub fn with_options(options: &FormatOptions) -> Result<Self> {
        Registry::new(formats::builtin(options))
    }

    /// Adds `adapter` under its own identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateFormat`] if the identifier is already taken;
    /// the registry is left unchanged.
    pub fn register(&mut self, adapter: Box<dyn Format>) -> Result<()> {
        let name = adapter.name().to_string();
        if self.formats.contains_key(&name) {
            return Err(Error::duplicate_format(&name));
        }
        debug!(format = %name, "registered format adapter");
        self.formats.insert(name, adapter);
        Ok(())
    }

    /// Looks up the adapter registered as `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Format> {
        self.formats.get(name).map(|adapter| adapter.as_ref())
    }

    /// Returns `true` if an adapter is registered as `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// Registered identifiers, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Encodes `value` with the adapter registered as `format`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFormat`] for an unregistered identifier, or the
    /// adapter's encoding error.
    pub fn encode(&self, value: &Value, format: &str) -> Result<String> {
        let adapter = self.lookup(format)?;
        debug!(format, kind = value.kind(), "encoding value");
        adapter.encode(value)
    }

    /// Decodes `text` with the adapter registered as `format`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFormat`] for an unregistered identifier, or the
    /// adapter's decoding error.
    pub fn decode(&self, text: &str, format: &str) -> Result<Value> {
        let adapter = self.lookup(format)?;
        debug!(format, bytes = text.len(), "decoding text");
        adapter.decode(text)
    }

    /// Decodes `text` and applies `transform` to every key/value pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFormat`] for an unregistered identifier,
    /// [`Error::TransformUnsupported`] when the adapter takes no transform,
    /// or the adapter's decoding error.
    pub fn decode_with_transform(
        &self,
        text: &str,
        format: &str,
        transform: &Transform<'_>,
    ) -> Result<Value> {
        let adapter = self.lookup(format)?;
        debug!(format, bytes = text.len(), "decoding text with transform");
        adapter.decode_with(text, transform)
    }

    fn lookup(&self, format: &str) -> Result<&dyn Format> {
        self.get(format).ok_or_else(|| {
            debug!(format, "no adapter registered");
            Error::unknown_format(format)
        })
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("formats", &self.formats.keys().collect::<Vec<_>>())
            .finish()
    }
}
