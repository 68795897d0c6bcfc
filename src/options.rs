//! Configuration options for the built-in format adapters.
//!
//! [`FormatOptions`] is consumed by [`Registry::with_options`](crate::Registry::with_options)
//! when the nine built-in adapters are constructed. The defaults reproduce the
//! conventional output of each format:
//!
//! | Setting | Default | Used by |
//! |---------|---------|---------|
//! | indent | 4 for JSON/JSON5, 2 for CSON/Hjson/XML | pretty-printing writers |
//! | root name | `root` | XML encode when the value has no single top-level key |
//! | delimiter | `,` | CSV encode and decode |
//! | comment stripping | on | JSON decode |
//!
//! ## Examples
//!
//! ```rust
//! use anyfmt::{FormatOptions, Registry, value};
//!
//! let options = FormatOptions::new().with_indent(2).with_delimiter(b';');
//! let registry = Registry::with_options(&options).unwrap();
//!
//! let csv = registry.encode(&value!([{ "a": 1, "b": 2 }]), "csv").unwrap();
//! assert_eq!(csv, "a;b\n1;2\n");
//! ```

/// Default XML root element name.
pub const DEFAULT_ROOT_NAME: &str = "root";

/// Configuration options for the built-in adapters.
#[derive(Clone, Debug, PartialEq)]
pub struct FormatOptions {
    /// Overrides every adapter's indentation width when set.
    pub indent: Option<usize>,
    /// XML root element used when the value does not name its own root.
    pub root_name: String,
    /// CSV field delimiter.
    pub delimiter: u8,
    /// Strip `//` and `/* */` comments before parsing JSON.
    pub json_comments: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            indent: None,
            root_name: DEFAULT_ROOT_NAME.to_string(),
            delimiter: b',',
            json_comments: true,
        }
    }
}

impl FormatOptions {
    /// Creates default options.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use anyfmt::FormatOptions;
    ///
    /// let options = FormatOptions::new();
    /// assert_eq!(options.indent, None);
    /// assert_eq!(options.root_name, "root");
    /// assert!(options.json_comments);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation width for every pretty-printing adapter.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = Some(indent);
        self
    }

    /// Sets the XML root element name.
    #[must_use]
    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }

    /// Sets the CSV delimiter byte.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enables or disables comment stripping on JSON decode.
    #[must_use]
    pub fn with_json_comments(mut self, enabled: bool) -> Self {
        self.json_comments = enabled;
        self
    }

    /// Indentation for an adapter whose own default is `default`.
    #[must_use]
    pub(crate) fn indent_or(&self, default: usize) -> usize {
        self.indent.unwrap_or(default)
    }
}
