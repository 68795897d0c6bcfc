//! Error types for format dispatch, encoding and decoding.
//!
//! Every fallible operation in this crate returns [`Error`]. The variants follow
//! the point at which a conversion can fail:
//!
//! - **Lookup**: the requested format identifier is not registered
//!   ([`Error::UnknownFormat`])
//! - **Encoding**: the value's shape cannot be represented by the target format
//!   ([`Error::Encoding`])
//! - **Decoding**: the input text is not well-formed for the format
//!   ([`Error::Decoding`], or [`Error::Syntax`] with a position for the
//!   readers implemented in this crate)
//! - **Configuration**: two adapters claim the same identifier
//!   ([`Error::DuplicateFormat`]) or a transform was handed to an adapter
//!   that cannot apply one ([`Error::TransformUnsupported`])
//!
//! Messages coming from the backend libraries are kept verbatim, since they
//! usually carry the line/column context needed to fix the input.
//!
//! ## Examples
//!
//! ```rust
//! use anyfmt::{decode, Error};
//!
//! let err = decode("{}", "jsonx").unwrap_err();
//! assert!(matches!(err, Error::UnknownFormat(ref name) if name == "jsonx"));
//! assert_eq!(err.to_string(), "Unknown format jsonx!");
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised while converting between formats.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// No adapter is registered under the requested identifier
    #[error("Unknown format {0}!")]
    UnknownFormat(String),

    /// The value cannot be represented in the target format
    #[error("{format} encoding error: {message}")]
    Encoding { format: String, message: String },

    /// The input text is not valid for the format
    #[error("{format} decoding error: {message}")]
    Decoding { format: String, message: String },

    /// Syntax error with position, raised by the crate's own readers
    #[error("{format} syntax error at line {line}, column {col}: {message}")]
    Syntax {
        format: String,
        line: usize,
        col: usize,
        message: String,
    },

    /// Two adapters were registered under the same identifier
    #[error("format {0} is already registered")]
    DuplicateFormat(String),

    /// A decode transform was supplied to an adapter that does not apply one
    #[error("format {0} does not support decode transforms")]
    TransformUnsupported(String),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates an encoding error for `format`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use anyfmt::Error;
    ///
    /// let err = Error::encoding("csv", "CSV encoding requires the value be an array");
    /// assert!(err.is_encoding());
    /// assert!(err.to_string().starts_with("csv encoding error"));
    /// ```
    pub fn encoding<M: fmt::Display>(format: &str, message: M) -> Self {
        Error::Encoding {
            format: format.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates a decoding error for `format`, keeping the backend's message as-is.
    pub fn decoding<M: fmt::Display>(format: &str, message: M) -> Self {
        Error::Decoding {
            format: format.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates a positioned syntax error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use anyfmt::Error;
    ///
    /// let err = Error::syntax("cson", 3, 7, "unterminated string");
    /// assert!(err.is_decoding());
    /// assert!(err.to_string().contains("line 3, column 7"));
    /// ```
    pub fn syntax(format: &str, line: usize, col: usize, message: &str) -> Self {
        Error::Syntax {
            format: format.to_string(),
            line,
            col,
            message: message.to_string(),
        }
    }

    pub fn unknown_format(name: &str) -> Self {
        Error::UnknownFormat(name.to_string())
    }

    pub fn duplicate_format(name: &str) -> Self {
        Error::DuplicateFormat(name.to_string())
    }

    pub fn transform_unsupported(name: &str) -> Self {
        Error::TransformUnsupported(name.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns `true` if the value could not be represented in the target format.
    #[must_use]
    pub fn is_encoding(&self) -> bool {
        matches!(self, Error::Encoding { .. })
    }

    /// Returns `true` if the input text was rejected by a decoder.
    #[must_use]
    pub fn is_decoding(&self) -> bool {
        matches!(self, Error::Decoding { .. } | Error::Syntax { .. })
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
