//! The formatter seam.
//!
//! The transform hands its output to a [`Formatter`] together with the file
//! name, so an external tool can infer the style from it. [`BasicFormatter`]
//! only normalizes the edges of the document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Opaque formatter options, passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatOptions(pub Map<String, Value>);

impl FormatOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an option.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Iterates over the options.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Whether no options are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A formatter failure.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The formatter could not be started.
    #[error("failed to run formatter: {0}")]
    Spawn(#[from] std::io::Error),

    /// The formatter rejected the input.
    #[error("formatter failed on {file_name}: {message}")]
    Rejected {
        /// The file name hint.
        file_name: String,
        /// The formatter's diagnostic output.
        message: String,
    },

    /// The formatter produced output that is not valid UTF-8.
    #[error("formatter produced invalid UTF-8 for {0}")]
    InvalidOutput(String),
}

/// Re-flows generated source to a canonical style.
pub trait Formatter: Send + Sync {
    /// Formats `code`. `file_name` is a hint for style inference and is not read.
    fn format(
        &self,
        code: &str,
        file_name: &str,
        options: &FormatOptions,
    ) -> Result<String, FormatError>;
}

/// Strips leading newlines and ends the document with exactly one newline.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicFormatter;

impl Formatter for BasicFormatter {
    fn format(
        &self,
        code: &str,
        _file_name: &str,
        _options: &FormatOptions,
    ) -> Result<String, FormatError> {
        let trimmed = code.trim_start_matches('\n').trim_end_matches('\n');
        if trimmed.is_empty() {
            return Ok(String::new());
        }
        let mut out = String::with_capacity(trimmed.len() + 1);
        out.push_str(trimmed);
        out.push('\n');
        Ok(out)
    }
}
