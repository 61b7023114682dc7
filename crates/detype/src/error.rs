//! Error types for the transform.

use crate::format::FormatError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can fail a transform.
///
/// A failed transform never returns partial output.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The source could not be parsed.
    #[error("{file_name}:{line}:{column}: {message}")]
    Parse {
        /// The file name hint the source was parsed under.
        file_name: String,
        /// 1-based line in the original source.
        line: usize,
        /// 1-based column in the original source.
        column: usize,
        /// The parser's message.
        message: String,
    },

    /// The source uses a construct that cannot be erased without generating code.
    #[error("{file_name}: unsupported construct: {message}")]
    Unsupported {
        /// The file name hint.
        file_name: String,
        /// What was found.
        message: String,
    },

    /// A type passed to a component macro could not be resolved.
    #[error("{file_name}: cannot resolve type `{type_name}`: {reason}")]
    UnresolvableType {
        /// The file name hint.
        file_name: String,
        /// The type as written.
        type_name: String,
        /// Why resolution failed.
        reason: String,
    },

    /// The component document could not be split into blocks.
    #[error("{file_name}: {source}")]
    Sfc {
        /// The file name hint.
        file_name: String,
        /// The splitter error.
        #[source]
        source: sfc_parser::ParseError,
    },

    /// The formatter rejected the output.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// A type source file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The file that failed to load.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl TransformError {
    pub(crate) fn unsupported(file_name: &str, message: impl Into<String>) -> Self {
        TransformError::Unsupported {
            file_name: file_name.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn unresolvable(
        file_name: &str,
        type_name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        TransformError::UnresolvableType {
            file_name: file_name.to_string(),
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = TransformError::Parse {
            file_name: "a.ts".into(),
            line: 3,
            column: 7,
            message: "Expected ';'".into(),
        };
        assert_eq!(err.to_string(), "a.ts:3:7: Expected ';'");
    }

    #[test]
    fn test_unsupported_display() {
        let err = TransformError::unsupported("a.ts", "`export =` assignment");
        assert_eq!(
            err.to_string(),
            "a.ts: unsupported construct: `export =` assignment"
        );
    }
}
