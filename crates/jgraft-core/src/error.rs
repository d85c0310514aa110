//! Error types and handling for tree wrapping, splicing and printing

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for jgraft operations
#[derive(Debug, Error)]
pub enum JGraftError {
    /// The front end could not produce a tree at all
    #[error("Parse error in '{file}': {message}")]
    ParseError { file: String, message: String },

    /// The host tree does not match the grammar the graph builder expects
    #[error("Structural error: {message}")]
    StructuralError { message: String },

    /// A splice could not be written back into the host tree
    #[error("Splice error on field '{field}': {message}")]
    SpliceError { field: String, message: String },

    /// Writing reconstructed source to the sink failed
    #[error("Print error: {source}")]
    PrintError {
        #[source]
        source: std::io::Error,
    },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Structural,
    Splice,
    Print,
    Config,
    Io,
    Internal,
}

impl JGraftError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            JGraftError::ParseError { .. } => ErrorKind::Parse,
            JGraftError::StructuralError { .. } => ErrorKind::Structural,
            JGraftError::SpliceError { .. } => ErrorKind::Splice,
            JGraftError::PrintError { .. } => ErrorKind::Print,
            JGraftError::ConfigError { .. } => ErrorKind::Config,
            JGraftError::IoError { .. } => ErrorKind::Io,
            JGraftError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (other compilation units can still be processed)
    ///
    /// Structural and splice failures abort the unit they happened in, but not the session.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Parse | ErrorKind::Structural | ErrorKind::Splice
        )
    }

    /// Create a parse error
    pub fn parse_error(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a structural error
    pub fn structural_error(message: impl Into<String>) -> Self {
        Self::StructuralError {
            message: message.into(),
        }
    }

    /// Create a splice error
    pub fn splice_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SpliceError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a print error from the failing sink write
    pub fn print_error(source: std::io::Error) -> Self {
        Self::PrintError { source }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for JGraftError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<crate::host::FieldError> for JGraftError {
    fn from(err: crate::host::FieldError) -> Self {
        Self::SpliceError {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            JGraftError::structural_error("bad kind").kind(),
            ErrorKind::Structural
        );
        assert_eq!(
            JGraftError::splice_error("defs", "mismatch").kind(),
            ErrorKind::Splice
        );
        assert_eq!(JGraftError::config_error("x").kind(), ErrorKind::Config);
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(JGraftError::structural_error("x").is_recoverable());
        assert!(JGraftError::parse_error("A.java", "x").is_recoverable());
        assert!(!JGraftError::config_error("x").is_recoverable());
        let print = JGraftError::print_error(std::io::Error::other("closed"));
        assert!(!print.is_recoverable());
    }

    #[test]
    fn test_display() {
        let err = JGraftError::splice_error("stats", "expected a list");
        assert_eq!(
            err.to_string(),
            "Splice error on field 'stats': expected a list"
        );
    }
}
