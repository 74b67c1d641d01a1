//! Error types for tree construction, mutation, parsing and printing

use crate::ast::{NodeId, NodeKind, Property};
use crate::position::Position;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for jmlx operations
#[derive(Debug, Error)]
pub enum JmlxError {
    /// A required property was set to nothing
    #[error("Property {property:?} of {kind:?} is required and cannot be empty")]
    RequiredProperty { kind: NodeKind, property: Property },

    /// The node kind has no such property, or the property has a different shape
    #[error("{kind:?} has no {shape} property {property:?}")]
    UnknownProperty {
        kind: NodeKind,
        property: Property,
        shape: &'static str,
    },

    /// A child of the wrong kind was offered to a property
    #[error("Property {property:?} of {kind:?} does not accept a {child:?}")]
    InadmissibleChild {
        kind: NodeKind,
        property: Property,
        child: NodeKind,
    },

    /// The node is already owned by another parent
    #[error("Node {node} already has a parent; detach or clone it first")]
    AlreadyAttached { node: NodeId },

    /// A node may not become its own ancestor
    #[error("Attaching node {node} under {parent} would create a cycle")]
    Cycle { node: NodeId, parent: NodeId },

    /// Comment operations applied to something that is not a comment
    #[error("Node {node} is a {kind:?}, expected a comment")]
    NotAComment { node: NodeId, kind: NodeKind },

    /// Index outside of a child list
    #[error("Index {index} out of bounds for {property:?} (length {len})")]
    ListIndex {
        property: Property,
        index: usize,
        len: usize,
    },

    /// Token construction preconditions
    #[error("Token error: {message}")]
    Token { message: String },

    /// Modeling comments fed to the sanitizer out of position order
    #[error("Modeling comment at {found} starts before the current position {expected}")]
    SanitizerOrder { expected: Position, found: Position },

    /// Syntax errors
    #[error("Parse error: {message} at line {line}, column {column}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    /// Printing failures, including unsupported constructs
    #[error("Print error: {message}")]
    Print { message: String },

    /// Orphan comment re-interleaving found an inconsistent tree
    #[error("Comment interleaving failed: {message}")]
    CommentInterleaving { message: String },

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
    Precondition,
    Parse,
    Print,
    Sanitizer,
    Config,
    Io,
    Internal,
}

impl JmlxError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            JmlxError::RequiredProperty { .. }
            | JmlxError::UnknownProperty { .. }
            | JmlxError::InadmissibleChild { .. }
            | JmlxError::AlreadyAttached { .. }
            | JmlxError::Cycle { .. }
            | JmlxError::NotAComment { .. }
            | JmlxError::ListIndex { .. }
            | JmlxError::Token { .. } => ErrorKind::Precondition,
            JmlxError::SanitizerOrder { .. } => ErrorKind::Sanitizer,
            JmlxError::Parse { .. } => ErrorKind::Parse,
            JmlxError::Print { .. } | JmlxError::CommentInterleaving { .. } => ErrorKind::Print,
            JmlxError::ConfigError { .. } => ErrorKind::Config,
            JmlxError::IoError { .. } => ErrorKind::Io,
            JmlxError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (the caller can continue with other input)
    ///
    /// Printing failures belong to the tree being printed, so a batch can
    /// report them and move on. Precondition and sanitizer violations are
    /// programmer errors.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Parse | ErrorKind::Print | ErrorKind::Config | ErrorKind::Io
        )
    }

    /// Create a parse error
    pub fn parse_error(message: impl Into<String>, position: Position) -> Self {
        Self::Parse {
            message: message.into(),
            line: position.line,
            column: position.column,
        }
    }

    /// Create a print error
    pub fn print_error(message: impl Into<String>) -> Self {
        Self::Print {
            message: message.into(),
        }
    }

    /// Create an interleaving consistency error
    pub fn interleaving_error(message: impl Into<String>) -> Self {
        Self::CommentInterleaving {
            message: message.into(),
        }
    }

    /// Create a token precondition error
    pub fn token_error(message: impl Into<String>) -> Self {
        Self::Token {
            message: message.into(),
        }
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
impl From<std::io::Error> for JmlxError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}
