//! Result type alias for jmlx operations

use crate::error::JmlxError;

/// Standard Result type for jmlx operations
pub type Result<T> = std::result::Result<T, JmlxError>;
