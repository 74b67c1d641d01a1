//! jmlx Core
//!
//! Mutable syntax trees for Java with embedded JML specifications.
//! Parsing keeps every character of the source in a token list, comments
//! become first-class tree nodes, and printing puts them back where they
//! were written. Modeling comments (`//@ ...`, `/*@ ... */`) are activated
//! through a position-preserving sanitizer, so JML nodes carry real source
//! positions.

pub mod ast;
pub mod comments;
pub mod config;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod position;
pub mod printer;
pub mod result;
pub mod round_trip;
pub mod sanitizer;
pub mod token;

// Re-export commonly used types
pub use ast::{Ast, AstEvent, AstObserver, ChangeTracker, NodeId, NodeKind, ObserverScope, Property, Value};
pub use comments::CommentsInserter;
pub use config::{ConfigLoader, JmlxConfig, ParserConfiguration, PrinterConfiguration};
pub use error::{ErrorKind, JmlxError};
pub use parser::{ParseResult, parse};
pub use position::{Position, Range};
pub use printer::{PrettyPrinter, print};
pub use result::Result;
pub use round_trip::{RoundTripValidator, ValidationResult};
pub use sanitizer::{SanitizedText, Sanitizer};
pub use token::{JavaToken, TokenId, TokenKind, TokenList, TokenRange};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jmlx=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
