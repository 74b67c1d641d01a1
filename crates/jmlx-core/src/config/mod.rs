//! Configuration for parsing and printing
//!
//! Settings can come from a file (`.jmlx.toml`, `.jmlx.json`, `jmlx.toml`
//! or `jmlx.json`), discovered by walking up from the working directory:
//!
//! ```toml
//! [parser]
//! jmlKeys = ["openjml"]
//! attributeComments = true
//!
//! [printer]
//! indentSize = 2
//! positionInterleaving = false
//! ```
//!
//! Every field has a default, so any subset may be given.

mod loader;

pub use loader::ConfigLoader;

use serde::{Deserialize, Serialize};

/// Top-level configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JmlxConfig {
    pub parser: ParserConfiguration,
    pub printer: PrinterConfiguration,
}

/// How source text becomes a tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParserConfiguration {
    /// Enabled feature keys for `//+key@` and `//-key@` modeling comments
    pub jml_keys: Vec<String>,

    /// Parse modeling comments; when off they stay ordinary comments
    pub process_jml: bool,

    /// Distribute comments over the tree; when off every comment becomes
    /// an orphan of the compilation unit
    pub attribute_comments: bool,

    /// A comment followed by an empty line is not attached to the next node
    pub do_not_assign_comments_preceding_empty_lines: bool,
}

impl Default for ParserConfiguration {
    fn default() -> Self {
        Self {
            jml_keys: Vec::new(),
            process_jml: true,
            attribute_comments: true,
            do_not_assign_comments_preceding_empty_lines: true,
        }
    }
}

/// How a tree becomes source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrinterConfiguration {
    /// Spaces per indentation level
    pub indent_size: usize,

    pub end_of_line: String,

    /// Print attached and orphan comments
    pub print_comments: bool,

    /// Print doc comments; ignored when `print_comments` is off
    pub print_javadoc: bool,

    /// Place orphan comments among siblings by source position; when off
    /// they follow the children in insertion order
    pub position_interleaving: bool,
}

impl Default for PrinterConfiguration {
    fn default() -> Self {
        Self {
            indent_size: 4,
            end_of_line: "\n".to_string(),
            print_comments: true,
            print_javadoc: true,
            position_interleaving: true,
        }
    }
}
