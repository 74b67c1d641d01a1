//! Turning trees back into Java source
//!
//! [`PrettyPrinter`] renders every node kind through the
//! [`Visitor`](crate::ast::visitor::Visitor) trait into a [`SourcePrinter`]
//! buffer. Orphan comments are placed among their siblings by source
//! position (see [`comments_before`]), so a comment written between two
//! statements comes back between the same two statements.
//!
//! [`PrettyPrinter::preserving`] additionally copies the original text of
//! every subtree that has not changed since parsing.

mod interleave;
mod pretty;
mod source;

pub use interleave::{comments_before, comments_ending};
pub use pretty::PrettyPrinter;
pub use source::SourcePrinter;

use crate::ast::{Ast, NodeId};
use crate::config::PrinterConfiguration;
use crate::result::Result;

/// Pretty-print the subtree at `root`
pub fn print(ast: &Ast, root: NodeId, config: &PrinterConfiguration) -> Result<String> {
    PrettyPrinter::new(config).print(ast, root)
}
