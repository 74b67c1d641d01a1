//! Round-trip validation
//!
//! Checks that a source file survives parse → print → parse:
//!
//! 1. the printed text parses again,
//! 2. the re-parsed tree is structurally equal to the original one
//!    (ranges ignored, comments compared modulo layout),
//! 3. printing the re-parsed tree gives the same text again.
//!
//! # Example
//!
//! ```rust,ignore
//! use jmlx_core::round_trip::RoundTripValidator;
//!
//! let result = RoundTripValidator::new().validate_round_trip("class A { int x; }")?;
//! assert!(result.is_valid());
//! ```

use crate::ast::{Ast, NodeId};
use crate::config::{ParserConfiguration, PrinterConfiguration};
use crate::parser::parse;
use crate::position::Position;
use crate::printer::PrettyPrinter;
use crate::result::Result;

/// Outcome of one round trip
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub original: String,
    /// The original tree printed
    pub printed: String,
    /// The re-parsed tree printed; `None` when re-parsing failed
    pub reprinted: Option<String>,
    /// Why the printed text did not parse
    pub reparse_error: Option<String>,
    pub differences: Vec<Difference>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Human-readable list of everything that went wrong
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if let Some(error) = &self.reparse_error {
            issues.push(format!("Printed text does not parse: {error}"));
        }
        for difference in &self.differences {
            issues.push(difference.to_string());
        }
        if self.reprinted.as_ref().is_some_and(|text| *text != self.printed) {
            issues.push("Printing is not stable: the re-parsed tree prints differently".to_string());
        }
        issues
    }
}

/// Where the original and re-parsed trees first disagree
#[derive(Debug, Clone, PartialEq)]
pub struct Difference {
    pub kind: DifferenceKind,
    /// Begin of the original node, when it has a range
    pub location: Option<Position>,
    pub description: String,
}

impl std::fmt::Display for Difference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.location {
            Some(position) => write!(f, "{:?} at {position}: {}", self.kind, self.description),
            None => write!(f, "{:?}: {}", self.kind, self.description),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifferenceKind {
    /// Nodes of different kinds
    NodeKind,
    /// Different number of children
    Structure,
    /// Attached comment missing on one side or different
    Comment,
    /// Same shape, different property values
    Value,
}

/// Parse, print and re-parse with fixed configurations
#[derive(Debug, Clone, Default)]
pub struct RoundTripValidator {
    parser: ParserConfiguration,
    printer: PrinterConfiguration,
}

impl RoundTripValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(parser: ParserConfiguration, printer: PrinterConfiguration) -> Self {
        Self { parser, printer }
    }

    /// Run the round trip
    ///
    /// Fails when the original does not parse or cannot be printed; problems
    /// with the printed text are reported in the result.
    pub fn validate_round_trip(&self, source: &str) -> Result<ValidationResult> {
        let original = parse(source, &self.parser)?;
        let printed = PrettyPrinter::new(&self.printer).print(&original.ast, original.root)?;

        let (reprinted, reparse_error, differences) = match parse(&printed, &self.parser) {
            Ok(reparsed) => {
                let differences = compare(&original.ast, original.root, &reparsed.ast, reparsed.root)
                    .into_iter()
                    .collect();
                let reprinted = PrettyPrinter::new(&self.printer).print(&reparsed.ast, reparsed.root)?;
                (Some(reprinted), None, differences)
            }
            Err(err) => (None, Some(err.to_string()), Vec::new()),
        };

        let is_valid = reparse_error.is_none()
            && differences.is_empty()
            && reprinted.as_deref() == Some(printed.as_str());
        tracing::debug!(is_valid, differences = differences.len(), "round trip finished");

        Ok(ValidationResult {
            is_valid,
            original: source.to_string(),
            printed,
            reprinted,
            reparse_error,
            differences,
        })
    }
}

/// The deepest point where two subtrees disagree, if they do
pub fn compare(left: &Ast, a: NodeId, right: &Ast, b: NodeId) -> Option<Difference> {
    if left.structurally_equal(a, right, b) {
        return None;
    }
    let difference = |kind, description: String| Difference {
        kind,
        location: left.range(a).map(|r| r.begin),
        description,
    };

    let (left_kind, right_kind) = (left.kind(a), right.kind(b));
    if left_kind != right_kind {
        return Some(difference(
            DifferenceKind::NodeKind,
            format!("expected {left_kind}, found {right_kind}"),
        ));
    }
    if left_kind.is_comment() {
        return Some(difference(
            DifferenceKind::Comment,
            format!(
                "comment text changed from {:?} to {:?}",
                left.comment_content(a).unwrap_or_default(),
                right.comment_content(b).unwrap_or_default()
            ),
        ));
    }

    let (left_children, right_children) = (left.children(a), right.children(b));
    if left_children.len() != right_children.len() {
        return Some(difference(
            DifferenceKind::Structure,
            format!(
                "{left_kind} has {} children, found {}",
                left_children.len(),
                right_children.len()
            ),
        ));
    }
    for (&x, &y) in left_children.iter().zip(&right_children) {
        if let Some(inner) = compare(left, x, right, y) {
            return Some(inner);
        }
    }

    let values_differ = || difference(DifferenceKind::Value, format!("{left_kind} properties differ"));
    match (left.comment(a), right.comment(b)) {
        (Some(x), Some(y)) => compare(left, x, right, y).or_else(|| Some(values_differ())),
        (None, None) => Some(values_differ()),
        (Some(_), None) => Some(difference(
            DifferenceKind::Comment,
            format!("{left_kind} lost its comment"),
        )),
        (None, Some(_)) => Some(difference(
            DifferenceKind::Comment,
            format!("{left_kind} gained a comment"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{NodeKind, Property};
    use crate::error::JmlxError;

    #[test]
    fn commented_class_round_trips() {
        let source = "package p;\n\nimport java.util.List;\n\n/** A counter. */\npublic class Counter {\n\n    // current value\n    private int count = 0;\n\n    //@ requires count < 10;\n    //@ ensures count == \\old(count) + 1;\n    public void increment() {\n        count++; // bump\n        //@ assert count > 0;\n    }\n}\n";
        let result = RoundTripValidator::new().validate_round_trip(source).unwrap();
        assert!(result.is_valid(), "{:?}\n{}", result.issues(), result.printed);
        assert!(result.issues().is_empty());
    }

    #[test]
    fn generics_round_trip() {
        let source = "class A { Map<String, List<List<String>>> m = new HashMap<>(); int s = a >>> 2; }";
        let result = RoundTripValidator::new().validate_round_trip(source).unwrap();
        assert!(result.is_valid(), "{:?}\n{}", result.issues(), result.printed);
    }

    #[test]
    fn unprintable_constructs_fail() {
        let source = "class A {\n  //@ requires 0 <= i < n;\n  void f(int i) {}\n}";
        let err = RoundTripValidator::new().validate_round_trip(source).unwrap_err();
        assert!(matches!(err, JmlxError::Print { .. }), "{err:?}");
    }

    #[test]
    fn comparison_finds_the_deepest_change() {
        let left = parse("class A { void f() { x = 1; } }", &ParserConfiguration::default()).unwrap();
        let right = parse("class A { void f() { x = 2; } }", &ParserConfiguration::default()).unwrap();
        let difference = compare(&left.ast, left.root, &right.ast, right.root).unwrap();
        assert_eq!(difference.kind, DifferenceKind::Value);
        assert_eq!(difference.location.map(|p| (p.line, p.column)), Some((1, 26)));
        assert!(compare(&left.ast, left.root, &left.ast, left.root).is_none());
    }

    #[test]
    fn comparison_reports_lost_comments() {
        let left = parse("class A {\n  // note\n  int x;\n}", &ParserConfiguration::default()).unwrap();
        let mut right = parse("class A {\n  // note\n  int x;\n}", &ParserConfiguration::default()).unwrap();
        let class = right.ast.list(right.root, Property::Types)[0];
        let field = right.ast.list(class, Property::Members)[0];
        let comment = right.ast.comment(field).unwrap();
        assert!(right.ast.remove_comment(comment));

        let difference = compare(&left.ast, left.root, &right.ast, right.root).unwrap();
        assert_eq!(difference.kind, DifferenceKind::Comment);
        assert!(difference.to_string().contains("lost its comment"), "{difference}");
        assert_eq!(left.ast.find_all(left.root, NodeKind::LineComment).len(), 1);
    }
}
