//! xlate_diagnostics: Transpile errors and diagnostic reporting.
//!
//! Every failure a backend can raise is one of two kinds:
//! - unsupported construct: the target has no faithful representation for
//!   the node (lambdas, exceptions, a mixed declare/mutate pattern, ...)
//! - malformed input: a node violates a precondition the core relies on
//!   (a `range()` call with four arguments, an undeclared sealed member type)
//!
//! Both carry the offending node's context and a stable code from the
//! message catalogue in [`messages`].

mod error;

pub use error::{NodeContext, Result, TranspileError};

use miette::{LabeledSpan, Severity};
use std::fmt;
use xlate_core::text::TextSpan;

/// Diagnostic category. One per error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    /// The target cannot express the construct. Recoverable by the user.
    Unsupported,
    /// The tree violates an internal precondition. Fatal for the traversal.
    Malformed,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Unsupported => write!(f, "unsupported"),
            DiagnosticCategory::Malformed => write!(f, "malformed"),
        }
    }
}

/// A diagnostic message template with a code and category.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (1xxx unsupported, 2xxx malformed).
    pub code: u32,
    /// The category of this diagnostic.
    pub category: DiagnosticCategory,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The unit (module file) this diagnostic belongs to, if known.
    pub file: Option<String>,
    /// The source span of the offending node, if known.
    pub span: Option<TextSpan>,
    /// Kind name of the offending node.
    pub node_kind: Option<&'static str>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Create a new diagnostic without location info.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span: None,
            node_kind: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    /// Build a diagnostic from a transpile error raised while emitting `file`.
    pub fn from_error(file: Option<String>, error: &TranspileError) -> Self {
        let node = error.node();
        Self {
            file,
            span: Some(node.range.to_span()),
            node_kind: Some(node.kind),
            message_text: error.message().to_string(),
            code: error.code(),
            category: error.category(),
        }
    }

    /// Whether this diagnostic aborts the traversal it came from.
    pub fn is_fatal(&self) -> bool {
        self.category == DiagnosticCategory::Malformed
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}", file)?;
            if let Some(span) = self.span {
                write!(f, "({})", span.start)?;
            }
            write!(f, ": ")?;
        }
        write!(f, "{} XL{}: {}", self.category, self.code, self.message_text)
    }
}

impl std::error::Error for Diagnostic {}

impl miette::Diagnostic for Diagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("xlate::XL{}", self.code)))
    }

    fn severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self.category {
            DiagnosticCategory::Unsupported => Some(Box::new(
                "rewrite the construct or choose another target",
            )),
            DiagnosticCategory::Malformed => Some(Box::new(
                "the input tree violates an analysis invariant; check the front-end output",
            )),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        let label = self.node_kind.map(|kind| kind.to_string());
        Some(Box::new(std::iter::once(LabeledSpan::new(
            label,
            span.start as usize,
            span.length as usize,
        ))))
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// A collection of diagnostics accumulated across emitted units.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_fatal(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_fatal)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Sort diagnostics by file and position.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            let file_cmp = a.file.cmp(&b.file);
            if file_cmp != std::cmp::Ordering::Equal {
                return file_cmp;
            }
            let a_pos = a.span.map(|s| s.start).unwrap_or(0);
            let b_pos = b.span.map(|s| s.start).unwrap_or(0);
            a_pos.cmp(&b_pos)
        });
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Unsupported, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Unsupported, message: $msg }
        };
        ($code:expr, Malformed, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Malformed, message: $msg }
        };
    }

    // ========================================================================
    // Unsupported constructs (1000-1999). `{0}` is always the target name.
    // ========================================================================
    pub const LAMBDAS_NOT_SUPPORTED: DiagnosticMessage = diag!(1001, Unsupported, "Lambdas are not supported in {0}.");
    pub const EXCEPTIONS_NOT_SUPPORTED: DiagnosticMessage = diag!(1002, Unsupported, "Exceptions are not supported in {0}.");
    pub const GENERATORS_NOT_SUPPORTED: DiagnosticMessage = diag!(1003, Unsupported, "Generators are not supported in {0}.");
    pub const COMPREHENSIONS_NOT_SUPPORTED: DiagnosticMessage = diag!(1004, Unsupported, "{1} comprehensions are not supported in {0}.");
    pub const COROUTINES_NOT_SUPPORTED: DiagnosticMessage = diag!(1005, Unsupported, "asyncio is not supported in {0}.");
    pub const MULTIPLE_INHERITANCE_NOT_SUPPORTED: DiagnosticMessage = diag!(1006, Unsupported, "Multiple inheritance is not supported in {0}: class '{1}' has {2} bases.");
    pub const INHERITANCE_NOT_SUPPORTED: DiagnosticMessage = diag!(1007, Unsupported, "Class inheritance is not supported in {0}.");
    pub const DELETE_NOT_SUPPORTED: DiagnosticMessage = diag!(1008, Unsupported, "`del` statements are not supported in {0}.");
    pub const WITH_NOT_SUPPORTED: DiagnosticMessage = diag!(1009, Unsupported, "`with` statements are not supported in {0}.");
    pub const GLOBALS_NOT_SUPPORTED: DiagnosticMessage = diag!(1010, Unsupported, "Globals are not supported in {0}.");
    pub const STARRED_NOT_SUPPORTED: DiagnosticMessage = diag!(1011, Unsupported, "Starred expressions are not supported in {0}.");
    pub const SETS_NOT_SUPPORTED: DiagnosticMessage = diag!(1012, Unsupported, "Sets are not supported in {0}.");
    pub const DICTS_NOT_SUPPORTED: DiagnosticMessage = diag!(1013, Unsupported, "Dictionaries are not supported in {0}.");
    pub const LOOPS_NOT_SUPPORTED: DiagnosticMessage = diag!(1014, Unsupported, "Loops are not supported in {0}.");
    pub const LOOP_ELSE_NOT_SUPPORTED: DiagnosticMessage = diag!(1015, Unsupported, "`else` clauses on loops are not supported in {0}.");
    pub const CLASS_METHODS_NOT_SUPPORTED: DiagnosticMessage = diag!(1016, Unsupported, "Class methods are not supported in {0}.");
    pub const SEALED_CLASSES_NOT_SUPPORTED: DiagnosticMessage = diag!(1017, Unsupported, "Sealed classes are not supported in {0}.");
    pub const SLICES_NOT_SUPPORTED: DiagnosticMessage = diag!(1018, Unsupported, "Slices are not supported in {0}.");
    pub const NONE_NOT_SUPPORTED: DiagnosticMessage = diag!(1019, Unsupported, "`None` has no representation in {0}.");
    pub const MIXED_DECLARATION_AND_ASSIGNMENT: DiagnosticMessage = diag!(1020, Unsupported, "Mixing declarations and assignment in the same statement is unsupported in {0}.");
    pub const ASSIGNMENT_TARGET_NOT_SUPPORTED: DiagnosticMessage = diag!(1021, Unsupported, "Cannot assign to {1} in {0}.");
    pub const OPERATOR_NOT_SUPPORTED: DiagnosticMessage = diag!(1022, Unsupported, "Operator '{1}' is not supported in {0}.");
    pub const KEYWORD_ARGUMENTS_NOT_SUPPORTED: DiagnosticMessage = diag!(1023, Unsupported, "Keyword argument '{1}' is not supported in {0}.");
    pub const BYTES_NOT_SUPPORTED: DiagnosticMessage = diag!(1024, Unsupported, "Byte strings are not supported in {0}.");
    pub const ANNOTATION_VALUE_NOT_SUPPORTED: DiagnosticMessage = diag!(1025, Unsupported, "{1} can't be assigned in {0}.");
    pub const TYPE_NOT_SUPPORTED: DiagnosticMessage = diag!(1030, Unsupported, "Type '{1}' is not supported in {0}.");

    // ========================================================================
    // Malformed input (2000-2999)
    // ========================================================================
    pub const RANGE_UNKNOWN_PARAMETERS: DiagnosticMessage = diag!(2001, Malformed, "encountered range() call with unknown parameters: range({0})");
    pub const SEALED_MEMBER_UNDECLARED_TYPE: DiagnosticMessage = diag!(2002, Malformed, "Sealed type '{0}' member '{1}' references undeclared type '{2}'.");
    pub const MISSING_CLASS_FACTS: DiagnosticMessage = diag!(2003, Malformed, "Class '{0}' has no declaration facts attached.");
    pub const UNBOUND_SCOPE: DiagnosticMessage = diag!(2004, Malformed, "Node refers to scope {0}, which the analysis did not produce.");
    pub const EMPTY_OPERAND_LIST: DiagnosticMessage = diag!(2005, Malformed, "{0} expression has no operands.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use xlate_core::TextRange;

    #[test]
    fn test_format_message() {
        let text = format_message(messages::COMPREHENSIONS_NOT_SUPPORTED.message, &["V", "List"]);
        assert_eq!(text, "List comprehensions are not supported in V.");
    }

    #[test]
    fn test_diagnostic_from_error() {
        let node = NodeContext::new(7, "Lambda", TextRange::new(10, 20));
        let error = TranspileError::unsupported(&messages::LAMBDAS_NOT_SUPPORTED, &["V"], node);
        let diag = Diagnostic::from_error(Some("demo.py".to_string()), &error);
        assert_eq!(diag.code, 1001);
        assert!(!diag.is_fatal());
        assert_eq!(diag.to_string(), "demo.py(10): unsupported XL1001: Lambdas are not supported in V.");
    }

    #[test]
    fn test_collection_sort_by_file_then_position() {
        let mut diags = DiagnosticCollection::new();
        let mut late = Diagnostic::new(&messages::LOOPS_NOT_SUPPORTED, &["SMT"]);
        late.file = Some("a.py".to_string());
        late.span = Some(TextSpan::new(40, 1));
        let mut early = Diagnostic::new(&messages::SETS_NOT_SUPPORTED, &["SMT"]);
        early.file = Some("a.py".to_string());
        early.span = Some(TextSpan::new(3, 1));
        diags.add(late);
        diags.add(early);
        diags.sort();
        assert_eq!(diags.diagnostics()[0].code, 1012);
        assert!(!diags.has_fatal());
    }
}
