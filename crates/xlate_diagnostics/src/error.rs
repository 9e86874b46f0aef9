//! The error type threaded through every visit.

use crate::{format_message, DiagnosticCategory, DiagnosticMessage};
use xlate_core::TextRange;

/// Positional context of the node an error was raised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeContext {
    pub node_id: u32,
    /// Kind name of the node (`"Lambda"`, `"Call"`, ...).
    pub kind: &'static str,
    pub range: TextRange,
}

impl NodeContext {
    pub fn new(node_id: u32, kind: &'static str, range: TextRange) -> Self {
        Self { node_id, kind, range }
    }
}

/// A failure that aborts the current traversal.
///
/// Errors propagate unmodified through the recursive visit chain; the driver
/// decides whether to abort the run or skip the offending unit.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TranspileError {
    #[error("{message}")]
    Unsupported {
        code: u32,
        message: String,
        node: NodeContext,
    },
    #[error("{message}")]
    Malformed {
        code: u32,
        message: String,
        node: NodeContext,
    },
}

pub type Result<T> = std::result::Result<T, TranspileError>;

impl TranspileError {
    /// Build an unsupported-construct error from a catalogue message.
    pub fn unsupported(message: &DiagnosticMessage, args: &[&str], node: NodeContext) -> Self {
        debug_assert_eq!(message.category, DiagnosticCategory::Unsupported);
        TranspileError::Unsupported {
            code: message.code,
            message: format_message(message.message, args),
            node,
        }
    }

    /// Build a malformed-input error from a catalogue message.
    pub fn malformed(message: &DiagnosticMessage, args: &[&str], node: NodeContext) -> Self {
        debug_assert_eq!(message.category, DiagnosticCategory::Malformed);
        TranspileError::Malformed {
            code: message.code,
            message: format_message(message.message, args),
            node,
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            TranspileError::Unsupported { code, .. } | TranspileError::Malformed { code, .. } => *code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            TranspileError::Unsupported { message, .. }
            | TranspileError::Malformed { message, .. } => message,
        }
    }

    pub fn node(&self) -> &NodeContext {
        match self {
            TranspileError::Unsupported { node, .. } | TranspileError::Malformed { node, .. } => node,
        }
    }

    pub fn category(&self) -> DiagnosticCategory {
        match self {
            TranspileError::Unsupported { .. } => DiagnosticCategory::Unsupported,
            TranspileError::Malformed { .. } => DiagnosticCategory::Malformed,
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, TranspileError::Unsupported { .. })
    }
}
