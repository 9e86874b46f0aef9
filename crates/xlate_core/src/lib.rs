//! xlate_core: Core utilities shared by every xlate crate.
//!
//! Provides source positions and the hash collections used throughout the
//! transpiler pipeline.

pub mod collections;
pub mod text;

// Re-export commonly used types
pub use collections::{FxMap, FxSet, OrderedMap};
pub use text::{TextPos, TextRange, TextSpan};
