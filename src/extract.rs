//! Canonical profile extraction: the field vocabulary, per-platform rules, and the
//! record-resolution strategies that run before any field is read.

pub mod field;
pub mod resolve;

pub use field::*;
pub use resolve::*;
