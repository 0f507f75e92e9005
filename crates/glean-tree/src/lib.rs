//! The trees that the checker consumes. Nodes are localized with glean-location.
//!
//! - Abstract: a purely syntactic tree that comes from the parser.
//! - Build: helpers that assemble abstract trees by hand, used by drivers and tests that do not go
//!   through a parser.

pub mod r#abstract;
pub mod build;
