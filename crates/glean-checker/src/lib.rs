//! The inference core. Given a function or class definition it derives a [signature::Signature],
//! infers what the definition returns and produces a callable [types::Type] that call sites
//! evaluate later on.
//!
//! Executing individual statements is left to a [visitor::Visitor]; [interpreter::Interpreter] is
//! the one shipped with the crate.

pub mod context;
pub mod evaluator;
pub mod infer;
pub mod interpreter;
pub mod meet;
pub mod scope;
pub mod signature;
pub mod types;
pub mod visitor;
