//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every route, namely trace
//! correlation and the diagnostic mode consulted by the error renderer.

pub mod diagnostics;
pub mod trace;

pub use diagnostics::{DiagnosticMode, Diagnostics};
pub use trace::Trace;
