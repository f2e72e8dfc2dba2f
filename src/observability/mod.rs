//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Compiler and request processor produce:
//!     → diag.rs (structured events, per-instance verbosity gate)
//!     → tracing subscriber installed by the host
//! ```
//!
//! # Design Decisions
//! - One injected sink per middleware instance; no global logger state
//! - The host owns subscriber setup; this crate only emits events

pub mod diag;

pub use diag::{DiagnosticSink, Verbosity};
