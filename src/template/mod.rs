//! Header-value templating subsystem.
//!
//! # Data Flow
//! ```text
//! Configured template string
//!     → compile.rs (parse once at construction, fail fast)
//!     → frozen Template, shared read-only across requests
//!
//! Per request:
//!     context.rs (snapshot URL, method, proto, tracked headers)
//!     → Template::render (per entry, into an isolated buffer)
//! ```
//!
//! # Design Decisions
//! - Compilation errors are fatal; render errors are per-entry
//! - Templates and contexts are immutable once built (no locks)
//! - The context field set is closed; no arbitrary request data

pub mod compile;
pub mod context;

pub use compile::{CompileError, RenderError, Template};
pub use context::RequestContext;
