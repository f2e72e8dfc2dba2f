//! Middleware subsystem.
//!
//! # Data Flow
//! ```text
//! TemplateHeadersConfig
//!     → template_headers.rs (compile once, all-or-nothing)
//!     → layer.rs (tower Layer / axum fn wiring)
//!
//! Per request:
//!     snapshot context → render entries in order → append headers
//!     → next handler, unconditionally
//! ```
//!
//! # Design Decisions
//! - Two lifecycle states only: constructing (fallible) and ready
//!   (immutable, shared); a failed construction leaves nothing behind
//! - Per-entry failures degrade to a missing header, never a failed
//!   request

pub mod layer;
pub mod template_headers;

pub use layer::{template_headers_middleware, TemplateHeadersLayer, TemplateHeadersService};
pub use template_headers::{BuildError, CompiledEntry, TemplateHeaders};
