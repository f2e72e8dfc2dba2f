//! Injected diagnostic sink.
//!
//! # Responsibilities
//! - Carry the configured verbosity for one middleware instance
//! - Route construction and per-request diagnostics through tracing
//!
//! # Design Decisions
//! - Explicit capability handed to the compiler and request processor;
//!   no process-global mutable logger state
//! - Every event is gated by the instance's own verbosity, on top of
//!   whatever subscriber filtering the host applies
//! - Evaluation failures are warnings, visible at `Info` and above

use axum::http::HeaderName;
use serde::{Deserialize, Serialize};

use crate::template::RequestContext;

/// Diagnostic verbosity for one middleware instance.
///
/// Deserializes from the configuration strings `"INFO"` and `"DEBUG"`
/// (case variants accepted); anything unset means `Off`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize,
)]
pub enum Verbosity {
    /// No diagnostics.
    #[default]
    #[serde(alias = "OFF", alias = "off")]
    Off,
    /// Lifecycle events and skipped-entry warnings.
    #[serde(alias = "INFO", alias = "info")]
    Info,
    /// Everything above plus per-request context dumps.
    #[serde(alias = "DEBUG", alias = "debug")]
    Debug,
}

/// Structured diagnostic sink shared by the compiler and the request
/// processor. Cheap to copy; safe to use concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagnosticSink {
    verbosity: Verbosity,
}

impl DiagnosticSink {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// Configured verbosity of this sink.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// True when events at `level` should be emitted.
    pub fn enabled(&self, level: Verbosity) -> bool {
        self.verbosity >= level
    }

    /// Construction summary, once per successful compile.
    pub(crate) fn compiled(&self, entries: usize) {
        if self.enabled(Verbosity::Info) {
            tracing::info!(entries, "template headers compiled");
        }
    }

    /// Per-request context dump.
    pub(crate) fn context(&self, ctx: &RequestContext) {
        if self.enabled(Verbosity::Debug) {
            tracing::debug!(
                path = %ctx.path,
                scheme = %ctx.scheme,
                host = %ctx.host,
                method = %ctx.method,
                proto = %ctx.proto,
                query = %ctx.query,
                request_uri = %ctx.request_uri,
                forwarded_proto = %ctx.forwarded_proto,
                forwarded_host = %ctx.forwarded_host,
                host_header = %ctx.host_header,
                "template context"
            );
        }
    }

    /// One entry failed to evaluate; its header is skipped.
    pub(crate) fn entry_failed(
        &self,
        index: usize,
        header: &HeaderName,
        error: &dyn std::error::Error,
    ) {
        if self.enabled(Verbosity::Info) {
            tracing::warn!(
                entry = index,
                header = %header,
                error = %error,
                "template evaluation failed; header skipped"
            );
        }
    }
}
