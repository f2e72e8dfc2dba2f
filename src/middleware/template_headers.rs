//! Template-headers middleware core.
//!
//! # Responsibilities
//! - Compile configured templates once, all-or-nothing
//! - Snapshot the request context and evaluate every entry per request
//! - Append rendered values as additional request headers
//!
//! # Design Decisions
//! - Entries are immutable after construction (thread-safe without locks)
//! - One entry's failure never blocks the others or the request
//! - Headers are appended, never replaced; upstream values survive

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, Request};
use thiserror::Error;

use crate::config::schema::TemplateHeadersConfig;
use crate::observability::DiagnosticSink;
use crate::template::{CompileError, RequestContext, Template};

/// Errors that can occur while building the middleware from configuration.
///
/// Any of these aborts construction; no instance is created.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A template source failed to parse.
    #[error("error parsing template {text}: {source}")]
    Template {
        /// The offending template source text.
        text: String,
        #[source]
        source: CompileError,
    },

    /// A configured header name is not a valid HTTP header name.
    #[error("invalid header name `{name}`")]
    InvalidHeaderName {
        name: String,
        #[source]
        source: axum::http::header::InvalidHeaderName,
    },
}

/// One compiled template slot.
///
/// `header` is `None` for reserved slots (empty configured name) that
/// never emit a header.
#[derive(Debug, Clone)]
pub struct CompiledEntry {
    header: Option<HeaderName>,
    template: Template,
}

impl CompiledEntry {
    /// Target header name, if this slot emits one.
    pub fn header(&self) -> Option<&HeaderName> {
        self.header.as_ref()
    }

    /// The compiled template.
    pub fn template(&self) -> &Template {
        &self.template
    }
}

/// The middleware core: compiled entries plus the diagnostic sink.
///
/// Construction is all-or-nothing, so a value of this type is always
/// ready and safe to share across concurrent request-processing callers.
/// Cloning is cheap (entries live behind an `Arc`).
#[derive(Debug, Clone)]
pub struct TemplateHeaders {
    entries: Arc<[CompiledEntry]>,
    diag: DiagnosticSink,
}

impl TemplateHeaders {
    /// Compile all configured templates, preserving configuration order.
    ///
    /// Fails on the first invalid template source or header name; no
    /// partially-compiled instance is ever produced.
    pub fn from_config(
        config: &TemplateHeadersConfig,
        diag: DiagnosticSink,
    ) -> Result<Self, BuildError> {
        let mut entries = Vec::with_capacity(config.template_headers.len());

        for (i, spec) in config.template_headers.iter().enumerate() {
            let template = Template::parse(format!("template-{i}"), &spec.template).map_err(
                |err| BuildError::Template {
                    text: spec.template.clone(),
                    source: err,
                },
            )?;

            let header = if spec.header.is_empty() {
                None
            } else {
                Some(
                    HeaderName::from_bytes(spec.header.as_bytes()).map_err(|err| {
                        BuildError::InvalidHeaderName {
                            name: spec.header.clone(),
                            source: err,
                        }
                    })?,
                )
            };

            entries.push(CompiledEntry { header, template });
        }

        diag.compiled(entries.len());

        Ok(Self {
            entries: entries.into(),
            diag,
        })
    }

    /// Compiled entries, in configuration order.
    pub fn entries(&self) -> &[CompiledEntry] {
        &self.entries
    }

    /// Evaluate every entry against `req` and append the results.
    ///
    /// Never fails: an entry that cannot render, or renders a value that
    /// is not a legal header value, is reported through the sink and
    /// skipped. Existing header values are never replaced.
    pub fn apply<B>(&self, req: &mut Request<B>) {
        let ctx = RequestContext::from_request(req);
        self.diag.context(&ctx);

        for (i, entry) in self.entries.iter().enumerate() {
            let Some(header) = entry.header.as_ref() else {
                continue;
            };

            let rendered = match entry.template.render(&ctx) {
                Ok(value) => value,
                Err(err) => {
                    self.diag.entry_failed(i, header, &err);
                    continue;
                }
            };

            match HeaderValue::from_str(&rendered) {
                Ok(value) => {
                    req.headers_mut().append(header.clone(), value);
                }
                Err(err) => {
                    self.diag.entry_failed(i, header, &err);
                }
            }
        }
    }
}
