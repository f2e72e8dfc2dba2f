//! Handler-chain integration.
//!
//! # Responsibilities
//! - Expose the core as a `tower::Layer` for generic middleware stacks
//! - Expose an axum middleware fn for axum routers
//!
//! # Design Decisions
//! - Header mutation happens synchronously before delegating; the inner
//!   service's future is returned unchanged (no boxing in the hot path)
//! - The next handler is always invoked, whatever the entries did
//! - Services are cheap to clone: entries live behind an `Arc`

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body, extract::State, http::Request, middleware::Next, response::Response,
};
use tower::{Layer, Service};

use crate::config::schema::TemplateHeadersConfig;
use crate::middleware::template_headers::{BuildError, TemplateHeaders};
use crate::observability::DiagnosticSink;

/// `tower::Layer` that wraps a service with template-header injection.
#[derive(Debug, Clone)]
pub struct TemplateHeadersLayer {
    headers: TemplateHeaders,
}

impl TemplateHeadersLayer {
    /// Wrap an already-compiled core.
    pub fn new(headers: TemplateHeaders) -> Self {
        Self { headers }
    }

    /// Compile `config` and wrap the result. Fails exactly when
    /// [`TemplateHeaders::from_config`] fails.
    pub fn from_config(
        config: &TemplateHeadersConfig,
        diag: DiagnosticSink,
    ) -> Result<Self, BuildError> {
        Ok(Self::new(TemplateHeaders::from_config(config, diag)?))
    }
}

impl<S> Layer<S> for TemplateHeadersLayer {
    type Service = TemplateHeadersService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TemplateHeadersService {
            inner,
            headers: self.headers.clone(),
        }
    }
}

/// Service produced by [`TemplateHeadersLayer`].
#[derive(Debug, Clone)]
pub struct TemplateHeadersService<S> {
    inner: S,
    headers: TemplateHeaders,
}

impl<S, B> Service<Request<B>> for TemplateHeadersService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        self.headers.apply(&mut req);
        self.inner.call(req)
    }
}

/// Axum middleware fn driving the same core, for use with
/// `axum::middleware::from_fn_with_state`.
pub async fn template_headers_middleware(
    State(headers): State<Arc<TemplateHeaders>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    headers.apply(&mut req);
    next.run(req).await
}
