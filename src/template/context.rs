//! Per-request template context.
//!
//! # Responsibilities
//! - Snapshot the URL, method, protocol and tracked headers of a request
//! - Expose a closed, fixed set of named fields to templates
//!
//! # Design Decisions
//! - Construction is total: absent request data becomes an empty string
//! - Owned, read-only after construction, dropped with the request
//! - No request body and no arbitrary header access

use axum::http::{Request, Version};

/// Fixed-shape snapshot of one request, exposed to templates.
///
/// Built fresh for every request before the entry loop runs; a pure
/// function of the request line, version and the three tracked headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Escaped path component.
    pub path: String,
    /// URI scheme (absolute-form requests; empty otherwise).
    pub scheme: String,
    /// URI authority (absolute-form requests; empty otherwise).
    pub host: String,
    /// Request method.
    pub method: String,
    /// Protocol version string, e.g. `HTTP/1.1`.
    pub proto: String,
    /// Raw query string, without the `?`.
    pub query: String,
    /// Path plus query as originally requested.
    pub request_uri: String,
    /// Incoming `X-Forwarded-Proto` header.
    pub forwarded_proto: String,
    /// Incoming `X-Forwarded-Host` header.
    pub forwarded_host: String,
    /// Incoming `Host` header.
    pub host_header: String,
}

impl RequestContext {
    /// Snapshot `req`. Never fails; missing parts default to empty.
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let uri = req.uri();
        Self {
            path: uri.path().to_string(),
            scheme: uri.scheme_str().unwrap_or_default().to_string(),
            host: uri.authority().map(|a| a.to_string()).unwrap_or_default(),
            method: req.method().to_string(),
            proto: proto_string(req.version()).to_string(),
            query: uri.query().unwrap_or_default().to_string(),
            request_uri: uri
                .path_and_query()
                .map(|pq| pq.to_string())
                .unwrap_or_default(),
            forwarded_proto: header_string(req, "x-forwarded-proto"),
            forwarded_host: header_string(req, "x-forwarded-host"),
            host_header: header_string(req, "host"),
        }
    }

    /// Look up a template-visible field by name.
    ///
    /// The field set is closed: exactly these ten names, nothing else.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "Path" => Some(&self.path),
            "Scheme" => Some(&self.scheme),
            "Host" => Some(&self.host),
            "Method" => Some(&self.method),
            "Proto" => Some(&self.proto),
            "Query" => Some(&self.query),
            "RequestURI" => Some(&self.request_uri),
            "HttpXForwardedProto" => Some(&self.forwarded_proto),
            "HttpXForwardedHost" => Some(&self.forwarded_host),
            "HttpHost" => Some(&self.host_header),
            _ => None,
        }
    }
}

/// Tracked header as a string; non-UTF-8 values count as absent.
fn header_string<B>(req: &Request<B>, name: &str) -> String {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn proto_string(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "",
    }
}
