//! Template-driven request-header middleware for reverse proxies.
//!
//! Compiles configured `{{ .Field }}` templates once at construction
//! (fail fast), renders them per request against a fixed snapshot of the
//! request, appends the results as additional request headers, and always
//! hands the request to the next handler in the chain.

pub mod config;
pub mod middleware;
pub mod observability;
pub mod template;

pub use config::{load_config, ConfigError, TemplateHeaderConfig, TemplateHeadersConfig};
pub use middleware::{
    template_headers_middleware, BuildError, TemplateHeaders, TemplateHeadersLayer,
    TemplateHeadersService,
};
pub use observability::{DiagnosticSink, Verbosity};
pub use template::{CompileError, RenderError, RequestContext, Template};
