//! Configuration schema definitions.
//!
//! This module defines the configuration structure for the middleware.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::observability::Verbosity;

/// Root configuration for the template-headers middleware.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TemplateHeadersConfig {
    /// Ordered header templates. Order defines evaluation order and the
    /// order in which header values are appended.
    #[serde(alias = "templateHeaders", alias = "template-headers")]
    pub template_headers: Vec<TemplateHeaderConfig>,

    /// Diagnostic verbosity for this instance.
    #[serde(alias = "logLevel", alias = "log-level")]
    pub log_level: Verbosity,
}

/// One header template entry.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TemplateHeaderConfig {
    /// Template source rendered against the request context.
    pub template: String,

    /// Header name the rendered value is appended under.
    /// An empty name reserves the slot without emitting a header.
    pub header: String,
}

impl TemplateHeaderConfig {
    /// Convenience constructor for building configs in code.
    pub fn new(header: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            header: header.into(),
        }
    }
}
