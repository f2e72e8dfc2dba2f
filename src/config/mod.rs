//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML/JSON)
//!     → loader.rs (parse & deserialize)
//!     → TemplateHeadersConfig (immutable)
//!     → middleware construction (templates compiled, fail fast)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a new instance
//! - All fields have defaults to allow minimal configs
//! - camelCase and kebab-case wire names are accepted via serde aliases

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{TemplateHeaderConfig, TemplateHeadersConfig};
