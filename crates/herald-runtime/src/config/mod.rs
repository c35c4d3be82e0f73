//! Configuration module for the Herald runtime.
//!
//! Settings are layered with figment from defaults, TOML/YAML files and
//! `HERALD_*` environment variables, then checked by [`validate_config`].

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile};
pub use schema::{
    HeraldConfig, LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig, SpanEventConfig,
    StreamConfig,
};
pub use validation::validate_config;
