//! Herald Runtime - hosting layer for the Herald event stream.
//!
//! This crate provides:
//! - Layered configuration with figment (`HeraldConfig`, `ConfigLoader`)
//! - Logging setup with `tracing-subscriber`
//! - The frame pump that feeds a [`FrameSource`] through the dispatcher
//! - [`HeraldRuntime`], which ties the above to a handler registry
//!
//! # Feature Flags
//!
//! - `toml-config` *(default)*: TOML configuration files
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output
//!
//! ```ignore
//! use herald_runtime::{ConfigLoader, HeraldRuntime};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::new().load()?;
//!     let runtime = HeraldRuntime::builder(config).handlers(&my_stores)?.build()?;
//!
//!     let (tx, rx) = runtime.frame_channel();
//!     tokio::spawn(my_transport(tx));
//!     runtime.run_until_ctrl_c(rx).await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod pump;
pub mod runtime;

pub use config::{ConfigError, ConfigLoader, ConfigResult, HeraldConfig, LogLevel};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, LoggingError, SpanEvents};
pub use pump::{
    EventPump, FrameReceiver, FrameSender, FrameSource, PumpStats, StreamSource, frame_channel,
};
pub use runtime::{HeraldRuntime, RuntimeBuilder};

// Re-export tracing for use by other crates
pub use tokio_util::sync::CancellationToken;
pub use tracing;
pub use tracing_subscriber;

/// Logging macros.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
