//! # Herald
//!
//! The real-time ingestion path of a chat client. Server-pushed frames are
//! decoded into typed events and routed to exactly one domain handler each,
//! keeping local state in step with the server.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐     ┌──────────────┐     ┌────────────┐     ┌──────────────┐
//! │ transport │────▶│ FrameSender  │────▶│ EventPump  │────▶│ Dispatcher   │──▶ UserStore
//! │ (yours)   │     │ (mpsc queue) │     │ (runtime)  │     │ (core)       │──▶ ChannelStore
//! └───────────┘     └──────────────┘     └────────────┘     └──────────────┘──▶ ...
//! ```
//!
//! - **Core** ([`core`]): event model, decoder, registry, dispatcher, diagnostics
//! - **State** ([`state`]): in-memory user, channel, message and stamp stores
//! - **Runtime** ([`runtime`]): configuration, logging, frame pump
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use herald::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::new().load()?;
//!     let stores = Stores::new();
//!     let runtime = HeraldRuntime::builder(config).handlers(&stores)?.build()?;
//!
//!     let (tx, rx) = runtime.frame_channel();
//!     tokio::spawn(connect_websocket(tx));
//!     runtime.run_until_ctrl_c(rx).await;
//!
//!     println!("{}", stores.summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: TOML configuration files
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use herald_core as core;
pub use herald_runtime as runtime;
pub use herald_state as state;

/// Prelude module for convenient imports.
pub mod prelude {
    // Runtime - main entry point
    pub use herald_runtime::{
        ConfigLoader, FrameSender, FrameSource, HeraldConfig, HeraldRuntime, PumpStats,
    };

    // Event model and routing
    pub use herald_core::{
        Diagnostic, Diagnostics, Dispatched, Dispatcher, Event, EventBody, EventKind,
        HandlerSet, MemoryDiagnostics, RegistryBuilder, RegistryResult, decode,
    };

    // Domain stores
    pub use herald_state::{ChannelStore, MessageStore, StampStore, Stores, UserStore};
}
