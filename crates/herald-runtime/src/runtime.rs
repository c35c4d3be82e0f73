//! Runtime assembly.
//!
//! The runtime owns the frozen handler registry, the dispatcher and the
//! shutdown token. Transports push raw frames into a [`FrameSender`] from
//! [`HeraldRuntime::frame_channel`]; [`HeraldRuntime::run`] pumps them.
//!
//! ```rust,ignore
//! let config = ConfigLoader::new().load()?;
//! let stores = Stores::new();
//! let runtime = HeraldRuntime::builder(config).handlers(&stores)?.build()?;
//!
//! let (tx, rx) = runtime.frame_channel();
//! tokio::spawn(connect(tx));
//! let stats = runtime.run_until_ctrl_c(rx).await;
//! ```

use std::sync::Arc;

use herald_core::{
    BoxedDiagnostics, Dispatcher, EventKind, HandlerRegistry, HandlerSet, RegistryBuilder,
    TracingDiagnostics,
};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::HeraldConfig;
use crate::error::RuntimeResult;
use crate::logging;
use crate::pump::{EventPump, FrameReceiver, FrameSender, FrameSource, PumpStats, frame_channel};

/// The assembled event stream runtime.
pub struct HeraldRuntime {
    config: HeraldConfig,
    dispatcher: Dispatcher,
    shutdown: CancellationToken,
}

impl HeraldRuntime {
    /// Starts assembling a runtime from loaded configuration.
    pub fn builder(config: HeraldConfig) -> RuntimeBuilder {
        RuntimeBuilder::new(config)
    }

    pub fn config(&self) -> &HeraldConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn registry(&self) -> &HandlerRegistry {
        self.dispatcher.registry()
    }

    /// Token that stops [`HeraldRuntime::run`] between frames when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Creates a frame channel sized by `stream.channel_capacity`.
    pub fn frame_channel(&self) -> (FrameSender, FrameReceiver) {
        frame_channel(self.config.stream.channel_capacity)
    }

    /// Pumps `source` until it is exhausted or shutdown is requested.
    pub async fn run<S: FrameSource>(&self, source: S) -> PumpStats {
        let registry = self.registry();
        info!(
            wired = registry.len(),
            recognized = EventKind::ALL.len(),
            "Event stream runtime started"
        );
        let unwired = registry.unwired_kinds();
        if !unwired.is_empty() {
            debug!(kinds = ?unwired, "Recognized kinds without a handler will be skipped");
        }

        let stats = EventPump::new(self.dispatcher.clone(), self.shutdown.clone())
            .run(source)
            .await;
        info!(%stats, "Event stream runtime stopped");
        stats
    }

    /// Like [`HeraldRuntime::run`], also stopping on Ctrl+C.
    pub async fn run_until_ctrl_c<S: FrameSource>(&self, source: S) -> PumpStats {
        let pump = self.run(source);
        tokio::pin!(pump);

        tokio::select! {
            stats = &mut pump => stats,
            result = signal::ctrl_c() => {
                match result {
                    Ok(()) => {
                        info!("Received Ctrl+C, shutting down");
                        self.shutdown.cancel();
                    }
                    Err(e) => error!(error = %e, "Failed to listen for Ctrl+C"),
                }
                pump.await
            }
        }
    }
}

/// Builder for [`HeraldRuntime`].
pub struct RuntimeBuilder {
    config: HeraldConfig,
    registry: RegistryBuilder,
    diagnostics: Option<BoxedDiagnostics>,
    init_logging: bool,
}

impl RuntimeBuilder {
    fn new(config: HeraldConfig) -> Self {
        Self {
            config,
            registry: RegistryBuilder::new(),
            diagnostics: None,
            init_logging: true,
        }
    }

    /// Registers a domain's handlers.
    ///
    /// Fails if the set claims a kind another set already handles.
    pub fn handlers<S: HandlerSet + ?Sized>(mut self, set: &S) -> RuntimeResult<Self> {
        self.registry.register(set)?;
        Ok(self)
    }

    /// Replaces the default [`TracingDiagnostics`] sink.
    pub fn diagnostics(mut self, diagnostics: BoxedDiagnostics) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Leaves the global subscriber alone.
    pub fn without_logging(mut self) -> Self {
        self.init_logging = false;
        self
    }

    /// Freezes the registry and installs logging.
    ///
    /// Fails if the configured log file cannot be opened.
    pub fn build(self) -> RuntimeResult<HeraldRuntime> {
        if self.init_logging {
            logging::init_from_config(&self.config.logging)?;
        }

        let diagnostics = self.diagnostics.unwrap_or_else(|| {
            Arc::new(
                TracingDiagnostics::new().with_preview_len(self.config.stream.frame_preview_len),
            )
        });
        let dispatcher = Dispatcher::new(self.registry.build()).with_diagnostics(diagnostics);

        info!(
            log_level = %self.config.logging.level,
            wired = dispatcher.registry().len(),
            "Runtime initialized from configuration"
        );

        Ok(HeraldRuntime {
            config: self.config,
            dispatcher,
            shutdown: CancellationToken::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use herald_core::{
        Diagnostic, MemoryDiagnostics, RegistryError, RegistryResult, UserOffline, UserOnline,
    };
    use serde_json::json;

    use crate::config::LogOutput;
    use crate::error::RuntimeError;
    use crate::logging::LoggingError;

    struct Presence {
        online: Arc<AtomicUsize>,
    }

    impl HandlerSet for Presence {
        fn domain(&self) -> &'static str {
            "presence"
        }

        fn register(&self, registry: &mut RegistryBuilder) -> RegistryResult<()> {
            let online = self.online.clone();
            registry
                .on(move |_: UserOnline| {
                    online.fetch_add(1, Ordering::SeqCst);
                })?
                .on(|_: UserOffline| {})?;
            Ok(())
        }
    }

    fn presence() -> (Presence, Arc<AtomicUsize>) {
        let online = Arc::new(AtomicUsize::new(0));
        (
            Presence {
                online: online.clone(),
            },
            online,
        )
    }

    fn online_frame() -> String {
        json!({
            "type": "USER_ONLINE",
            "body": { "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7" },
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_runtime_pumps_channel() {
        let (set, online) = presence();
        let diagnostics = Arc::new(MemoryDiagnostics::new());
        let runtime = HeraldRuntime::builder(HeraldConfig::default())
            .without_logging()
            .handlers(&set)
            .unwrap()
            .diagnostics(diagnostics.clone())
            .build()
            .unwrap();

        let (tx, rx) = runtime.frame_channel();
        tx.send(online_frame()).await.unwrap();
        tx.send(r#"{"body":{}}"#).await.unwrap();
        tx.send(online_frame()).await.unwrap();
        drop(tx);

        let stats = runtime.run(rx).await;
        assert_eq!(stats.handled, 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(online.load(Ordering::SeqCst), 2);
        assert!(matches!(
            diagnostics.records().as_slice(),
            [Diagnostic::MissingKind { .. }]
        ));
    }

    #[tokio::test]
    async fn test_shutdown_token_stops_run() {
        let (set, _) = presence();
        let runtime = HeraldRuntime::builder(HeraldConfig::default())
            .without_logging()
            .handlers(&set)
            .unwrap()
            .build()
            .unwrap();
        let (tx, rx) = runtime.frame_channel();
        tx.send(online_frame()).await.unwrap();

        runtime.shutdown_token().cancel();
        let stats = runtime.run(rx).await;
        assert_eq!(stats.frames, 0);
    }

    #[test]
    fn test_duplicate_sets_fail_assembly() {
        let (first, _) = presence();
        let (second, _) = presence();
        let result = HeraldRuntime::builder(HeraldConfig::default())
            .without_logging()
            .handlers(&first)
            .unwrap()
            .handlers(&second);

        assert!(matches!(
            result,
            Err(RuntimeError::Registry(RegistryError::DuplicateHandler {
                kind: EventKind::UserOnline,
                ..
            }))
        ));
    }

    #[test]
    fn test_channel_capacity_from_config() {
        let mut config = HeraldConfig::default();
        config.stream.channel_capacity = 3;
        let runtime = HeraldRuntime::builder(config)
            .without_logging()
            .build()
            .unwrap();

        assert_eq!(runtime.config().stream.channel_capacity, 3);
        assert!(runtime.registry().is_empty());
    }

    #[test]
    fn test_unopenable_log_file_fails_build() {
        let mut config = HeraldConfig::default();
        config.logging.output = LogOutput::File;
        config.logging.file_path = Some(
            std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("Cargo.toml")
                .join("herald.log"),
        );

        let result = HeraldRuntime::builder(config).build();

        assert!(matches!(
            result,
            Err(RuntimeError::Logging(LoggingError::Appender { .. }))
        ));
    }
}
