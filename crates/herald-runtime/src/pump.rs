//! The event pump: feeds frames from a source through the dispatcher.
//!
//! Frames are processed one at a time. The next frame is not requested
//! until the previous one has been fully dispatched, so handlers observe
//! events in wire order.

use std::fmt;
use std::pin::Pin;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use herald_core::{Dispatched, Dispatcher};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{RuntimeError, RuntimeResult};

/// Anything that yields raw text frames in order.
#[async_trait]
pub trait FrameSource: Send {
    /// Waits for the next frame. `None` means the source is exhausted.
    async fn next_frame(&mut self) -> Option<String>;
}

/// Transport side of a frame channel.
#[derive(Debug, Clone)]
pub struct FrameSender {
    tx: mpsc::Sender<String>,
}

impl FrameSender {
    /// Queues a frame, waiting while the channel is full.
    pub async fn send(&self, frame: impl Into<String>) -> RuntimeResult<()> {
        self.tx
            .send(frame.into())
            .await
            .map_err(|_| RuntimeError::StreamClosed)
    }

    /// Returns `true` once the receiving pump has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Pump side of a frame channel.
#[derive(Debug)]
pub struct FrameReceiver {
    rx: mpsc::Receiver<String>,
}

#[async_trait]
impl FrameSource for FrameReceiver {
    async fn next_frame(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

/// Creates a bounded frame channel.
///
/// The source is exhausted once every [`FrameSender`] is dropped and the
/// queue is drained.
pub fn frame_channel(capacity: usize) -> (FrameSender, FrameReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (FrameSender { tx }, FrameReceiver { rx })
}

/// Adapts a [`Stream`] of frames.
pub struct StreamSource {
    stream: Pin<Box<dyn Stream<Item = String> + Send>>,
}

impl StreamSource {
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = String> + Send + 'static,
    {
        Self {
            stream: Box::pin(stream),
        }
    }
}

#[async_trait]
impl FrameSource for StreamSource {
    async fn next_frame(&mut self) -> Option<String> {
        self.stream.next().await
    }
}

/// Outcome counts of one pump run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
    pub frames: usize,
    pub handled: usize,
    pub unwired: usize,
    pub unrecognized: usize,
    pub rejected: usize,
}

impl PumpStats {
    /// Counts one dispatched frame.
    pub fn record(&mut self, outcome: Dispatched) {
        self.frames += 1;
        match outcome {
            Dispatched::Handled(_) => self.handled += 1,
            Dispatched::Unwired(_) => self.unwired += 1,
            Dispatched::Unrecognized => self.unrecognized += 1,
            Dispatched::Rejected => self.rejected += 1,
        }
    }
}

impl fmt::Display for PumpStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frames: {} (handled {}, unwired {}, unrecognized {}, rejected {})",
            self.frames, self.handled, self.unwired, self.unrecognized, self.rejected
        )
    }
}

/// Drives a [`FrameSource`] into a [`Dispatcher`].
#[derive(Clone)]
pub struct EventPump {
    dispatcher: Dispatcher,
    shutdown: CancellationToken,
}

impl EventPump {
    pub fn new(dispatcher: Dispatcher, shutdown: CancellationToken) -> Self {
        Self {
            dispatcher,
            shutdown,
        }
    }

    /// Runs until the source is exhausted or shutdown is requested.
    ///
    /// Cancellation is only observed between frames; a frame being
    /// dispatched always completes.
    pub async fn run<S: FrameSource>(&self, mut source: S) -> PumpStats {
        let mut stats = PumpStats::default();
        debug!("Event pump started");

        loop {
            let frame = tokio::select! {
                biased;
                () = self.shutdown.cancelled() => {
                    info!(frames = stats.frames, "Shutdown requested, stopping event pump");
                    break;
                }
                frame = source.next_frame() => frame,
            };

            let Some(frame) = frame else {
                debug!(frames = stats.frames, "Frame source exhausted");
                break;
            };
            stats.record(self.dispatcher.receive(&frame));
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use herald_core::{
        ChannelCreated, MemoryDiagnostics, RegistryBuilder, UserJoined, UserOnline,
    };
    use parking_lot::Mutex;
    use serde_json::json;

    fn frame(kind: &str, id: u128) -> String {
        json!({ "type": kind, "body": { "id": format!("{id:032x}") } }).to_string()
    }

    fn recording_pump(log: &Arc<Mutex<Vec<&'static str>>>) -> (EventPump, Arc<MemoryDiagnostics>) {
        let mut registry = RegistryBuilder::new();
        let l = log.clone();
        registry.on(move |_: UserJoined| l.lock().push("joined")).unwrap();
        let l = log.clone();
        registry.on(move |_: UserOnline| l.lock().push("online")).unwrap();
        let l = log.clone();
        registry.on(move |_: ChannelCreated| l.lock().push("channel")).unwrap();

        let diagnostics = Arc::new(MemoryDiagnostics::new());
        let dispatcher = Dispatcher::new(registry.build()).with_diagnostics(diagnostics.clone());
        (EventPump::new(dispatcher, CancellationToken::new()), diagnostics)
    }

    #[tokio::test]
    async fn test_channel_frames_dispatch_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (pump, diagnostics) = recording_pump(&log);
        let (tx, rx) = frame_channel(8);

        tx.send(frame("CHANNEL_CREATED", 1)).await.unwrap();
        tx.send(frame("USER_JOINED", 2)).await.unwrap();
        tx.send("not json").await.unwrap();
        tx.send(frame("USER_ONLINE", 2)).await.unwrap();
        tx.send(frame("NOT_A_REAL_KIND", 3)).await.unwrap();
        tx.send(frame("USER_LEFT", 2)).await.unwrap();
        drop(tx);

        let stats = pump.run(rx).await;

        assert_eq!(*log.lock(), vec!["channel", "joined", "online"]);
        assert_eq!(
            stats,
            PumpStats {
                frames: 6,
                handled: 3,
                unwired: 1,
                unrecognized: 1,
                rejected: 1,
            }
        );
        assert_eq!(diagnostics.len(), 2);
    }

    #[tokio::test]
    async fn test_stream_source() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let mut registry = RegistryBuilder::new();
        registry
            .on(move |_: UserOnline| {
                c.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        let pump = EventPump::new(Dispatcher::new(registry.build()), CancellationToken::new());

        let frames = (0..5).map(|i| frame("USER_ONLINE", i));
        let stats = pump.run(StreamSource::new(futures::stream::iter(frames))).await;

        assert_eq!(stats.handled, 5);
        assert_eq!(count.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_cancelled_pump_stops_before_next_frame() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (pump, _) = recording_pump(&log);
        let (tx, rx) = frame_channel(4);
        tx.send(frame("USER_JOINED", 1)).await.unwrap();

        pump.shutdown.cancel();
        let stats = pump.run(rx).await;

        assert_eq!(stats, PumpStats::default());
        assert!(log.lock().is_empty());
        assert!(tx.is_closed());
    }

    #[tokio::test]
    async fn test_cancel_while_waiting() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (pump, _) = recording_pump(&log);
        let token = pump.shutdown.clone();
        let (tx, rx) = frame_channel(4);

        let handle = tokio::spawn({
            let pump = pump.clone();
            async move { pump.run(rx).await }
        });
        tx.send(frame("USER_JOINED", 1)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        token.cancel();

        let stats = handle.await.unwrap();
        assert_eq!(stats.handled, 1);
        assert_eq!(*log.lock(), vec!["joined"]);
    }

    #[tokio::test]
    async fn test_send_after_pump_dropped() {
        let (tx, rx) = frame_channel(1);
        drop(rx);
        assert!(tx.is_closed());
        assert!(matches!(
            tx.send("{}").await,
            Err(RuntimeError::StreamClosed)
        ));
    }

    #[test]
    fn test_stats_display() {
        let mut stats = PumpStats::default();
        stats.record(Dispatched::Rejected);
        stats.record(Dispatched::Unrecognized);
        assert_eq!(
            stats.to_string(),
            "Frames: 2 (handled 0, unwired 0, unrecognized 1, rejected 1)"
        );
    }
}
