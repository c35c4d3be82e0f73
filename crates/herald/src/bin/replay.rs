//! Replays a capture of event frames through the domain stores.
//!
//! Each non-blank line of the input is one raw frame as received from the
//! server. Bad frames are reported and skipped; they never fail the run.
//!
//! ```bash
//! herald-replay capture.jsonl
//! cat capture.jsonl | herald-replay --log-level debug -
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use herald::prelude::*;
use herald::runtime::{CancellationToken, LogLevel};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Replay captured event frames through the Herald dispatcher.
#[derive(Parser, Debug)]
#[command(name = "herald-replay", author, version, about)]
struct Cli {
    /// Capture file with one JSON frame per line, or `-` for stdin.
    input: String,

    /// Configuration file (defaults to herald.toml lookup).
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Overrides `logging.level`.
    #[arg(long)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loader = match &cli.config {
        Some(path) => ConfigLoader::new().file(path),
        None => ConfigLoader::new(),
    };
    let mut config = loader.load().context("failed to load configuration")?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    let stores = Stores::new();
    let runtime = HeraldRuntime::builder(config).handlers(&stores)?.build()?;

    let reader = open_input(&cli.input).await?;
    let (tx, rx) = runtime.frame_channel();
    let feeder = tokio::spawn(feed(reader, tx));

    let stats = runtime.run_until_ctrl_c(rx).await;
    match finish_feed(feeder, &runtime.shutdown_token()).await? {
        Some(sent) => info!(lines = sent, "Replay finished"),
        None => info!("Replay interrupted"),
    }
    info!("{stats}");
    info!("{}", stores.summary());
    Ok(())
}

async fn open_input(input: &str) -> Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    if input == "-" {
        return Ok(Box::new(BufReader::new(tokio::io::stdin())));
    }
    let file = tokio::fs::File::open(input)
        .await
        .with_context(|| format!("failed to open capture file '{input}'"))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Sends every non-blank line as a frame. Returns how many were sent.
async fn feed<R>(reader: R, tx: FrameSender) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut sent = 0;

    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read capture")?
    {
        let frame = line.trim();
        if frame.is_empty() {
            continue;
        }
        if tx.send(frame).await.is_err() {
            debug!("Event pump stopped, ending replay early");
            break;
        }
        sent += 1;
    }

    Ok(sent)
}

/// Waits for the reader once the pump has returned.
///
/// After a shutdown the reader may be parked on an input that never ends
/// (an idle stdin), so it is aborted instead. Returns `None` in that case.
async fn finish_feed(
    feeder: JoinHandle<Result<usize>>,
    shutdown: &CancellationToken,
) -> Result<Option<usize>> {
    if shutdown.is_cancelled() {
        feeder.abort();
    }
    match feeder.await {
        Ok(sent) => sent.map(Some),
        Err(e) if e.is_cancelled() => Ok(None),
        Err(e) => Err(anyhow::Error::new(e).context("frame reader panicked")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald::runtime::frame_channel;
    use std::time::Duration;

    #[tokio::test]
    async fn test_feed_skips_blank_lines() {
        let capture = b"{\"type\":\"USER_ONLINE\"}\n\n   \nnot json\n".as_slice();
        let (tx, mut rx) = frame_channel(8);

        let sent = feed(BufReader::new(capture), tx).await.unwrap();

        assert_eq!(sent, 2);
        assert_eq!(
            rx.next_frame().await.as_deref(),
            Some("{\"type\":\"USER_ONLINE\"}")
        );
        assert_eq!(rx.next_frame().await.as_deref(), Some("not json"));
        assert_eq!(rx.next_frame().await, None);
    }

    #[tokio::test]
    async fn test_feed_stops_when_pump_is_gone() {
        let (tx, rx) = frame_channel(1);
        drop(rx);

        let sent = feed(BufReader::new(b"a\nb\n".as_slice()), tx).await.unwrap();
        assert_eq!(sent, 0);
    }

    #[tokio::test]
    async fn test_finish_feed_aborts_idle_reader_after_shutdown() {
        // The writer half stays open, so the reader never sees EOF.
        let (_writer, reader) = tokio::io::duplex(64);
        let (tx, _rx) = frame_channel(1);
        let feeder = tokio::spawn(feed(BufReader::new(reader), tx));

        let shutdown = CancellationToken::new();
        shutdown.cancel();
        let finished =
            tokio::time::timeout(Duration::from_secs(5), finish_feed(feeder, &shutdown)).await;

        assert!(matches!(finished, Ok(Ok(None))));
    }

    #[tokio::test]
    async fn test_finish_feed_waits_for_reader_to_drain() {
        let (tx, _rx) = frame_channel(8);
        let feeder = tokio::spawn(feed(BufReader::new(b"a\n\nb\n".as_slice()), tx));

        let sent = finish_feed(feeder, &CancellationToken::new()).await.unwrap();
        assert_eq!(sent, Some(2));
    }

    #[test]
    fn test_cli_parses_options() {
        let cli = Cli::parse_from([
            "herald-replay",
            "--log-level",
            "debug",
            "-c",
            "h.toml",
            "-",
        ]);
        assert_eq!(cli.input, "-");
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert_eq!(cli.config, Some(PathBuf::from("h.toml")));
    }
}
