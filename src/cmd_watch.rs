//! `watch` subcommand: drive a fixture in real time with the tokio driver.
//!
//! Host events arrive as JSON lines on stdin, e.g.
//! `{"type":"mutation","observer":1}` or `{"type":"after_paint"}`.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use feedtidy_config::FeedConfig;
use feedtidy_dom_memory::DocumentFixture;
use feedtidy_protocols::HostEvent;
use feedtidy_runloop::{CancellationToken, Driver, FeedController};

pub(crate) async fn handle_watch(
    config: FeedConfig,
    fixture: &Path,
    duration_ms: Option<u64>,
) -> anyhow::Result<()> {
    let doc = DocumentFixture::load(fixture)
        .with_context(|| format!("loading fixture {}", fixture.display()))?
        .build();
    let controller = FeedController::new(config)?;

    let (tx, rx) = mpsc::unbounded_channel();
    let shutdown = CancellationToken::new();
    tx.send(HostEvent::Loaded)?;

    let stdin_tx = tx.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<HostEvent>(line) {
                Ok(event) => {
                    if stdin_tx.send(event).is_err() {
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "ignoring malformed host event"),
            }
        }
    });

    let stopper = shutdown.clone();
    tokio::spawn(async move {
        match duration_ms {
            Some(ms) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = tokio::time::sleep(Duration::from_millis(ms)) => {}
                }
            }
            None => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
        info!("shutting down");
        stopper.cancel();
    });

    let mut driver = Driver::new(controller, doc, rx, shutdown);
    driver.run().await?;
    // Held until here so the channel outlives stdin.
    drop(tx);

    let (controller, doc) = driver.into_parts();
    let entries = match controller.container() {
        Some(container) => controller.reconciler().snapshot(&doc, container),
        None => Vec::new(),
    };
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
