//! `replay` subcommand: run a fixture through the controller on a virtual
//! clock.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use feedtidy_config::FeedConfig;
use feedtidy_core::{EntrySnapshot, PassReport};
use feedtidy_dom_memory::{DocumentFixture, MemoryDocument};
use feedtidy_protocols::{HostEvent, NavigationWatcher};
use feedtidy_runloop::FeedController;

/// What `replay` prints.
#[derive(Debug, Serialize)]
pub(crate) struct ReplayOutput {
    pub location: String,
    pub state: String,
    pub elapsed_ms: u64,
    pub passes: u64,
    pub last_report: Option<PassReport>,
    pub entries: Vec<EntrySnapshot>,
}

/// Load the fixture, replay it and print the result as JSON.
pub(crate) fn handle_replay(
    config: FeedConfig,
    fixture: &Path,
    at_ms: u64,
    passes: u32,
) -> anyhow::Result<()> {
    let fixture = DocumentFixture::load(fixture)
        .with_context(|| format!("loading fixture {}", fixture.display()))?;
    let mut doc = fixture.build();
    let output = replay(config, &mut doc, at_ms, passes)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Advance the controller deadline by deadline, answering every paint request
/// right after the pass that made it.
fn advance(controller: &mut FeedController, doc: &mut MemoryDocument, target: Instant) {
    while let Some(due) = controller.next_deadline() {
        if due > target {
            break;
        }
        controller.run_due(doc, due);
        paint(controller, doc, due);
    }
}

fn paint(controller: &mut FeedController, doc: &mut MemoryDocument, now: Instant) {
    while doc.take_paint_request() {
        controller.handle_event(doc, HostEvent::AfterPaint, now);
    }
}

pub(crate) fn replay(
    config: FeedConfig,
    doc: &mut MemoryDocument,
    at_ms: u64,
    passes: u32,
) -> anyhow::Result<ReplayOutput> {
    let debounce = config.timing.debounce();
    let mut controller = FeedController::new(config)?;
    let start = Instant::now();
    let mut now = start + Duration::from_millis(at_ms);

    controller.handle_event(doc, HostEvent::Loaded, start);
    advance(&mut controller, doc, now);

    for _ in 0..passes {
        let Some(container) = controller.container() else {
            break;
        };
        // Every observer on the container belongs to the controller.
        let observers = doc.observers_on(container);
        for observer in observers {
            controller.handle_event(doc, HostEvent::Mutation { observer }, now);
        }
        now += debounce;
        advance(&mut controller, doc, now);
    }

    let entries = match controller.container() {
        Some(container) => controller.reconciler().snapshot(&*doc, container),
        None => Vec::new(),
    };
    info!(
        entries = entries.len(),
        passes = controller.passes(),
        "replay finished"
    );

    Ok(ReplayOutput {
        location: doc.current_location(),
        state: format!("{:?}", controller.state()),
        elapsed_ms: now.duration_since(start).as_millis() as u64,
        passes: controller.passes(),
        last_report: controller.last_report().copied(),
        entries,
    })
}
