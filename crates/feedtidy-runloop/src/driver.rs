//! Tokio driver feeding host events and timer deadlines to a
//! [`FeedController`].

use std::time::Instant;

use feedtidy_protocols::{FeedHost, HostEvent};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::controller::FeedController;
use crate::error::{RunLoopError, RunLoopResult};

/// Current instant on the tokio clock, which honours paused test time.
fn tokio_now() -> Instant {
    tokio::time::Instant::now().into_std()
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

/// Single-task event loop owning the controller and the host.
pub struct Driver<H> {
    controller: FeedController,
    host: H,
    events: mpsc::UnboundedReceiver<HostEvent>,
    shutdown: CancellationToken,
}

impl<H: FeedHost> Driver<H> {
    pub fn new(
        controller: FeedController,
        host: H,
        events: mpsc::UnboundedReceiver<HostEvent>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            controller,
            host,
            events,
            shutdown,
        }
    }

    pub fn controller(&self) -> &FeedController {
        &self.controller
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_parts(self) -> (FeedController, H) {
        (self.controller, self.host)
    }

    /// Run until the shutdown token fires (`Ok`) or the event channel
    /// closes (`ChannelClosed`).
    pub async fn run(&mut self) -> RunLoopResult<()> {
        let Self {
            controller,
            host,
            events,
            shutdown,
        } = self;
        info!("feed driver running");

        loop {
            let deadline = controller.next_deadline();
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!(passes = controller.passes(), "feed driver stopped");
                    return Ok(());
                }

                event = events.recv() => {
                    let Some(event) = event else {
                        debug!("host event channel closed");
                        return Err(RunLoopError::ChannelClosed);
                    };
                    let now = tokio_now();
                    controller.handle_event(host, event, now);
                    controller.run_due(host, now);
                }

                _ = sleep_until(deadline) => {
                    controller.run_due(host, tokio_now());
                }
            }
        }
    }
}
