//! Deterministic controller: turns host events and timer deadlines into
//! reconciliation passes.
//!
//! The controller never reads a clock. Every entry point takes `now`, so the
//! same sequence of calls produces the same writes whether driven by the
//! tokio [`Driver`](crate::Driver) or by a virtual clock in tests.

use std::time::Instant;

use feedtidy_config::{ConfigValidator, FeedConfig, TimingConfig};
use feedtidy_core::{
    inject_style, ActivationWindow, PassReport, ReconciliationSession, Reconciler,
};
use feedtidy_protocols::{FeedHost, HostEvent, NodeId, ObserveOptions, ObserverId};
use tracing::{debug, info, trace, warn};

use crate::error::RunLoopResult;
use crate::timer::{TaskKind, TimerHandle, TimerQueue};

/// Lifecycle of the controller within one page location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Not initialised yet (before the bootstrap delay elapses).
    Waiting,
    /// Looking for the feed container.
    Discovering { attempts: u32 },
    /// Observing the container and running passes.
    Watching { container: NodeId },
    /// Gave up on discovery for this location.
    Idle,
}

/// Owns the reconciliation session and every scheduled task.
#[derive(Debug)]
pub struct FeedController {
    reconciler: Reconciler,
    timing: TimingConfig,
    state: ControllerState,
    timers: TimerQueue,
    session: Option<ReconciliationSession>,
    location: Option<String>,
    started: bool,
    container_observer: Option<ObserverId>,
    discovery_observer: Option<ObserverId>,
    debounce: Option<TimerHandle>,
    discovery_retry: Option<TimerHandle>,
    rescan: Option<TimerHandle>,
    paint_requested: bool,
    passes: u64,
    last_report: Option<PassReport>,
}

impl FeedController {
    /// Validate `config` and build a controller. Warnings are logged.
    pub fn new(config: FeedConfig) -> RunLoopResult<Self> {
        let warnings = ConfigValidator::validate(&config).into_result()?;
        for warning in &warnings {
            warn!(path = %warning.path, "{}", warning.message);
        }

        let timing = config.timing.clone();
        Ok(Self {
            reconciler: Reconciler::new(config)?,
            timing,
            state: ControllerState::Waiting,
            timers: TimerQueue::new(),
            session: None,
            location: None,
            started: false,
            container_observer: None,
            discovery_observer: None,
            debounce: None,
            discovery_retry: None,
            rescan: None,
            paint_requested: false,
            passes: 0,
            last_report: None,
        })
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn session(&self) -> Option<&ReconciliationSession> {
        self.session.as_ref()
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn last_report(&self) -> Option<&PassReport> {
        self.last_report.as_ref()
    }

    /// Passes run since the controller was created.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn container(&self) -> Option<NodeId> {
        match self.state {
            ControllerState::Watching { container } => Some(container),
            _ => None,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn pending_tasks(&self) -> Vec<TaskKind> {
        self.timers.pending()
    }

    /// The page is loaded: schedule bootstrap after the init delay.
    /// Calling it again is a no-op.
    pub fn start<H: FeedHost>(&mut self, host: &mut H, now: Instant) {
        if self.started {
            return;
        }
        self.started = true;
        self.location = Some(host.current_location());
        self.timers
            .schedule(TaskKind::Bootstrap, now + self.timing.init_delay());
        info!(
            location = self.location.as_deref().unwrap_or_default(),
            delay_ms = self.timing.init_delay_ms,
            "feed controller started"
        );
    }

    pub fn handle_event<H: FeedHost>(&mut self, host: &mut H, event: HostEvent, now: Instant) {
        trace!(?event, "host event");
        match event {
            HostEvent::Loaded => self.start(host, now),
            HostEvent::Mutation { observer } => {
                if self.container_observer == Some(observer) {
                    self.schedule_debounce(now);
                } else if self.discovery_observer == Some(observer) {
                    self.try_discover(host, now);
                } else {
                    trace!(observer = observer.raw(), "mutation from stale observer ignored");
                }
            }
            HostEvent::HistoryChanged => {
                self.check_navigation(host, now);
            }
            HostEvent::AfterPaint => {
                self.paint_requested = false;
                if let Some(session) = self.session.as_mut() {
                    let added = self.reconciler.measure_pending(host, session);
                    if added > 0 {
                        debug!(added, "ellipsis markers added");
                    }
                }
            }
        }
    }

    /// Fire every task due at or before `now`. Returns the number fired.
    pub fn run_due<H: FeedHost>(&mut self, host: &mut H, now: Instant) -> usize {
        let mut fired = 0;
        while let Some((handle, kind)) = self.timers.pop_due(now) {
            fired += 1;
            self.fire(host, handle, kind, now);
        }
        fired
    }

    /// Virtual clock: fire tasks deadline by deadline up to `target`, each
    /// with its own deadline as `now`.
    pub fn advance_to<H: FeedHost>(&mut self, host: &mut H, target: Instant) -> usize {
        let mut fired = 0;
        while let Some(due) = self.timers.next_deadline() {
            if due > target {
                break;
            }
            fired += self.run_due(host, due);
        }
        fired
    }

    /// Compare the host location with the last one seen and reinitialise on
    /// change. Returns whether a reset happened.
    pub fn check_navigation<H: FeedHost>(&mut self, host: &mut H, now: Instant) -> bool {
        let location = host.current_location();
        if self.location.as_deref() == Some(location.as_str()) {
            return false;
        }
        info!(
            from = self.location.as_deref().unwrap_or_default(),
            to = %location,
            "location changed, resetting"
        );
        self.teardown(host);
        self.location = Some(location);
        if self.started {
            self.initialize(host, now);
        }
        true
    }

    fn fire<H: FeedHost>(&mut self, host: &mut H, handle: TimerHandle, kind: TaskKind, now: Instant) {
        trace!(task = %kind, "task fired");
        match kind {
            TaskKind::Bootstrap => self.initialize(host, now),
            TaskKind::DiscoveryRetry => {
                if self.discovery_retry == Some(handle) {
                    self.discovery_retry = None;
                }
                self.retry_discovery(host, now);
            }
            TaskKind::Debounce => {
                if self.debounce == Some(handle) {
                    self.debounce = None;
                }
                self.run_pass(host, now);
            }
            TaskKind::Rescan => {
                if self.rescan == Some(handle) {
                    self.rescan = None;
                }
                self.run_pass(host, now);
                if self.rescan.is_none() && self.container().is_some() {
                    self.rescan = Some(
                        self.timers
                            .schedule(TaskKind::Rescan, now + self.timing.rescan_interval()),
                    );
                }
            }
            TaskKind::ExpandActivation | TaskKind::DedupeActivation => {
                debug!(task = %kind, "activation reached");
                self.run_pass(host, now);
            }
        }
    }

    fn initialize<H: FeedHost>(&mut self, host: &mut H, now: Instant) {
        if let Err(e) = inject_style(host, self.reconciler.config()) {
            warn!(error = %e, "style injection failed");
        }

        let window = ActivationWindow::starting_at(now, &self.timing);
        self.session = Some(ReconciliationSession::new(window));
        self.timers
            .schedule(TaskKind::ExpandActivation, window.expand_enabled_at);
        self.timers
            .schedule(TaskKind::DedupeActivation, window.dedupe_enabled_at);

        if !self.try_discover(host, now) {
            self.begin_discovery(host, now);
        }
    }

    fn begin_discovery<H: FeedHost>(&mut self, host: &mut H, now: Instant) {
        info!("feed container not found, waiting for it");
        self.state = ControllerState::Discovering { attempts: 0 };
        if self.discovery_observer.is_none() {
            if let Some(body) = host.body() {
                self.discovery_observer = Some(host.observe(body, ObserveOptions::structure()));
            }
        }
        self.schedule_discovery_retry(now);
    }

    fn schedule_discovery_retry(&mut self, now: Instant) {
        if let Some(previous) = self.discovery_retry.take() {
            self.timers.cancel(previous);
        }
        self.discovery_retry = Some(self.timers.schedule(
            TaskKind::DiscoveryRetry,
            now + self.timing.discovery_interval(),
        ));
    }

    fn retry_discovery<H: FeedHost>(&mut self, host: &mut H, now: Instant) {
        let ControllerState::Discovering { attempts } = self.state else {
            return;
        };
        if self.try_discover(host, now) {
            return;
        }
        let attempts = attempts + 1;
        if attempts >= self.timing.discovery_max_attempts {
            info!(attempts, "feed container never appeared, going idle");
            self.stop_discovery(host);
            self.state = ControllerState::Idle;
            return;
        }
        self.state = ControllerState::Discovering { attempts };
        self.schedule_discovery_retry(now);
    }

    /// Start watching if the container exists. Returns whether it was found.
    fn try_discover<H: FeedHost>(&mut self, host: &mut H, now: Instant) -> bool {
        let Some(container) = self.reconciler.find_container(&*host) else {
            return false;
        };
        self.stop_discovery(host);
        self.start_watching(host, container, now);
        true
    }

    fn stop_discovery<H: FeedHost>(&mut self, host: &mut H) {
        if let Some(observer) = self.discovery_observer.take() {
            host.disconnect(observer);
        }
        if let Some(retry) = self.discovery_retry.take() {
            self.timers.cancel(retry);
        }
    }

    fn start_watching<H: FeedHost>(&mut self, host: &mut H, container: NodeId, now: Instant) {
        info!(%container, "watching feed container");
        self.state = ControllerState::Watching { container };
        self.container_observer = Some(host.observe(container, ObserveOptions::everything()));
        if self.rescan.is_none() {
            self.rescan = Some(
                self.timers
                    .schedule(TaskKind::Rescan, now + self.timing.rescan_interval()),
            );
        }
        self.run_pass(host, now);
    }

    fn stop_watching<H: FeedHost>(&mut self, host: &mut H) {
        if let Some(observer) = self.container_observer.take() {
            host.disconnect(observer);
        }
        for handle in [self.debounce.take(), self.rescan.take()].into_iter().flatten() {
            self.timers.cancel(handle);
        }
    }

    /// Trailing-edge debounce: the newest burst replaces the pending task.
    fn schedule_debounce(&mut self, now: Instant) {
        if let Some(previous) = self.debounce.take() {
            self.timers.cancel(previous);
        }
        self.debounce = Some(
            self.timers
                .schedule(TaskKind::Debounce, now + self.timing.debounce()),
        );
    }

    fn run_pass<H: FeedHost>(&mut self, host: &mut H, now: Instant) -> Option<PassReport> {
        let container = self.container()?;
        if !host.is_connected(container) {
            info!(%container, "feed container detached, rediscovering");
            self.stop_watching(host);
            if !self.try_discover(host, now) {
                self.begin_discovery(host, now);
            }
            return None;
        }

        let session = self.session.as_mut()?;
        let report = self.reconciler.reconcile(host, container, session, now);
        self.passes += 1;

        if session.has_pending_measurements() && !self.paint_requested {
            host.request_after_next_paint();
            self.paint_requested = true;
        }
        self.last_report = Some(report);
        Some(report)
    }

    /// Disconnect observers and drop all tasks and per-location state.
    fn teardown<H: FeedHost>(&mut self, host: &mut H) {
        for observer in [self.container_observer.take(), self.discovery_observer.take()]
            .into_iter()
            .flatten()
        {
            host.disconnect(observer);
        }
        self.timers.clear();
        self.debounce = None;
        self.discovery_retry = None;
        self.rescan = None;
        self.session = None;
        self.paint_requested = false;
        self.last_report = None;
        self.state = ControllerState::Waiting;
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
