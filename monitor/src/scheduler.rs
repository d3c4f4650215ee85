//! Polling scheduler.
//!
//! Drives the health checker and the route aggregator on a fixed interval and on
//! demand. The latest results live in a `watch` channel so presenters can either
//! take a snapshot or subscribe to changes.
//!
//! Overlapping cycles are neither coalesced nor cancelled: each aggregator writes
//! its slot when it resolves, so the state reflects the most recently *completed*
//! work.

use crate::error::MonitorResult;
use crate::health::{build_client, probe_all, EndpointProber, HealthChecker};
use chrono::Utc;
use healthdash_common::config::MonitorConfig;
use healthdash_common::types::{EndpointSpec, HealthRecord, PollingState, RouteStatus};
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

/// What caused a refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// First tick after `start()`.
    Mount,
    /// Periodic timer.
    Timer,
    /// Explicit `refresh_now()` / `run_cycle()`.
    Manual,
}

impl RefreshTrigger {
    fn as_str(&self) -> &'static str {
        match self {
            RefreshTrigger::Mount => "mount",
            RefreshTrigger::Timer => "timer",
            RefreshTrigger::Manual => "manual",
        }
    }
}

/// Polling scheduler handle. Cheap to clone; all clones share one state.
///
/// The periodic task keeps a clone alive, so teardown is explicit via
/// [`PollingScheduler::shutdown`].
#[derive(Clone)]
pub struct PollingScheduler {
    inner: Arc<Inner>,
}

struct Inner {
    base_url: String,
    endpoints: Vec<EndpointSpec>,
    prober: EndpointProber,
    checker: HealthChecker,
    interval: Duration,
    state: watch::Sender<PollingState>,
    health_in_flight: AtomicUsize,
    routes_in_flight: AtomicUsize,
    cancel: CancellationToken,
}

impl PollingScheduler {
    /// Build a scheduler with its own HTTP client.
    pub fn new(config: &MonitorConfig) -> MonitorResult<Self> {
        let client = build_client(config.request_timeout())?;
        Ok(Self::with_client(config, client))
    }

    /// Build a scheduler sharing an existing HTTP client.
    pub fn with_client(config: &MonitorConfig, client: Client) -> Self {
        let (state, _) = watch::channel(PollingState::initial());

        Self {
            inner: Arc::new(Inner {
                base_url: config.base_url.clone(),
                endpoints: config.endpoints.clone(),
                prober: EndpointProber::new(client.clone()),
                checker: HealthChecker::new(client),
                interval: config.poll_interval(),
                state,
                health_in_flight: AtomicUsize::new(0),
                routes_in_flight: AtomicUsize::new(0),
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Backend base URL being polled.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Static route list, in display order.
    pub fn endpoints(&self) -> &[EndpointSpec] {
        &self.inner.endpoints
    }

    /// Start the periodic task (mount).
    ///
    /// The first tick fires immediately and counts as the mount refresh.
    pub fn start(&self) -> JoinHandle<()> {
        let scheduler = self.clone();
        tokio::spawn(async move { scheduler.timer_loop().await })
    }

    async fn timer_loop(&self) {
        let mut timer = interval(self.inner.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            base_url = %self.inner.base_url,
            interval_secs = self.inner.interval.as_secs(),
            routes = self.inner.endpoints.len(),
            "Polling scheduler started"
        );

        let mut trigger = RefreshTrigger::Mount;
        loop {
            tokio::select! {
                _ = self.inner.cancel.cancelled() => break,
                _ = timer.tick() => {
                    self.spawn_cycle(trigger);
                    trigger = RefreshTrigger::Timer;
                }
            }
        }

        info!("Polling scheduler stopped");
    }

    /// Trigger a refresh without waiting for it.
    ///
    /// Calls made while a cycle is still running start another cycle. The
    /// handle resolves to `false` if the cycle was cut short by teardown.
    pub fn refresh_now(&self) -> JoinHandle<bool> {
        self.spawn_cycle(RefreshTrigger::Manual)
    }

    fn spawn_cycle(&self, trigger: RefreshTrigger) -> JoinHandle<bool> {
        let scheduler = self.clone();
        tokio::spawn(async move { scheduler.run_cycle_with(trigger).await })
    }

    /// Run one aggregation cycle in place.
    pub async fn run_cycle(&self) -> bool {
        self.run_cycle_with(RefreshTrigger::Manual).await
    }

    async fn run_cycle_with(&self, trigger: RefreshTrigger) -> bool {
        let inner = &self.inner;
        if inner.cancel.is_cancelled() {
            return false;
        }

        let cycle_id = Uuid::new_v4();
        debug!(cycle_id = %cycle_id, trigger = trigger.as_str(), "Refresh cycle started");
        self.begin_cycle();

        let health = async {
            let record = inner.checker.check_health(&inner.base_url).await;
            self.finish_health(record);
        };
        let routes = async {
            let statuses = probe_all(&inner.prober, &inner.base_url, &inner.endpoints).await;
            self.finish_routes(statuses);
        };

        let completed = tokio::select! {
            _ = inner.cancel.cancelled() => false,
            _ = async { tokio::join!(health, routes) } => true,
        };
        if !completed {
            debug!(cycle_id = %cycle_id, "Refresh cycle dropped by teardown");
            return false;
        }

        self.complete_cycle();
        debug!(cycle_id = %cycle_id, "Refresh cycle completed");
        true
    }

    fn begin_cycle(&self) {
        let inner = &self.inner;
        inner.state.send_if_modified(|state| {
            if inner.cancel.is_cancelled() {
                return false;
            }
            inner.health_in_flight.fetch_add(1, Ordering::SeqCst);
            inner.routes_in_flight.fetch_add(1, Ordering::SeqCst);
            state.health_loading = true;
            state.routes_loading = true;
            true
        });
    }

    fn finish_health(&self, record: HealthRecord) {
        let inner = &self.inner;
        inner.state.send_if_modified(|state| {
            if inner.cancel.is_cancelled() {
                return false;
            }
            state.health_loading = release(&inner.health_in_flight);
            state.health_record = Some(record);
            true
        });
    }

    fn finish_routes(&self, statuses: Vec<RouteStatus>) {
        let inner = &self.inner;
        inner.state.send_if_modified(|state| {
            if inner.cancel.is_cancelled() {
                return false;
            }
            state.routes_loading = release(&inner.routes_in_flight);
            state.route_statuses = statuses;
            true
        });
    }

    fn complete_cycle(&self) {
        let inner = &self.inner;
        inner.state.send_if_modified(|state| {
            if inner.cancel.is_cancelled() {
                return false;
            }
            state.last_update = Some(Utc::now());
            true
        });
    }

    /// Current state.
    pub fn snapshot(&self) -> PollingState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<PollingState> {
        self.inner.state.subscribe()
    }

    /// Teardown: stop the timer and drop every in-flight cycle.
    pub fn shutdown(&self) {
        if !self.inner.cancel.is_cancelled() {
            info!("Shutting down polling scheduler");
        }
        self.inner.cancel.cancel();
    }

    /// Whether `shutdown()` has been called.
    pub fn is_shut_down(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }
}

/// Decrement an in-flight counter; returns whether work is still outstanding.
fn release(counter: &AtomicUsize) -> bool {
    let previous = counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
            Some(n.saturating_sub(1))
        })
        .unwrap_or_else(|n| n);
    previous > 1
}
