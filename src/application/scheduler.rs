//! # Update Scheduler
//!
//! Owns one independently timed refresh task per [`ViewKind`] and the latest
//! snapshot of each view.
//!
//! # Lifecycle
//!
//! ```text
//! Stopped --start()--> Running --stop()--> Stopped
//!    |                    |
//!    +--- refresh_now() --+   (callable in either state)
//! ```
//!
//! A refresh runs fetch, rate, build, publish and notify strictly in that
//! order. Only the fetch suspends; everything after it runs under the view's
//! slot lock, so `stop()` waits for an in-flight publication and every timer
//! tick that fires afterwards finds a stale epoch and does nothing.
//!
//! Views are independent. Readers must tolerate snapshots of different views
//! being at different generations.
//!
//! # Data Source Degradation
//!
//! The last successful fetch is kept. A failed fetch marks the scheduler
//! degraded, raises one warning alert on the transition and reuses the
//! last-known baselines. The next successful fetch clears the flag.
//!
//! Fetched rows are screened first: invalid rows and repeated names are
//! dropped with a warning. A fetch left with no usable row counts as failed.
//!
//! # Examples
//!
//! ```
//! use mm_monitor::application::scheduler::{SchedulerSettings, UpdateScheduler};
//! use mm_monitor::application::views::ViewKind;
//! use mm_monitor::domain::services::metric_generator::StdRandomSource;
//! use mm_monitor::domain::services::rating_engine::RatingEngine;
//! use mm_monitor::infrastructure::roster::SimulatedMetricsSource;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let engine = RatingEngine::new(2025, Box::new(StdRandomSource::seeded(7)));
//! let scheduler = UpdateScheduler::new(
//!     SchedulerSettings::default(),
//!     Arc::new(SimulatedMetricsSource::with_base_roster()),
//!     engine,
//! );
//!
//! assert!(!scheduler.get_snapshot(ViewKind::Rankings).is_available());
//!
//! let snapshot = scheduler.refresh_now(ViewKind::Rankings).await.unwrap();
//! assert_eq!(snapshot.generation(), 1);
//! assert!(scheduler.get_snapshot(ViewKind::Rankings).is_available());
//! # });
//! ```

use crate::application::alert_book::{AlertBook, AlertStats};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::subscribers::{SnapshotCallback, SubscriberRegistry};
use crate::application::views::builders::{
    self, AlertsView, ChartHistory, PillarDetail, PillarRotation,
};
use crate::application::views::{SnapshotState, ViewKind, ViewPayload, ViewSnapshot};
use crate::domain::entities::alert::Alert;
use crate::domain::entities::market_maker::{MarketMakerBaseline, RatedMarketMaker};
use crate::domain::services::rating_engine::RatingEngine;
use crate::domain::value_objects::enums::AlertLevel;
use crate::domain::value_objects::ids::{AlertId, SubscriptionId};
use crate::domain::value_objects::timestamp::Timestamp;
use crate::infrastructure::data_source::{MetricsSource, SourceError, SourceResult};
use crate::telemetry;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

const VIEW_COUNT: usize = ViewKind::ALL.len();

/// Fetches slower than this are logged.
const SLOW_FETCH: Duration = Duration::from_millis(500);

/// Tuning for the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerSettings {
    periods: [Duration; VIEW_COUNT],
    /// Ticks the pillar-detail view stays on one maker.
    pub pillar_rotate_every: u32,
    /// Alert book capacity.
    pub alert_capacity: usize,
    /// Entries in the rankings view.
    pub top_n: usize,
    /// Points kept in the chart history.
    pub chart_history_len: usize,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            periods: [
                Duration::from_millis(2_000),
                Duration::from_millis(10_000),
                Duration::from_millis(1_000),
                Duration::from_millis(3_000),
                Duration::from_millis(2_000),
                Duration::from_millis(15_000),
                Duration::from_millis(2_000),
            ],
            pillar_rotate_every: 5,
            alert_capacity: 20,
            top_n: 5,
            chart_history_len: 6,
        }
    }
}

impl SchedulerSettings {
    /// Sets the refresh period of `view`.
    #[must_use]
    pub fn with_period(mut self, view: ViewKind, period: Duration) -> Self {
        if let Some(slot) = self.periods.get_mut(view.index()) {
            *slot = period;
        }
        self
    }

    /// Refresh period of `view`.
    #[must_use]
    pub fn period(&self, view: ViewKind) -> Duration {
        self.periods
            .get(view.index())
            .copied()
            .unwrap_or(Duration::from_secs(1))
    }
}

/// Timer state of one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    /// No timer armed.
    Stopped,
    /// Timer armed.
    Running,
}

/// Per-view status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewStatus {
    /// View.
    pub view: ViewKind,
    /// Timer state.
    pub state: ViewState,
    /// Refresh period in milliseconds.
    pub period_ms: u64,
    /// Generation of the latest snapshot, 0 if none.
    pub generation: u64,
    /// Time of the latest snapshot.
    pub last_refreshed: Option<Timestamp>,
}

/// Scheduler status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulerStatus {
    /// Whether timers are armed.
    pub running: bool,
    /// Whether the data source is failing.
    pub degraded: bool,
    /// Registered subscribers.
    pub subscribers: usize,
    /// Per-view status.
    pub views: Vec<ViewStatus>,
}

#[derive(Debug, Clone, Copy)]
enum Trigger {
    Timer(u64),
    Manual,
}

enum RefreshOutcome {
    Published(Arc<ViewSnapshot>),
    Skipped,
    Unavailable,
}

#[derive(Debug)]
struct ViewSlot {
    state: ViewState,
    epoch: u64,
    task: Option<JoinHandle<()>>,
    generation: u64,
    chart: ChartHistory,
    rotation: PillarRotation,
}

#[derive(Debug)]
struct Inner {
    settings: SchedulerSettings,
    source: Arc<dyn MetricsSource>,
    engine: Mutex<RatingEngine>,
    subscribers: SubscriberRegistry,
    alerts: Mutex<AlertBook>,
    last_known: Mutex<Option<Arc<Vec<MarketMakerBaseline>>>>,
    degraded: AtomicBool,
    running: AtomicBool,
    lifecycle: Mutex<()>,
    slots: [Mutex<ViewSlot>; VIEW_COUNT],
    snapshots: [RwLock<Option<Arc<ViewSnapshot>>>; VIEW_COUNT],
}

/// Multi-view refresh and broadcast scheduler.
///
/// Cheap to clone; clones share state.
///
/// Lock order inside a refresh is slot, then engine, alert book or snapshot
/// cell. Subscriber callbacks run while the slot is held and must not call
/// [`start`](Self::start), [`stop`](Self::stop) or [`refresh_now`](Self::refresh_now).
#[derive(Debug, Clone)]
pub struct UpdateScheduler {
    inner: Arc<Inner>,
}

impl UpdateScheduler {
    /// Creates a stopped scheduler with no snapshots.
    #[must_use]
    pub fn new(
        settings: SchedulerSettings,
        source: Arc<dyn MetricsSource>,
        engine: RatingEngine,
    ) -> Self {
        let slots = std::array::from_fn(|_| {
            Mutex::new(ViewSlot {
                state: ViewState::Stopped,
                epoch: 0,
                task: None,
                generation: 0,
                chart: ChartHistory::new(settings.chart_history_len),
                rotation: PillarRotation::new(settings.pillar_rotate_every),
            })
        });
        let alerts = AlertBook::new(settings.alert_capacity);

        Self {
            inner: Arc::new(Inner {
                settings,
                source,
                engine: Mutex::new(engine),
                subscribers: SubscriberRegistry::new(),
                alerts: Mutex::new(alerts),
                last_known: Mutex::new(None),
                degraded: AtomicBool::new(false),
                running: AtomicBool::new(false),
                lifecycle: Mutex::new(()),
                slots,
                snapshots: std::array::from_fn(|_| RwLock::new(None)),
            }),
        }
    }

    /// Arms every view timer and refreshes each view once.
    ///
    /// Returns false if already running.
    pub async fn start(&self) -> bool {
        let epochs = {
            let _guard = self.inner.lifecycle.lock();
            if self.inner.running.load(Ordering::SeqCst) {
                tracing::debug!("scheduler already running");
                return false;
            }
            let epochs = ViewKind::ALL.map(|view| self.inner.arm(view));
            self.inner.running.store(true, Ordering::SeqCst);
            epochs
        };

        tracing::info!(source = self.inner.source.name(), "scheduler started");
        self.inner
            .raise_system(AlertLevel::Info, "Update scheduler started");

        for (view, epoch) in ViewKind::ALL.into_iter().zip(epochs) {
            self.inner.refresh(view, Trigger::Timer(epoch)).await;
        }
        true
    }

    /// Cancels every view timer.
    ///
    /// No timer-driven notification is delivered after this returns. A
    /// publication already in progress completes first. Returns false if
    /// already stopped.
    pub fn stop(&self) -> bool {
        {
            let _guard = self.inner.lifecycle.lock();
            if !self.inner.running.load(Ordering::SeqCst) {
                return false;
            }
            for view in ViewKind::ALL {
                self.inner.disarm(view);
            }
            self.inner.running.store(false, Ordering::SeqCst);
        }

        tracing::info!("scheduler stopped");
        self.inner
            .raise_system(AlertLevel::Warning, "Update scheduler stopped");
        true
    }

    /// Refreshes one view immediately, in either state.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::ViewUnavailable`] if no baseline data has
    /// ever been fetched.
    pub async fn refresh_now(&self, view: ViewKind) -> ApplicationResult<Arc<ViewSnapshot>> {
        match self.inner.refresh(view, Trigger::Manual).await {
            RefreshOutcome::Published(snapshot) => Ok(snapshot),
            RefreshOutcome::Skipped | RefreshOutcome::Unavailable => {
                Err(ApplicationError::view_unavailable(view))
            }
        }
    }

    /// Refreshes every view immediately.
    ///
    /// # Errors
    ///
    /// Returns the first view that could not be produced.
    pub async fn refresh_all(&self) -> ApplicationResult<Vec<Arc<ViewSnapshot>>> {
        let mut published = Vec::with_capacity(VIEW_COUNT);
        for view in ViewKind::ALL {
            published.push(self.refresh_now(view).await?);
        }
        Ok(published)
    }

    /// Latest snapshot of `view`.
    #[must_use]
    pub fn get_snapshot(&self, view: ViewKind) -> SnapshotState {
        match self.inner.snapshot(view) {
            Some(snapshot) => SnapshotState::Available(snapshot),
            None => SnapshotState::Unavailable,
        }
    }

    /// Whether timers are armed.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Whether the data source is currently failing.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.inner.degraded.load(Ordering::SeqCst)
    }

    /// Current status of the scheduler and every view.
    #[must_use]
    pub fn status(&self) -> SchedulerStatus {
        let views = ViewKind::ALL
            .into_iter()
            .map(|view| {
                let (state, generation) = {
                    let slot = self.inner.slot(view).lock();
                    (slot.state, slot.generation)
                };
                ViewStatus {
                    view,
                    state,
                    period_ms: u64::try_from(self.inner.settings.period(view).as_millis())
                        .unwrap_or(u64::MAX),
                    generation,
                    last_refreshed: self.inner.snapshot(view).map(|s| s.generated_at()),
                }
            })
            .collect();

        SchedulerStatus {
            running: self.is_running(),
            degraded: self.is_degraded(),
            subscribers: self.inner.subscribers.len(),
            views,
        }
    }

    /// Registers a snapshot subscriber.
    pub fn subscribe(&self, callback: SnapshotCallback) -> SubscriptionId {
        self.inner.subscribers.subscribe(callback)
    }

    /// Removes a subscriber. Returns false if the handle is unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.subscribers.unsubscribe(id)
    }

    /// Rated roster from the latest market-makers snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::ViewUnavailable`] before the first refresh.
    pub fn market_makers(&self) -> ApplicationResult<Vec<RatedMarketMaker>> {
        let snapshot = self
            .inner
            .snapshot(ViewKind::MarketMakers)
            .ok_or_else(|| ApplicationError::view_unavailable(ViewKind::MarketMakers))?;
        match snapshot.payload() {
            ViewPayload::MarketMakers(makers) => Ok(makers.clone()),
            _ => Err(ApplicationError::internal("market makers view holds another payload")),
        }
    }

    /// One maker by name, case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns not found for an unknown name, or unavailable before the
    /// first refresh.
    pub fn market_maker(&self, name: &str) -> ApplicationResult<RatedMarketMaker> {
        self.market_makers()?
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ApplicationError::not_found("market maker", name))
    }

    /// Pillar breakdown of one maker, case-insensitive.
    ///
    /// # Errors
    ///
    /// Same as [`market_maker`](Self::market_maker).
    pub fn pillar_detail_for(&self, name: &str) -> ApplicationResult<PillarDetail> {
        self.market_maker(name)
            .map(|maker| builders::pillar_detail(&maker))
    }

    /// All alerts, oldest first.
    #[must_use]
    pub fn alerts(&self) -> Vec<Alert> {
        self.inner.alerts.lock().all()
    }

    /// Active alerts, oldest first.
    #[must_use]
    pub fn active_alerts(&self) -> Vec<Alert> {
        self.inner.alerts.lock().active()
    }

    /// Alerts of one level.
    #[must_use]
    pub fn alerts_by_level(&self, level: AlertLevel) -> Vec<Alert> {
        self.inner.alerts.lock().by_level(level)
    }

    /// Alert statistics.
    #[must_use]
    pub fn alert_stats(&self) -> AlertStats {
        self.inner.alerts.lock().stats()
    }

    /// Raises a manual alert, optionally bound to a maker.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty message or a red-flag
    /// severity level.
    pub fn create_alert(
        &self,
        level: AlertLevel,
        message: &str,
        market_maker: Option<&str>,
    ) -> ApplicationResult<Alert> {
        if message.trim().is_empty() {
            return Err(ApplicationError::validation("message must not be empty"));
        }
        let mut alert = Alert::system(level, message)?;
        if let Some(maker) = market_maker {
            alert = alert.with_market_maker(maker);
        }
        tracing::info!(alert_id = %alert.id(), level = %level, "alert created");
        Ok(self.inner.alerts.lock().insert(alert))
    }

    /// Resolves an alert.
    ///
    /// # Errors
    ///
    /// Returns not found for an unknown id, or a validation error for an
    /// empty reason or an already resolved alert.
    pub fn resolve_alert(&self, id: AlertId, reason: &str) -> ApplicationResult<Alert> {
        let alert = self.inner.alerts.lock().resolve(id, reason)?;
        tracing::info!(alert_id = %id, reason, "alert resolved");
        Ok(alert)
    }
}

impl Inner {
    #[allow(clippy::indexing_slicing)] // ViewKind::index() < VIEW_COUNT
    fn slot(&self, view: ViewKind) -> &Mutex<ViewSlot> {
        &self.slots[view.index()]
    }

    #[allow(clippy::indexing_slicing)] // ViewKind::index() < VIEW_COUNT
    fn snapshot_cell(&self, view: ViewKind) -> &RwLock<Option<Arc<ViewSnapshot>>> {
        &self.snapshots[view.index()]
    }

    fn snapshot(&self, view: ViewKind) -> Option<Arc<ViewSnapshot>> {
        self.snapshot_cell(view).read().clone()
    }

    /// Starts the timer task of `view` and returns its epoch.
    fn arm(self: &Arc<Self>, view: ViewKind) -> u64 {
        let period = self.settings.period(view).max(Duration::from_millis(1));
        let mut slot = self.slot(view).lock();
        slot.epoch += 1;
        slot.state = ViewState::Running;
        let epoch = slot.epoch;
        let task = tokio::spawn(run_timer(Arc::downgrade(self), view, period, epoch));
        if let Some(previous) = slot.task.replace(task) {
            previous.abort();
        }
        tracing::info!(view = %view, period_ms = period.as_millis() as u64, epoch, "view timer armed");
        epoch
    }

    fn disarm(&self, view: ViewKind) {
        let mut slot = self.slot(view).lock();
        slot.state = ViewState::Stopped;
        slot.epoch += 1;
        if let Some(task) = slot.task.take() {
            task.abort();
        }
        tracing::info!(view = %view, "view timer cancelled");
    }

    fn raise_system(&self, level: AlertLevel, message: &str) {
        if let Err(e) = self.alerts.lock().raise_system(level, message) {
            tracing::warn!(error = %e, "failed to raise system alert");
        }
    }

    async fn refresh(&self, view: ViewKind, trigger: Trigger) -> RefreshOutcome {
        match self.load_baselines().await {
            Some(baselines) => self.publish(view, trigger, &baselines),
            None => {
                tracing::warn!(view = %view, "no baseline data available, view not refreshed");
                RefreshOutcome::Unavailable
            }
        }
    }

    /// Fetches fresh baselines, falling back to the last-known set.
    async fn load_baselines(&self) -> Option<Arc<Vec<MarketMakerBaseline>>> {
        let fetch = self.source.fetch_entity_metrics();
        let fetched = telemetry::warn_if_slow("fetch_entity_metrics", SLOW_FETCH, fetch)
            .await
            .and_then(screen_baselines);
        match fetched {
            Ok(valid) => {
                let valid = Arc::new(valid);
                *self.last_known.lock() = Some(Arc::clone(&valid));

                if self.degraded.swap(false, Ordering::SeqCst) {
                    tracing::info!(source = self.source.name(), "data source recovered");
                    self.raise_system(AlertLevel::Info, "Data source recovered");
                }
                Some(valid)
            }
            Err(e) => {
                tracing::warn!(
                    source = self.source.name(),
                    error = %e,
                    "data source fetch failed, using last known baselines"
                );
                if !self.degraded.swap(true, Ordering::SeqCst) {
                    self.raise_system(
                        AlertLevel::Warning,
                        &format!("Data source degraded: {e}"),
                    );
                }
                self.last_known.lock().clone()
            }
        }
    }

    fn publish(
        &self,
        view: ViewKind,
        trigger: Trigger,
        baselines: &[MarketMakerBaseline],
    ) -> RefreshOutcome {
        let mut slot = self.slot(view).lock();
        if let Trigger::Timer(epoch) = trigger
            && (slot.state != ViewState::Running || slot.epoch != epoch)
        {
            tracing::debug!(view = %view, epoch, "stale timer tick ignored");
            return RefreshOutcome::Skipped;
        }

        let makers = self.engine.lock().rate_all(baselines);
        let at = Timestamp::now();

        let payload = match view {
            ViewKind::MarketMakers => ViewPayload::MarketMakers(makers),
            ViewKind::Metrics => ViewPayload::Metrics(builders::summarize(
                &makers,
                self.degraded.load(Ordering::SeqCst),
            )),
            ViewKind::Chart => ViewPayload::Chart(slot.chart.record(&makers, at)),
            ViewKind::Rankings => {
                ViewPayload::Rankings(builders::rank(&makers, self.settings.top_n))
            }
            ViewKind::PillarDetail => {
                match slot.rotation.advance(makers.len()).and_then(|i| makers.get(i)) {
                    Some(maker) => ViewPayload::PillarDetail(builders::pillar_detail(maker)),
                    None => return RefreshOutcome::Unavailable,
                }
            }
            ViewKind::Alerts => {
                let mut book = self.alerts.lock();
                book.sync_red_flags(&makers);
                ViewPayload::Alerts(AlertsView {
                    alerts: book.all(),
                    stats: book.stats(),
                })
            }
            ViewKind::Trades => ViewPayload::Trades(self.engine.lock().simulate_trades(&makers)),
        };

        slot.generation += 1;
        let snapshot = Arc::new(ViewSnapshot::new(slot.generation, at, payload));
        *self.snapshot_cell(view).write() = Some(Arc::clone(&snapshot));

        let report = self.subscribers.notify(&snapshot);
        tracing::debug!(
            view = %view,
            generation = snapshot.generation(),
            delivered = report.delivered,
            failed = report.failed,
            "snapshot published"
        );
        RefreshOutcome::Published(snapshot)
    }
}

/// Drops invalid rows and repeated names (first one wins, case-insensitive).
///
/// A non-empty fetch with nothing usable left is malformed.
fn screen_baselines(fetched: Vec<MarketMakerBaseline>) -> SourceResult<Vec<MarketMakerBaseline>> {
    if fetched.is_empty() {
        return Err(SourceError::Empty);
    }
    let received = fetched.len();
    let mut seen = HashSet::with_capacity(received);
    let valid: Vec<MarketMakerBaseline> = fetched
        .into_iter()
        .filter(|baseline| {
            if let Err(e) = baseline.validate() {
                tracing::warn!(maker = baseline.name(), error = %e, "dropping invalid baseline");
                return false;
            }
            if !seen.insert(baseline.name().to_ascii_lowercase()) {
                tracing::warn!(maker = baseline.name(), "dropping duplicate baseline");
                return false;
            }
            true
        })
        .collect();
    if valid.is_empty() {
        return Err(SourceError::malformed(format!(
            "none of {received} baselines are usable"
        )));
    }
    Ok(valid)
}

async fn run_timer(inner: Weak<Inner>, view: ViewKind, period: Duration, epoch: u64) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let Some(inner) = inner.upgrade() else {
            break;
        };
        if let RefreshOutcome::Skipped = inner.refresh(view, Trigger::Timer(epoch)).await {
            break;
        }
    }
    tracing::debug!(view = %view, epoch, "view timer exited");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::subscribers::SubscriberError;
    use crate::domain::services::metric_generator::StdRandomSource;
    use crate::infrastructure::roster::{SimulatedMetricsSource, base_roster};
    use std::sync::atomic::AtomicUsize;

    fn scheduler_with(source: SimulatedMetricsSource) -> UpdateScheduler {
        let engine = RatingEngine::new(2025, Box::new(StdRandomSource::seeded(42)));
        UpdateScheduler::new(SchedulerSettings::default(), Arc::new(source), engine)
    }

    fn scheduler() -> UpdateScheduler {
        scheduler_with(SimulatedMetricsSource::with_base_roster())
    }

    /// Serves `first` on the first fetch and `rest` afterwards.
    #[derive(Debug)]
    struct SwitchingSource {
        first: Mutex<Option<Vec<MarketMakerBaseline>>>,
        rest: Vec<MarketMakerBaseline>,
    }

    #[async_trait::async_trait]
    impl MetricsSource for SwitchingSource {
        async fn fetch_entity_metrics(&self) -> SourceResult<Vec<MarketMakerBaseline>> {
            Ok(self.first.lock().take().unwrap_or_else(|| self.rest.clone()))
        }

        fn name(&self) -> &'static str {
            "switching"
        }
    }

    fn renamed(name: &str, pnl_k: f64) -> MarketMakerBaseline {
        let base = base_roster().remove(0);
        let mut metrics = *base.metrics();
        metrics.pnl_k = pnl_k;
        MarketMakerBaseline::new(name, metrics, base.status(), base.profile().clone())
    }

    fn counter(scheduler: &UpdateScheduler) -> Arc<AtomicUsize> {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        scheduler.subscribe(Arc::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));
        hits
    }

    mod settings {
        use super::*;

        #[test]
        fn defaults_match_view_cadence() {
            let settings = SchedulerSettings::default();
            assert_eq!(settings.period(ViewKind::Chart), Duration::from_secs(1));
            assert_eq!(settings.period(ViewKind::Metrics), Duration::from_secs(10));
            assert_eq!(settings.period(ViewKind::Alerts), Duration::from_secs(15));
            assert_eq!(settings.period(ViewKind::Trades), Duration::from_secs(2));
        }

        #[test]
        fn with_period_overrides_one_view() {
            let settings = SchedulerSettings::default()
                .with_period(ViewKind::Rankings, Duration::from_millis(250));
            assert_eq!(settings.period(ViewKind::Rankings), Duration::from_millis(250));
            assert_eq!(settings.period(ViewKind::Chart), Duration::from_secs(1));
        }
    }

    mod lifecycle {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn start_refreshes_every_view_once() {
            let scheduler = scheduler();
            let hits = counter(&scheduler);

            assert!(scheduler.start().await);
            assert!(scheduler.is_running());
            assert_eq!(hits.load(Ordering::SeqCst), VIEW_COUNT);
            for view in ViewKind::ALL {
                assert!(scheduler.get_snapshot(view).is_available());
            }
            scheduler.stop();
        }

        #[tokio::test(start_paused = true)]
        async fn start_twice_is_idempotent() {
            let scheduler = scheduler();
            let hits = counter(&scheduler);

            assert!(scheduler.start().await);
            assert!(!scheduler.start().await);
            assert_eq!(hits.load(Ordering::SeqCst), VIEW_COUNT);

            // Only the chart (1s) is due.
            time::sleep(Duration::from_millis(1_001)).await;
            assert_eq!(hits.load(Ordering::SeqCst), VIEW_COUNT + 1);
            scheduler.stop();
        }

        #[tokio::test(start_paused = true)]
        async fn no_notification_after_stop() {
            let scheduler = scheduler();
            let hits = counter(&scheduler);

            scheduler.start().await;
            assert!(scheduler.stop());
            let after_stop = hits.load(Ordering::SeqCst);

            time::sleep(Duration::from_secs(60)).await;
            assert_eq!(hits.load(Ordering::SeqCst), after_stop);
            assert!(!scheduler.is_running());
        }

        #[tokio::test(start_paused = true)]
        async fn stop_when_stopped_is_noop() {
            let scheduler = scheduler();
            assert!(!scheduler.stop());
            assert!(scheduler.alerts().is_empty());
        }

        #[tokio::test(start_paused = true)]
        async fn views_tick_independently() {
            let scheduler = scheduler();
            scheduler.start().await;

            time::sleep(Duration::from_millis(3_001)).await;
            let status = scheduler.status();
            let generation = |view: ViewKind| {
                status
                    .views
                    .iter()
                    .find(|s| s.view == view)
                    .map(|s| s.generation)
                    .unwrap()
            };
            assert_eq!(generation(ViewKind::Chart), 4);
            assert_eq!(generation(ViewKind::MarketMakers), 2);
            assert_eq!(generation(ViewKind::Rankings), 2);
            assert_eq!(generation(ViewKind::Metrics), 1);
            scheduler.stop();
        }

        #[tokio::test(start_paused = true)]
        async fn restart_rearms_timers() {
            let scheduler = scheduler();
            let hits = counter(&scheduler);

            scheduler.start().await;
            scheduler.stop();
            assert!(scheduler.start().await);
            assert_eq!(hits.load(Ordering::SeqCst), 2 * VIEW_COUNT);

            time::sleep(Duration::from_millis(1_001)).await;
            assert_eq!(hits.load(Ordering::SeqCst), 2 * VIEW_COUNT + 1);
            scheduler.stop();
        }

        #[tokio::test(start_paused = true)]
        async fn lifecycle_raises_system_alerts() {
            let scheduler = scheduler();
            scheduler.start().await;
            scheduler.stop();

            let messages: Vec<String> = scheduler
                .alerts()
                .iter()
                .filter(|a| a.market_maker().is_none())
                .map(|a| a.message().to_string())
                .collect();
            assert!(messages.iter().any(|m| m.contains("started")));
            assert!(messages.iter().any(|m| m.contains("stopped")));
        }
    }

    mod refresh {
        use super::*;

        #[tokio::test]
        async fn unavailable_before_first_refresh() {
            let scheduler = scheduler();
            for view in ViewKind::ALL {
                assert_eq!(scheduler.get_snapshot(view), SnapshotState::Unavailable);
            }
            assert!(scheduler.market_makers().unwrap_err().is_unavailable());
        }

        #[tokio::test]
        async fn manual_refresh_works_while_stopped() {
            let scheduler = scheduler();
            let first = scheduler.refresh_now(ViewKind::Metrics).await.unwrap();
            let second = scheduler.refresh_now(ViewKind::Metrics).await.unwrap();
            assert_eq!(first.generation(), 1);
            assert_eq!(second.generation(), 2);
            assert!(!scheduler.is_running());
        }

        #[tokio::test]
        async fn refresh_all_populates_every_view() {
            let scheduler = scheduler();
            let published = scheduler.refresh_all().await.unwrap();
            assert_eq!(published.len(), VIEW_COUNT);
            let views: Vec<ViewKind> = published.iter().map(|s| s.view()).collect();
            assert_eq!(views, ViewKind::ALL.to_vec());
        }

        #[tokio::test]
        async fn failing_subscriber_does_not_abort_refresh() {
            let scheduler = scheduler();
            scheduler.subscribe(Arc::new(|_| Err(SubscriberError::Closed)));
            let hits = counter(&scheduler);

            scheduler.refresh_now(ViewKind::Chart).await.unwrap();
            assert_eq!(hits.load(Ordering::SeqCst), 1);
            assert!(scheduler.get_snapshot(ViewKind::Chart).is_available());
        }

        #[tokio::test]
        async fn unsubscribed_callback_stops_receiving() {
            let scheduler = scheduler();
            let hits = Arc::new(AtomicUsize::new(0));
            let seen = Arc::clone(&hits);
            let id = scheduler.subscribe(Arc::new(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }));

            scheduler.refresh_now(ViewKind::Chart).await.unwrap();
            assert!(scheduler.unsubscribe(id));
            scheduler.refresh_now(ViewKind::Chart).await.unwrap();
            assert_eq!(hits.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn rankings_respect_top_n() {
            let scheduler = scheduler();
            let snapshot = scheduler.refresh_now(ViewKind::Rankings).await.unwrap();
            match snapshot.payload() {
                ViewPayload::Rankings(entries) => {
                    assert_eq!(entries.len(), 5);
                    assert!(
                        entries
                            .windows(2)
                            .all(|w| w[0].composite_score >= w[1].composite_score)
                    );
                }
                other => panic!("unexpected payload {other:?}"),
            }
        }

        #[tokio::test]
        async fn pillar_detail_rotates_after_configured_ticks() {
            let scheduler = scheduler();
            let mut names = Vec::new();
            for _ in 0..6 {
                let snapshot = scheduler.refresh_now(ViewKind::PillarDetail).await.unwrap();
                if let ViewPayload::PillarDetail(detail) = snapshot.payload() {
                    names.push(detail.name.clone());
                }
            }
            assert!(names[..5].iter().all(|n| n == "Equilibrium"));
            assert_eq!(names[5], "OnlyDegens");
        }

        #[tokio::test]
        async fn chart_history_is_bounded() {
            let scheduler = scheduler();
            let mut last = None;
            for _ in 0..10 {
                last = Some(scheduler.refresh_now(ViewKind::Chart).await.unwrap());
            }
            match last.unwrap().payload() {
                ViewPayload::Chart(chart) => assert_eq!(chart.history.len(), 6),
                other => panic!("unexpected payload {other:?}"),
            }
        }

        #[tokio::test]
        async fn trades_view_publishes_totals() {
            let scheduler = scheduler();
            let snapshot = scheduler.refresh_now(ViewKind::Trades).await.unwrap();
            match snapshot.payload() {
                ViewPayload::Trades(activity) => {
                    assert!(activity.total_trades > 0);
                    assert!(activity.volume > activity.asks);
                }
                other => panic!("unexpected payload {other:?}"),
            }
        }

        #[tokio::test]
        async fn alerts_view_reflects_book() {
            let scheduler = scheduler();
            let snapshot = scheduler.refresh_now(ViewKind::Alerts).await.unwrap();
            match snapshot.payload() {
                ViewPayload::Alerts(view) => {
                    assert_eq!(view.stats.total, view.alerts.len());
                    assert!(view.alerts.len() <= 20);
                }
                other => panic!("unexpected payload {other:?}"),
            }
        }
    }

    mod degradation {
        use super::*;

        #[tokio::test]
        async fn falls_back_to_last_known_baselines() {
            let source = SimulatedMetricsSource::with_base_roster();
            let scheduler = scheduler_with(source.clone());

            scheduler.refresh_now(ViewKind::Metrics).await.unwrap();
            source.set_available(false);

            let snapshot = scheduler.refresh_now(ViewKind::Metrics).await.unwrap();
            assert!(scheduler.is_degraded());
            match snapshot.payload() {
                ViewPayload::Metrics(summary) => {
                    assert!(summary.degraded);
                    assert_eq!(summary.total_makers, 15);
                }
                other => panic!("unexpected payload {other:?}"),
            }
        }

        #[tokio::test]
        async fn degradation_alert_raised_once_per_transition() {
            let source = SimulatedMetricsSource::with_base_roster();
            let scheduler = scheduler_with(source.clone());

            scheduler.refresh_now(ViewKind::Metrics).await.unwrap();
            source.set_available(false);
            scheduler.refresh_now(ViewKind::Metrics).await.unwrap();
            scheduler.refresh_now(ViewKind::Chart).await.unwrap();

            let warnings = scheduler.alerts_by_level(AlertLevel::Warning);
            assert_eq!(warnings.len(), 1);
            assert!(warnings[0].message().contains("degraded"));

            source.set_available(true);
            scheduler.refresh_now(ViewKind::Metrics).await.unwrap();
            assert!(!scheduler.is_degraded());
            assert!(
                scheduler
                    .alerts_by_level(AlertLevel::Info)
                    .iter()
                    .any(|a| a.message().contains("recovered"))
            );
        }

        #[tokio::test]
        async fn fetch_with_no_usable_rows_keeps_last_known() {
            let broken: Vec<MarketMakerBaseline> = base_roster()
                .into_iter()
                .map(|b| {
                    let mut metrics = *b.metrics();
                    metrics.uptime_pct = 150.0;
                    MarketMakerBaseline::new(b.name(), metrics, b.status(), b.profile().clone())
                })
                .collect();
            let source = SwitchingSource {
                first: Mutex::new(Some(base_roster())),
                rest: broken,
            };
            let engine = RatingEngine::new(2025, Box::new(StdRandomSource::seeded(42)));
            let scheduler =
                UpdateScheduler::new(SchedulerSettings::default(), Arc::new(source), engine);

            scheduler.refresh_now(ViewKind::Metrics).await.unwrap();
            assert!(!scheduler.is_degraded());

            let snapshot = scheduler.refresh_now(ViewKind::Metrics).await.unwrap();
            assert!(scheduler.is_degraded());
            match snapshot.payload() {
                ViewPayload::Metrics(summary) => {
                    assert!(summary.degraded);
                    assert_eq!(summary.total_makers, 15);
                }
                other => panic!("unexpected payload {other:?}"),
            }
            assert!(scheduler.refresh_now(ViewKind::PillarDetail).await.is_ok());

            let warnings = scheduler.alerts_by_level(AlertLevel::Warning);
            assert_eq!(warnings.len(), 1);
            assert!(warnings[0].message().contains("none of 15"));
        }

        #[tokio::test]
        async fn duplicate_names_keep_first_row() {
            let source = SimulatedMetricsSource::new(vec![
                renamed("Dup", -50.0),
                renamed("dup", 50.0),
                renamed("Other", 50.0),
            ]);
            let scheduler = scheduler_with(source);

            scheduler.refresh_now(ViewKind::MarketMakers).await.unwrap();
            let makers = scheduler.market_makers().unwrap();
            assert_eq!(makers.len(), 2);
            let dup = scheduler.market_maker("DUP").unwrap();
            assert_eq!(dup.name(), "Dup");
            assert!(dup.metrics().pnl_k < 0.0);

            scheduler.refresh_now(ViewKind::Alerts).await.unwrap();
            let dup_alerts: Vec<Alert> = scheduler
                .alerts()
                .into_iter()
                .filter(|a| a.market_maker() == Some("Dup"))
                .collect();
            assert!(!dup_alerts.is_empty());
            assert!(dup_alerts.iter().all(Alert::is_active));
        }

        #[tokio::test]
        async fn no_data_ever_is_unavailable() {
            let source = SimulatedMetricsSource::with_base_roster();
            source.set_available(false);
            let scheduler = scheduler_with(source);

            let err = scheduler.refresh_now(ViewKind::Rankings).await.unwrap_err();
            assert!(err.is_unavailable());
            assert_eq!(scheduler.get_snapshot(ViewKind::Rankings), SnapshotState::Unavailable);
        }
    }

    mod screening {
        use super::*;

        #[test]
        fn empty_fetch_is_an_error() {
            assert_eq!(screen_baselines(Vec::new()).unwrap_err(), SourceError::Empty);
        }

        #[test]
        fn keeps_valid_rows_in_order() {
            let mut rows = base_roster();
            let mut metrics = *rows[1].metrics();
            metrics.success_rate_pct = f64::NAN;
            let broken =
                MarketMakerBaseline::new("Broken", metrics, rows[1].status(), rows[1].profile().clone());
            rows[1] = broken;
            rows.push(renamed("equilibrium", 10.0));

            let kept = screen_baselines(rows).unwrap();
            assert_eq!(kept.len(), 14);
            assert_eq!(kept[0].name(), "Equilibrium");
            assert!(kept.iter().all(|b| b.name() != "Broken"));
        }
    }

    mod lookups {
        use super::*;

        #[tokio::test]
        async fn market_maker_lookup_is_case_insensitive() {
            let scheduler = scheduler();
            scheduler.refresh_now(ViewKind::MarketMakers).await.unwrap();

            let maker = scheduler.market_maker("hexagon").unwrap();
            assert_eq!(maker.name(), "Hexagon");
            assert!(scheduler.market_maker("Nobody").unwrap_err().is_not_found());

            let detail = scheduler.pillar_detail_for("ARKEN").unwrap();
            assert_eq!(detail.name, "Arken");
            assert_eq!(detail.pillars.len(), 6);
        }
    }

    mod alerts {
        use super::*;

        #[test]
        fn create_and_resolve() {
            let scheduler = scheduler();
            let alert = scheduler
                .create_alert(AlertLevel::Info, "maintenance window", Some("Astro"))
                .unwrap();
            assert_eq!(alert.market_maker(), Some("Astro"));
            assert_eq!(scheduler.active_alerts().len(), 1);

            let resolved = scheduler.resolve_alert(alert.id(), "done").unwrap();
            assert!(!resolved.is_active());
            assert!(scheduler.active_alerts().is_empty());
            assert_eq!(scheduler.alert_stats().inactive, 1);
        }

        #[test]
        fn create_rejects_severity_levels_and_empty_messages() {
            let scheduler = scheduler();
            assert!(
                scheduler
                    .create_alert(AlertLevel::Critical, "x", None)
                    .unwrap_err()
                    .is_validation()
            );
            assert!(
                scheduler
                    .create_alert(AlertLevel::Info, "  ", None)
                    .unwrap_err()
                    .is_validation()
            );
        }

        #[test]
        fn resolve_unknown_is_not_found() {
            let scheduler = scheduler();
            let err = scheduler.resolve_alert(AlertId::new_v4(), "x").unwrap_err();
            assert!(err.is_not_found());
        }
    }
}
