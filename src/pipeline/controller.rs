//! Fetch/refresh controller for the latest consultation.
//!
//! One driver task owns all pipeline state. It wakes on the polling timer or
//! on a manual refresh, fetches once, derives the summary, and publishes an
//! immutable [`PipelineSnapshot`] on a watch channel that every screen
//! subscribes to.
//!
//! **Single flight**: a refresh requested while a fetch is running is
//! ignored, and timer ticks missed during a fetch are skipped.
//!
//! **Never empty**: before the first fetch, and after a failed fetch with no
//! remote record yet, the snapshot holds the newest local fallback record or
//! the bundled sample, plus the newest saved treatment plan that is not older
//! than that record.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::PipelineConfig;
use crate::models::{ConsultationRecord, RecordOrigin, SavedTreatment};
use crate::pipeline::summary::ConsultationSummary;
use crate::source::sample::bundled_record;
use crate::source::{ConsultationSource, FetchError, LocalConsultationStore};

// ═══════════════════════════════════════════════════════════
// Snapshot
// ═══════════════════════════════════════════════════════════

/// What the screens render: one record, its derived summary, and the
/// outcome of the latest fetch.
#[derive(Debug, Clone)]
pub struct PipelineSnapshot {
    pub record: Arc<ConsultationRecord>,
    pub summary: Arc<ConsultationSummary>,
    pub origin: RecordOrigin,
    /// Error from the most recent fetch; cleared by the next success.
    pub error: Option<FetchError>,
    /// Bumped whenever `record` changes content.
    pub revision: u64,
    pub updated_at: DateTime<Utc>,
    /// Time of the last successful remote fetch.
    pub last_success: Option<DateTime<Utc>>,
    /// Treatment plan saved by the consultation agent. Only set while no
    /// remote record is shown.
    pub saved_plan: Option<Arc<SavedTreatment>>,
}

impl PipelineSnapshot {
    pub fn new(record: ConsultationRecord, origin: RecordOrigin) -> Self {
        let summary = ConsultationSummary::derive(&record);
        Self {
            record: Arc::new(record),
            summary: Arc::new(summary),
            origin,
            error: None,
            revision: 0,
            updated_at: Utc::now(),
            last_success: None,
            saved_plan: None,
        }
    }

    fn from_fallback(fallback: Fallback) -> Self {
        let mut snapshot = Self::new(fallback.record, fallback.origin);
        snapshot.saved_plan = fallback.saved_plan.map(Arc::new);
        snapshot
    }

    fn fell_back(&self, fallback: Fallback) -> Self {
        let mut next = self.replaced(fallback.record, fallback.origin);
        next.saved_plan = fallback.saved_plan.map(Arc::new);
        next
    }

    /// Replace the record wholesale. The summary is re-derived only when
    /// the content differs from the current record.
    fn replaced(&self, record: ConsultationRecord, origin: RecordOrigin) -> Self {
        let mut next = self.clone();
        if *self.record != record {
            next.summary = Arc::new(ConsultationSummary::derive(&record));
            next.record = Arc::new(record);
            next.revision += 1;
        }
        next.origin = origin;
        next.updated_at = Utc::now();
        next
    }

    fn succeeded(&self, record: ConsultationRecord) -> Self {
        let mut next = self.replaced(record, RecordOrigin::Remote);
        next.error = None;
        next.saved_plan = None;
        next.last_success = Some(next.updated_at);
        next
    }

    fn failed(&self, error: FetchError) -> Self {
        let mut next = self.clone();
        next.error = Some(error);
        next.updated_at = Utc::now();
        next
    }

    pub fn has_remote_record(&self) -> bool {
        self.origin == RecordOrigin::Remote
    }

    /// Banner text for the current error, if any.
    pub fn banner(&self) -> Option<String> {
        self.error.as_ref().map(FetchError::banner_message)
    }
}

// ═══════════════════════════════════════════════════════════
// Fallback
// ═══════════════════════════════════════════════════════════

/// What the fallback path shows in place of a remote record.
#[derive(Debug, Clone, PartialEq)]
pub struct Fallback {
    pub record: ConsultationRecord,
    pub origin: RecordOrigin,
    pub saved_plan: Option<SavedTreatment>,
}

impl Fallback {
    fn bundled() -> Self {
        Self {
            record: bundled_record(),
            origin: RecordOrigin::BundledSample,
            saved_plan: None,
        }
    }
}

/// Picks the record to show when no remote record is available.
#[derive(Debug, Clone, Default)]
pub struct FallbackLoader {
    dir: Option<PathBuf>,
}

impl FallbackLoader {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    /// Newest local record, else the bundled sample. Re-reads the directory.
    ///
    /// The newest saved plan is included unless it predates the chosen
    /// local record.
    pub fn load(&self) -> Fallback {
        let Some(dir) = &self.dir else {
            return Fallback::bundled();
        };

        let snapshot = match LocalConsultationStore::new(dir).load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, dir = %dir.display(), "Fallback directory unreadable");
                return Fallback::bundled();
            }
        };

        let latest_plan = snapshot.latest_treatment();
        match snapshot.latest_record() {
            Some(record) => Fallback {
                record: record.value.clone(),
                origin: RecordOrigin::LocalFallback,
                saved_plan: latest_plan
                    .filter(|plan| plan.recency() >= record.recency())
                    .map(|plan| plan.value.clone()),
            },
            None => Fallback {
                saved_plan: latest_plan.map(|plan| plan.value.clone()),
                ..Fallback::bundled()
            },
        }
    }

    async fn load_off_thread(&self) -> Fallback {
        let loader = self.clone();
        match tokio::task::spawn_blocking(move || loader.load()).await {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!(error = %e, "Fallback load task failed");
                Fallback::bundled()
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Pipeline
// ═══════════════════════════════════════════════════════════

/// Consultation pipeline before it is started.
pub struct ConsultationPipeline<S: ConsultationSource> {
    source: S,
    poll_interval: Duration,
    fallback: FallbackLoader,
}

impl<S: ConsultationSource> ConsultationPipeline<S> {
    pub fn new(source: S, config: &PipelineConfig) -> Self {
        Self {
            source,
            poll_interval: config.poll_interval,
            fallback: FallbackLoader::new(config.fallback_dir.clone()),
        }
    }

    /// Spawn the driver task. Must be called inside a tokio runtime.
    ///
    /// The first fetch starts immediately; the initial snapshot is the
    /// fallback record so subscribers always have something to render.
    pub fn start(self) -> PipelineHandle {
        let initial = Arc::new(PipelineSnapshot::from_fallback(self.fallback.load()));
        let origin = initial.origin;

        let (snapshot_tx, snapshot_rx) = watch::channel(initial);
        let (refresh_tx, refresh_rx) = mpsc::channel(1);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let in_flight = Arc::new(AtomicBool::new(false));

        let driver = Driver {
            source: self.source,
            fallback: self.fallback,
            poll_interval: self.poll_interval,
            snapshot_tx,
            refresh_rx,
            in_flight: in_flight.clone(),
        };

        tracing::info!(
            interval_ms = self.poll_interval.as_millis() as u64,
            origin = %origin,
            "Consultation pipeline started"
        );

        let task = tokio::spawn(driver.run(shutdown_rx));

        PipelineHandle {
            snapshots: snapshot_rx,
            refresh_tx,
            in_flight,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Trigger {
    Timer,
    Manual,
}

struct Driver<S: ConsultationSource> {
    source: S,
    fallback: FallbackLoader,
    poll_interval: Duration,
    snapshot_tx: watch::Sender<Arc<PipelineSnapshot>>,
    refresh_rx: mpsc::Receiver<()>,
    in_flight: Arc<AtomicBool>,
}

impl<S: ConsultationSource> Driver<S> {
    async fn run(mut self, mut shutdown: oneshot::Receiver<()>) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let trigger = tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => Trigger::Timer,
                Some(()) = self.refresh_rx.recv() => Trigger::Manual,
            };

            self.in_flight.store(true, Ordering::SeqCst);
            let cancelled = tokio::select! {
                _ = &mut shutdown => true,
                () = self.cycle(trigger) => false,
            };
            if cancelled {
                self.in_flight.store(false, Ordering::SeqCst);
                break;
            }

            // Requests that arrived mid-flight are dropped, not queued.
            // The flag clears only after the drain.
            while self.refresh_rx.try_recv().is_ok() {}
            self.in_flight.store(false, Ordering::SeqCst);
            ticker.reset();
        }

        tracing::info!("Consultation pipeline stopped");
    }

    async fn cycle(&mut self, trigger: Trigger) {
        tracing::debug!(?trigger, "Fetching latest consultation");
        let current = self.snapshot_tx.borrow().clone();

        let next = match self.source.fetch_latest().await {
            Ok(record) => {
                let next = current.succeeded(record);
                if next.revision != current.revision {
                    tracing::info!(
                        revision = next.revision,
                        category = %next.summary.diagnosis.category,
                        "New consultation received"
                    );
                }
                next
            }
            Err(error) => {
                tracing::warn!(error = %error, kind = ?error.kind(), "Consultation fetch failed");
                if current.has_remote_record() {
                    current.failed(error)
                } else {
                    let fallback = self.fallback.load_off_thread().await;
                    current.fell_back(fallback).failed(error)
                }
            }
        };

        self.snapshot_tx.send_replace(Arc::new(next));
    }
}

// ═══════════════════════════════════════════════════════════
// Handle
// ═══════════════════════════════════════════════════════════

/// Owner-side handle of a running pipeline.
///
/// `stop()` is the orderly teardown; dropping the handle aborts the driver.
/// Either way no snapshot is published afterwards.
pub struct PipelineHandle {
    snapshots: watch::Receiver<Arc<PipelineSnapshot>>,
    refresh_tx: mpsc::Sender<()>,
    in_flight: Arc<AtomicBool>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PipelineHandle {
    /// New receiver for snapshot updates. Each screen takes its own.
    pub fn subscribe(&self) -> watch::Receiver<Arc<PipelineSnapshot>> {
        self.snapshots.clone()
    }

    /// Latest published snapshot.
    pub fn current(&self) -> Arc<PipelineSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// Request an immediate fetch.
    ///
    /// Returns `false` when ignored: a fetch is already in flight or a
    /// refresh is already pending.
    pub fn refresh(&self) -> bool {
        if self.is_refreshing() {
            tracing::debug!("Refresh ignored: fetch in flight");
            return false;
        }
        match self.refresh_tx.try_send(()) {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!("Refresh ignored: already pending");
                false
            }
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Cancel the timer and any fetch in flight, then wait for the driver.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Pipeline driver ended abnormally");
            }
        }
    }
}

impl Drop for PipelineHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
