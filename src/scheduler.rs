use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, instrument, warn};

use crate::publisher::{PublishError, Publisher};
use crate::roster::{FetchError, SnapshotSource};
use crate::scoring::{
    top_n, LeaderboardEntry, PollSummary, ScoreTracker, DEFAULT_LEADERBOARD_SIZE,
};

/// Source of "now" for award timestamps
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Configuration for the poll and publish cadences
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub poll_interval: Duration,
    pub publish_interval: Duration,
    pub leaderboard_size: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            publish_interval: Duration::from_secs(15),
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
        }
    }
}

/// Stops a running scheduler from another task.
#[derive(Clone)]
pub struct ShutdownHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.sender.send_replace(true);
    }
}

/// Drives roster polling and leaderboard publishing on independent cadences.
///
/// Each task finishes its current action before waiting for its next tick.
/// Ticks missed in the meantime collapse into one immediate tick instead of
/// queueing, so at most one poll and one publish are ever in flight.
pub struct Scheduler {
    source: Arc<dyn SnapshotSource>,
    tracker: Arc<ScoreTracker>,
    publisher: Arc<dyn Publisher>,
    config: SchedulerConfig,
    clock: Clock,
    shutdown: Arc<watch::Sender<bool>>,
}

impl Scheduler {
    pub fn builder(
        source: Arc<dyn SnapshotSource>,
        tracker: Arc<ScoreTracker>,
        publisher: Arc<dyn Publisher>,
    ) -> SchedulerBuilder {
        SchedulerBuilder::new(source, tracker, publisher)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            sender: self.shutdown.clone(),
        }
    }

    /// Runs both tasks until shutdown is requested.
    ///
    /// Returns an error only when publishing hits an unrecoverable session
    /// failure, after stopping the poll task as well.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<(), PublishError> {
        info!(
            poll_interval_secs = self.config.poll_interval.as_secs_f64(),
            publish_interval_secs = self.config.publish_interval.as_secs_f64(),
            "Starting poll and publish tasks"
        );

        let (_, published) = tokio::join!(
            self.poll_loop(self.shutdown.subscribe()),
            self.publish_loop(self.shutdown.subscribe())
        );

        info!("Scheduler stopped");
        published
    }

    /// One fetch-and-fold pass over the full roster
    #[instrument(skip(self))]
    pub async fn poll_once(&self) -> Result<PollSummary, FetchError> {
        let roster = self.source.fetch_roster().await?;
        let summary = self.tracker.apply_poll(&roster, (self.clock)()).await;

        debug!(
            players = summary.players_seen,
            created = summary.players_created,
            role_changes = summary.role_changes,
            awards = summary.awarded.len(),
            "Poll applied"
        );
        Ok(summary)
    }

    /// One derive-and-deliver pass of the leaderboard
    #[instrument(skip(self))]
    pub async fn publish_once(&self) -> Result<Vec<LeaderboardEntry>, PublishError> {
        let snapshot = self.tracker.snapshot().await;
        let entries = top_n(&snapshot, self.config.leaderboard_size);
        self.publisher.upsert(&entries).await?;

        debug!(entries = entries.len(), "Leaderboard published");
        Ok(entries)
    }

    async fn poll_loop(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.changed() => continue,
            }

            if let Err(e) = self.poll_once().await {
                error!(error = %e, "Poll cycle failed, skipping");
            }
        }
    }

    async fn publish_loop(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), PublishError> {
        let mut ticker = interval(self.config.publish_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            if *shutdown.borrow() {
                return Ok(());
            }
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.changed() => continue,
            }

            match self.publish_once().await {
                Ok(_) => {}
                Err(e) if e.is_fatal() => {
                    error!(error = %e, "Chat session is unusable, stopping");
                    self.shutdown.send_replace(true);
                    return Err(e);
                }
                Err(e) => {
                    warn!(error = %e, "Publish cycle failed, skipping");
                }
            }
        }
    }
}

pub struct SchedulerBuilder {
    source: Arc<dyn SnapshotSource>,
    tracker: Arc<ScoreTracker>,
    publisher: Arc<dyn Publisher>,
    config: SchedulerConfig,
    clock: Clock,
}

impl SchedulerBuilder {
    fn new(
        source: Arc<dyn SnapshotSource>,
        tracker: Arc<ScoreTracker>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            source,
            tracker,
            publisher,
            config: SchedulerConfig::default(),
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Scheduler {
        let (shutdown, _) = watch::channel(false);
        Scheduler {
            source: self.source,
            tracker: self.tracker,
            publisher: self.publisher,
            config: self.config,
            clock: self.clock,
            shutdown: Arc::new(shutdown),
        }
    }
}
