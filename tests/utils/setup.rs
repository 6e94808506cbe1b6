use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use garrisonboard::{
    PlayerRecord, PublishError, Scheduler, SchedulerConfig, ScoreTracker, ScoringConfig,
    ShutdownHandle,
};

use super::mocks::{MockPublisher, MockSnapshotSource};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub fn officer(name: &str, support: u64) -> PlayerRecord {
    player(name, support, "officer")
}

pub fn player(name: &str, support: u64, role: &str) -> PlayerRecord {
    PlayerRecord {
        name: name.to_string(),
        identity: None,
        support,
        role: role.to_string(),
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap()
}

pub struct TestSetup {
    pub tracker: Arc<ScoreTracker>,
    pub source: MockSnapshotSource,
    pub publisher: MockPublisher,
    pub shutdown: ShutdownHandle,
    pub handle: JoinHandle<Result<(), PublishError>>,
}

pub struct TestSetupBuilder {
    source: MockSnapshotSource,
    publisher: MockPublisher,
    config: SchedulerConfig,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            source: MockSnapshotSource::scripted(Vec::new()),
            publisher: MockPublisher::new(),
            config: SchedulerConfig {
                poll_interval: Duration::from_secs(5),
                publish_interval: Duration::from_secs(15),
                leaderboard_size: 20,
            },
        }
    }

    pub fn with_rosters(mut self, rosters: Vec<Vec<PlayerRecord>>) -> Self {
        self.source = MockSnapshotSource::scripted(rosters);
        self
    }

    pub fn with_source(mut self, source: MockSnapshotSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_publisher(mut self, publisher: MockPublisher) -> Self {
        self.publisher = publisher;
        self
    }

    /// Spawns the scheduler; award timestamps follow tokio's (paused) clock
    pub fn start(self) -> TestSetup {
        let tracker = Arc::new(ScoreTracker::new(ScoringConfig::default()));
        let started = tokio::time::Instant::now();

        let scheduler = Scheduler::builder(
            Arc::new(self.source.clone()),
            tracker.clone(),
            Arc::new(self.publisher.clone()),
        )
        .with_config(self.config)
        .with_clock(Arc::new(move || {
            base_time()
                + chrono::Duration::from_std(started.elapsed())
                    .unwrap_or_else(|_| chrono::Duration::zero())
        }))
        .build();

        let shutdown = scheduler.shutdown_handle();
        let handle = tokio::spawn(async move { scheduler.run().await });

        TestSetup {
            tracker,
            source: self.source,
            publisher: self.publisher,
            shutdown,
            handle,
        }
    }
}
