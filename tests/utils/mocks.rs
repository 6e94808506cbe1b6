use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use garrisonboard::{
    FetchError, LeaderboardEntry, PlayerRecord, PublishError, Publisher, SnapshotSource,
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Replays scripted rosters in order, repeating the last one forever
#[derive(Clone)]
pub struct MockSnapshotSource {
    rosters: Arc<RwLock<Vec<Vec<PlayerRecord>>>>,
    failing: bool,
    calls: Arc<AtomicUsize>,
}

impl MockSnapshotSource {
    pub fn scripted(rosters: Vec<Vec<PlayerRecord>>) -> Self {
        Self {
            rosters: Arc::new(RwLock::new(rosters)),
            failing: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::scripted(Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotSource for MockSnapshotSource {
    async fn fetch_roster(&self) -> Result<Vec<PlayerRecord>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(FetchError::UnexpectedPayload(
                "missing result.players object".to_string(),
            ));
        }

        let mut rosters = self.rosters.write().await;
        match rosters.len() {
            0 => Ok(Vec::new()),
            1 => Ok(rosters[0].clone()),
            _ => Ok(rosters.remove(0)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublishFailure {
    Transient,
    Unauthorized,
}

/// Records every published leaderboard and tracks concurrent calls
#[derive(Clone)]
pub struct MockPublisher {
    published: Arc<RwLock<Vec<Vec<LeaderboardEntry>>>>,
    failure: Option<PublishFailure>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self {
            published: Arc::new(RwLock::new(Vec::new())),
            failure: None,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing_with(mut self, failure: PublishFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub async fn published(&self) -> Vec<Vec<LeaderboardEntry>> {
        self.published.read().await.clone()
    }

    pub async fn last_published(&self) -> Option<Vec<LeaderboardEntry>> {
        self.published.read().await.last().cloned()
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn upsert(&self, entries: &[LeaderboardEntry]) -> Result<(), PublishError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.failure {
            Some(PublishFailure::Transient) => Err(PublishError::UnexpectedResponse(
                "gateway timeout".to_string(),
            )),
            Some(PublishFailure::Unauthorized) => Err(PublishError::Unauthorized(
                reqwest::StatusCode::UNAUTHORIZED,
            )),
            None => {
                self.published.write().await.push(entries.to_vec());
                Ok(())
            }
        }
    }
}
