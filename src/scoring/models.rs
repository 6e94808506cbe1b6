use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Role that is eligible for point awards
pub const OFFICER_ROLE: &str = "officer";

/// Tunables for the award rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringConfig {
    /// Exact support deltas that earn a point
    pub award_quanta: BTreeSet<i64>,
    /// Minimum time between two awards for the same player
    pub min_award_interval: Duration,
    /// Role whose support gains are scored
    pub eligible_role: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            award_quanta: BTreeSet::from([50, 100]),
            min_award_interval: Duration::from_secs(60),
            eligible_role: OFFICER_ROLE.to_string(),
        }
    }
}

/// Per-player scoring state, kept for the lifetime of the process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayerState {
    /// Support baseline the next delta is measured against
    pub support: u64,
    pub points: u32,
    /// Role seen on the previous poll; `None` until first observed
    pub last_role: Option<String>,
    pub last_award_at: Option<DateTime<Utc>>,
    /// Last external id reported for this name
    pub identity: Option<String>,
}

impl PlayerState {
    pub fn new(support: u64) -> Self {
        Self {
            support,
            ..Self::default()
        }
    }
}

/// Outcome of folding one roster snapshot into the tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub players_seen: usize,
    pub players_created: usize,
    pub role_changes: usize,
    /// Names that earned a point this cycle, in roster order
    pub awarded: Vec<String>,
}

/// One row of the ranked leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub name: String,
    pub points: u32,
}
