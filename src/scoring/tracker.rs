use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use super::models::{PlayerState, PollSummary, ScoringConfig};
use crate::roster::PlayerRecord;

/// Insertion-ordered view of every tracked player.
pub type StateSnapshot = Vec<(String, PlayerState)>;

/// Players keyed by name, remembering first-seen order for tie breaks.
#[derive(Debug, Default, Clone)]
struct PlayerTable {
    order: Vec<String>,
    players: HashMap<String, PlayerState>,
}

impl PlayerTable {
    fn snapshot(&self) -> StateSnapshot {
        self.order
            .iter()
            .filter_map(|name| {
                self.players
                    .get(name)
                    .map(|state| (name.clone(), state.clone()))
            })
            .collect()
    }
}

/// Owns all per-player scoring state and applies the award rule to each poll.
pub struct ScoreTracker {
    config: ScoringConfig,
    table: RwLock<PlayerTable>,
}

impl ScoreTracker {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            table: RwLock::new(PlayerTable::default()),
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Folds one full roster into the tracked state.
    ///
    /// The write lock is held for the whole fold and nothing inside it awaits,
    /// so readers observe either the state before or after this poll.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub async fn apply_poll(&self, records: &[PlayerRecord], now: DateTime<Utc>) -> PollSummary {
        let mut guard = self.table.write().await;
        let table = &mut *guard;
        let mut summary = PollSummary {
            players_seen: records.len(),
            ..PollSummary::default()
        };

        for record in records {
            if !table.players.contains_key(&record.name) {
                summary.players_created += 1;
                table.order.push(record.name.clone());
                table
                    .players
                    .insert(record.name.clone(), PlayerState::new(record.support));
            }
            let Some(state) = table.players.get_mut(&record.name) else {
                continue;
            };

            match apply_record(&self.config, state, record, now) {
                RecordOutcome::RoleChanged => summary.role_changes += 1,
                RecordOutcome::Awarded => summary.awarded.push(record.name.clone()),
                RecordOutcome::NoAward | RecordOutcome::Untracked => {}
            }
        }

        summary
    }

    /// Consistent copy of every player's state in first-seen order
    pub async fn snapshot(&self) -> StateSnapshot {
        self.table.read().await.snapshot()
    }

    pub async fn get(&self, name: &str) -> Option<PlayerState> {
        self.table.read().await.players.get(name).cloned()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.table.read().await.order.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordOutcome {
    RoleChanged,
    Awarded,
    NoAward,
    Untracked,
}

fn apply_record(
    config: &ScoringConfig,
    state: &mut PlayerState,
    record: &PlayerRecord,
    now: DateTime<Utc>,
) -> RecordOutcome {
    // i128 holds the difference of any two u64 values without wrapping
    let delta = i128::from(record.support) - i128::from(state.support);
    if record.identity.is_some() {
        state.identity = record.identity.clone();
    }

    let outcome = if state.last_role.as_deref() != Some(record.role.as_str()) {
        info!(
            player = %record.name,
            role = %record.role,
            support = record.support,
            "Player changed role"
        );
        state.support = record.support;
        RecordOutcome::RoleChanged
    } else if record.role == config.eligible_role {
        if is_award_quantum(config, delta) && award_window_elapsed(config, state, now) {
            state.points += 1;
            state.last_award_at = Some(now);
            state.support = record.support;
            info!(
                player = %record.name,
                points = state.points,
                "Player earned 1 point (garrison built)"
            );
            RecordOutcome::Awarded
        } else {
            // Baseline stays put so later polls are measured against it.
            if delta != 0 {
                debug!(
                    player = %record.name,
                    delta = %delta,
                    support = record.support,
                    "Officer support changed without award"
                );
            }
            RecordOutcome::NoAward
        }
    } else {
        if delta != 0 {
            debug!(
                player = %record.name,
                role = %record.role,
                delta = %delta,
                support = record.support,
                "Support changed"
            );
        }
        state.support = record.support;
        RecordOutcome::Untracked
    };

    state.last_role = Some(record.role.clone());
    outcome
}

fn is_award_quantum(config: &ScoringConfig, delta: i128) -> bool {
    i64::try_from(delta).is_ok_and(|delta| config.award_quanta.contains(&delta))
}

fn award_window_elapsed(config: &ScoringConfig, state: &PlayerState, now: DateTime<Utc>) -> bool {
    match state.last_award_at {
        None => true,
        // a negative elapsed time (clock stepped back) never qualifies
        Some(last) => (now - last)
            .to_std()
            .map(|elapsed| elapsed >= config.min_award_interval)
            .unwrap_or(false),
    }
}
