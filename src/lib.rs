// Library crate for the garrison leaderboard service
// This file exposes the public API for integration tests

pub mod config;
pub mod publisher;
pub mod roster;
pub mod scheduler;
pub mod scoring;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use config::{Config, ConfigError};
pub use publisher::{DiscordPublisher, DiscordSettings, PublishError, Publisher};
pub use roster::{CrconClient, FetchError, PlayerRecord, SnapshotSource};
pub use scheduler::{Scheduler, SchedulerConfig, ShutdownHandle};
pub use scoring::{top_n, LeaderboardEntry, PlayerState, ScoreTracker, ScoringConfig};
pub use shared::AppError;
