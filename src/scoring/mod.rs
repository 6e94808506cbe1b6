pub mod leaderboard;
pub mod models;
pub mod tracker;

pub use leaderboard::{top_n, DEFAULT_LEADERBOARD_SIZE};
pub use models::*;
pub use tracker::{ScoreTracker, StateSnapshot};
