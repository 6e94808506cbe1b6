pub mod discord;
pub mod embed;
mod errors;

pub use discord::{DiscordPublisher, DiscordSettings};
pub use errors::PublishError;

use async_trait::async_trait;

use crate::scoring::LeaderboardEntry;

/// Delivers the ranked leaderboard to a chat channel.
///
/// Implementations edit their previously published message when they hold a
/// handle to one and create a new message otherwise.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn upsert(&self, entries: &[LeaderboardEntry]) -> Result<(), PublishError>;
}
