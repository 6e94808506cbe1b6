pub mod client;
mod errors;
pub mod models;

pub use client::CrconClient;
pub use errors::FetchError;
pub use models::{PlayerRecord, RawPlayer};

use async_trait::async_trait;

/// Source of full roster snapshots (never deltas).
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_roster(&self) -> Result<Vec<PlayerRecord>, FetchError>;
}
