use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{FetchError, PlayerRecord, RawPlayer, SnapshotSource};

const DETAILED_PLAYERS_PATH: &str = "/api/get_detailed_players";

/// HTTP client for the CRCON player roster endpoint
#[derive(Clone)]
pub struct CrconClient {
    base_url: String,
    token: String,
    client: Client,
}

impl CrconClient {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            token: token.into(),
            client,
        })
    }
}

#[async_trait]
impl SnapshotSource for CrconClient {
    #[instrument(skip(self))]
    async fn fetch_roster(&self) -> Result<Vec<PlayerRecord>, FetchError> {
        let url = format!("{}{}", self.base_url, DETAILED_PLAYERS_PATH);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| FetchError::UnexpectedPayload(e.to_string()))?;
        let roster = parse_roster(payload)?;

        debug!(players = roster.len(), "Fetched roster");
        Ok(roster)
    }
}

/// Extracts player records from a `get_detailed_players` response.
///
/// Any malformed player rejects the whole snapshot.
pub fn parse_roster(payload: Value) -> Result<Vec<PlayerRecord>, FetchError> {
    let players = match payload.get("result").and_then(|r| r.get("players")) {
        Some(Value::Object(players)) => players.values().cloned().collect::<Vec<_>>(),
        Some(Value::Array(players)) => players.clone(),
        _ => {
            return Err(FetchError::UnexpectedPayload(
                "missing result.players object".to_string(),
            ))
        }
    };

    players
        .into_iter()
        .map(|player| {
            let raw: RawPlayer = serde_json::from_value(player)
                .map_err(|e| FetchError::MalformedRecord(e.to_string()))?;
            PlayerRecord::try_from(raw)
        })
        .collect()
}
