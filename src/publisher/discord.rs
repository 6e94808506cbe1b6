use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use super::embed::{render_leaderboard, MessagePayload};
use super::{PublishError, Publisher};
use crate::scoring::LeaderboardEntry;

#[derive(Debug, Deserialize)]
struct ChannelMessage {
    id: String,
}

/// Settings needed to talk to the Discord REST API
#[derive(Debug, Clone)]
pub struct DiscordSettings {
    pub api_base_url: String,
    pub token: String,
    pub channel_id: String,
    pub timeout: Duration,
    pub leaderboard_size: usize,
}

/// Publishes the leaderboard as a single, repeatedly edited channel message.
pub struct DiscordPublisher {
    client: Client,
    settings: DiscordSettings,
    /// Id of the message we last created, edited in place on later cycles
    message_id: Mutex<Option<String>>,
}

impl DiscordPublisher {
    /// Builds the publisher and verifies the bot can see the target channel.
    #[instrument(skip(settings), fields(channel_id = %settings.channel_id))]
    pub async fn connect(settings: DiscordSettings) -> Result<Self, PublishError> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        let publisher = Self {
            client,
            settings,
            message_id: Mutex::new(None),
        };

        let response = publisher
            .client
            .get(publisher.channel_url())
            .header("Authorization", publisher.auth_header())
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                info!("Discord channel verified");
                Ok(publisher)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(PublishError::Unauthorized(response.status()))
            }
            StatusCode::NOT_FOUND => Err(PublishError::ChannelNotFound(
                publisher.settings.channel_id.clone(),
            )),
            _ => Err(status_error(response).await),
        }
    }

    /// Current message handle, if a leaderboard message has been created
    pub async fn message_id(&self) -> Option<String> {
        self.message_id.lock().await.clone()
    }

    fn channel_url(&self) -> String {
        format!(
            "{}/channels/{}",
            self.settings.api_base_url, self.settings.channel_id
        )
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.settings.token)
    }

    async fn create_message(&self, payload: &MessagePayload) -> Result<String, PublishError> {
        let response = self
            .client
            .post(format!("{}/messages", self.channel_url()))
            .header("Authorization", self.auth_header())
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let message: ChannelMessage = response
            .json()
            .await
            .map_err(|e| PublishError::UnexpectedResponse(e.to_string()))?;
        Ok(message.id)
    }

    async fn edit_message(
        &self,
        message_id: &str,
        payload: &MessagePayload,
    ) -> Result<(), PublishError> {
        let response = self
            .client
            .patch(format!("{}/messages/{}", self.channel_url(), message_id))
            .header("Authorization", self.auth_header())
            .json(payload)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(PublishError::MessageMissing(message_id.to_string())),
            _ => Err(status_error(response).await),
        }
    }
}

#[async_trait]
impl Publisher for DiscordPublisher {
    #[instrument(skip(self, entries), fields(entries = entries.len()))]
    async fn upsert(&self, entries: &[LeaderboardEntry]) -> Result<(), PublishError> {
        let payload = render_leaderboard(entries, self.settings.leaderboard_size, Utc::now());
        let mut handle = self.message_id.lock().await;

        match handle.clone() {
            Some(message_id) => match self.edit_message(&message_id, &payload).await {
                Ok(()) => {
                    info!(message_id = %message_id, "Edited existing leaderboard message");
                    Ok(())
                }
                Err(PublishError::MessageMissing(id)) => {
                    warn!(message_id = %id, "Leaderboard message was deleted, will recreate");
                    *handle = None;
                    Err(PublishError::MessageMissing(id))
                }
                Err(e) => Err(e),
            },
            None => {
                let message_id = self.create_message(&payload).await?;
                info!(message_id = %message_id, "Sent new leaderboard message");
                *handle = Some(message_id);
                Ok(())
            }
        }
    }
}

async fn status_error(response: Response) -> PublishError {
    let status = response.status();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PublishError::Unauthorized(status),
        _ => PublishError::Status {
            status,
            body: response.text().await.unwrap_or_default(),
        },
    }
}
