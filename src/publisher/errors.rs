use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Request to chat API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Chat API rejected the bot credentials (status {0})")]
    Unauthorized(reqwest::StatusCode),

    #[error("Channel {0} not found")]
    ChannelNotFound(String),

    #[error("Leaderboard message {0} no longer exists")]
    MessageMissing(String),

    #[error("Chat API returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Unexpected chat API response: {0}")]
    UnexpectedResponse(String),
}

impl PublishError {
    /// Errors that mean the bot session itself is unusable
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PublishError::Unauthorized(_) | PublishError::ChannelNotFound(_)
        )
    }
}
