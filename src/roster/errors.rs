use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to roster API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Roster API returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Unexpected response format: {0}")]
    UnexpectedPayload(String),

    #[error("Malformed player record: {0}")]
    MalformedRecord(String),
}
