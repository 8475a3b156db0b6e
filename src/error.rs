//! Error types shared by the fetchers and API clients

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Playlist enumeration needs a channel to resolve the uploads playlist
    #[error("channel id is not configured (set YT_CHANNEL_ID or channel.id in the config file)")]
    MissingChannelId,

    /// Holds the id of the first comment that already went through the anonymizer
    #[error("comment {0} was already anonymized")]
    AlreadyAnonymized(String),

    #[error("{endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
