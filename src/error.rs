use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures while loading the schedule feed.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("schedule request failed: {0}")]
    Transport(#[from] curl::Error),

    #[error("schedule request returned HTTP {0}")]
    Status(u32),

    #[error("unable to read schedule file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed schedule data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("schedule loader stopped unexpectedly: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("no favorite team recorded, set your preferences first")]
    PreferencesMissing,

    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("document encoding error: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the user can reasonably try the same action again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Feed(_) | Error::Database(_) | Error::Unavailable(_)
        )
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }
}
