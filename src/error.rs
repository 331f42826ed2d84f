use thiserror::Error;

/// Everything that can abort a bot run.
///
/// Per-game failures (a missing snapshot, a rejected post) are logged and
/// counted by the workflows instead of being returned as one of these.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: ureq::Error,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected feed data: {0}")]
    Malformed(String),

    #[error("ledger is malformed: {0}")]
    Ledger(String),

    #[error("posting API failed to {action}: {reason}")]
    Post { action: &'static str, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl BotError {
    pub(crate) fn http(url: &str, source: ureq::Error) -> Self {
        BotError::Http { url: url.to_string(), source }
    }

    pub(crate) fn decode(url: &str, source: serde_json::Error) -> Self {
        BotError::Decode { url: url.to_string(), source }
    }
}
