use thiserror::Error;

/// Errors returned by the marketplace and inventory API clients.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The API answered 2xx but reported a failure in its envelope.
    #[error("{context} returned status {status}")]
    Api { context: String, status: String },

    #[error("credential is not a valid header value: {0}")]
    InvalidCredential(String),

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
