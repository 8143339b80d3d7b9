use thiserror::Error;

/// Errors returned by the restaurant API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure, or a non-2xx status other than 404.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with `"success": false`.
    #[error("restaurant API error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("resource not found: {url}")]
    NotFound { url: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
