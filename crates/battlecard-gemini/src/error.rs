use thiserror::Error;

/// Why a profile generation attempt failed. The caller's state is untouched
/// in every case.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gemini answered with a non-2xx status.
    #[error("Gemini returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response carried no candidate text.
    #[error("Gemini returned no data")]
    EmptyResponse,

    /// The configured base URL and model do not form a valid endpoint.
    #[error("invalid Gemini endpoint: {0}")]
    InvalidEndpoint(String),

    /// The candidate text did not match the profile schema.
    #[error("response does not match the profile schema: {0}")]
    Schema(String),
}
