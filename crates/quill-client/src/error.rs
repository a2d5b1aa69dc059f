use thiserror::Error;

/// Failures reported by a platform client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The platform refused the request (rate limit, policy, bad account).
    #[error("Platform rejected the request: {0}")]
    Rejected(String),

    /// The platform could not be reached.
    #[error("Platform unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
