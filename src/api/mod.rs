pub mod backend;
pub mod inplay;

pub use backend::BackendClient;
pub use inplay::InplayClient;

use thiserror::Error;

/// Failure taxonomy for API calls. Every variant is caught at the worker
/// boundary and converted to board state or a skipped cycle; none is fatal.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request rejected, timed out, or answered with a non-auth error status
    #[error("network failure: {0}")]
    Network(String),

    /// Response decoded but violated the expected shape
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Missing or expired session (401/403 or envelope rejection)
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
}
