//! Error types raised by the quiz API client.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenient result alias returning [`ClientError`] failures.
pub type ClientResult<T> = Result<T, ClientError>;

/// Failures that can occur while talking to the quiz API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build quiz API client")]
    ClientBuilder {
        /// Error reported by reqwest.
        #[source]
        source: reqwest::Error,
    },
    /// The request could not be sent or the connection dropped.
    #[error("failed to send request to `{path}`")]
    RequestSend {
        /// API path the request targeted.
        path: &'static str,
        /// Error reported by reqwest.
        #[source]
        source: reqwest::Error,
    },
    /// The API answered with a non-success status.
    #[error("unexpected response status {status} for `{path}`")]
    RequestStatus {
        /// API path the request targeted.
        path: &'static str,
        /// Status the API answered with.
        status: StatusCode,
    },
    /// The response body did not match the expected payload.
    #[error("failed to decode response for `{path}`")]
    DecodeResponse {
        /// API path the request targeted.
        path: &'static str,
        /// Error reported by reqwest.
        #[source]
        source: reqwest::Error,
    },
}
