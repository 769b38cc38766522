//! Error types for the listings API core.
//!
//! # Design
//! Variants follow what the host has to do about them rather than where they
//! came from. `MissingCredential` and `Unauthenticated` end the session;
//! everything else is surfaced (reset fetch) or swallowed (load-more) and
//! retried only by the user.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No auth token (or, on the my-listings screen, no user id) is available.
    #[error("not signed in")]
    MissingCredential,

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("request timed out")]
    Timeout,

    /// Non-2xx status or an envelope with `success: false`.
    #[error("{0}")]
    ServerRejected(String),

    /// The server answered 401.
    #[error("session expired")]
    Unauthenticated,

    /// The response body could not be decoded into the expected envelope.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// Errors that hand control to the auth collaborator instead of a toast.
    pub fn requires_sign_out(&self) -> bool {
        matches!(self, ApiError::MissingCredential | ApiError::Unauthenticated)
    }

    /// Text for the transient notification shown on reset-fetch failure.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::MissingCredential | ApiError::Unauthenticated => {
                "Please sign in again".to_string()
            }
            ApiError::NetworkUnreachable(_) => "No internet connection".to_string(),
            ApiError::Timeout => "The server took too long to respond".to_string(),
            ApiError::ServerRejected(message) => message.clone(),
            ApiError::Deserialization(_) => "Failed to load listings".to_string(),
        }
    }
}
