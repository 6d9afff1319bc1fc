//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` keeps its own variant so logs can tell a vanished todo apart
//! from a misbehaving server. The controller itself never branches on the
//! variant: every failure of an operation maps to that operation's fixed
//! banner message (see `banner::ErrorMessage`).

use thiserror::Error;

/// Errors produced while building requests, performing the round trip, or
/// parsing responses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status other than the expected one(s) and 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The host could not complete the round trip (connection refused,
    /// timeout, unreadable body).
    #[error("transport failed: {0}")]
    Transport(String),
}
