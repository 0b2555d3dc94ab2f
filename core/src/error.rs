//! Error types for the PetFriends client.
//!
//! # Design
//! HTTP statuses are never errors here: a 403 or 500 comes back as a
//! `ResponseEnvelope` like any other response. `ApiError` only covers what
//! stops a request from completing at all (bad arguments, an unreadable
//! photo, a transport failure) plus the opt-in typed accessor on the
//! envelope.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A required argument was empty. Raised before any I/O.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The photo file could not be read.
    #[error("cannot read photo {}: {source}", path.display())]
    Photo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// DNS, connect, TLS or timeout failure from the HTTP agent.
    #[error("transport failed: {0}")]
    Transport(#[from] ureq::Error),

    /// The form payload could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A response body did not match the requested type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}
