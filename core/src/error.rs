//! Error types for the PetFriends client.
//!
//! # Design
//! Remote outcomes (403, 404, 500, ...) are never errors; they come back as
//! an [`ApiResponse`](crate::response::ApiResponse) for the caller to assert
//! on. `ClientError` covers only faults that happen on this side of the wire.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Local failures raised by `PetFriends` operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The photo to upload could not be read. No request was sent.
    #[error("failed to read photo {}: {source}", .path.display())]
    Photo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The request never produced an HTTP response (connect, DNS, TLS, I/O).
    #[error("transport failed: {0}")]
    Transport(String),

    /// A response body did not match the requested record type.
    #[error("failed to decode response body: {0}")]
    Decode(String),
}
