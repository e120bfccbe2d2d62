//! Error taxonomy for the record store client and presenter.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers distinguish "the
//! record does not exist" from "the store returned an unexpected status."
//! `MalformedRecord` is the recoverable replacement for crashing on a fetched
//! record that is missing its expected field: fetch reports the error and the
//! caller keeps its previous list. `EmptyName` is rejected locally, before
//! any request is built.

use thiserror::Error;
use uuid::Uuid;

/// Errors produced by `StoreClient`, `RecordStore` implementations and the
/// presenter's backend calls.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store returned 404 for the targeted record.
    #[error("record not found")]
    NotFound,

    /// The store returned a non-2xx status other than 404.
    #[error("backend returned HTTP {status}: {body}")]
    Backend { status: u16, body: String },

    /// The request never completed: connection refused, reset, DNS, etc.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A fetched record is missing the expected field, or the field does not
    /// hold a string.
    #[error("record {id} has no usable `{field}` field")]
    MalformedRecord { id: Uuid, field: &'static str },

    /// Create was asked for an empty or whitespace-only name.
    #[error("item name must not be empty")]
    EmptyName,

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}
