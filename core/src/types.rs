//! Wire and domain types for the record store.
//!
//! # Design
//! `Record` and `CreateRecord` mirror the store's JSON schema but are defined
//! independently of the server crate; the integration tests catch drift.
//! Records carry a free-form field map, so a record can legitimately arrive
//! without the field this application cares about — converting a `Record`
//! into an `Item` validates that instead of assuming it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::StoreError;

/// The single field this application reads from and writes to its records.
pub const NAME_FIELD: &str = "name";

/// A stored record as the backend returns it: an opaque id assigned on
/// creation, a type name used to scope queries, and named fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: Uuid,
    pub record_type: String,
    pub fields: BTreeMap<String, Value>,
}

/// Creation payload: everything a `Record` has except the id, which the
/// backend assigns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecord {
    pub record_type: String,
    pub fields: BTreeMap<String, Value>,
}

impl CreateRecord {
    /// Payload for a record of `record_type` carrying a single name field.
    pub fn named(record_type: &str, name: &str) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(NAME_FIELD.to_string(), Value::String(name.to_string()));
        Self {
            record_type: record_type.to_string(),
            fields,
        }
    }
}

/// A list row: the validated projection of a `Record`.
#[derive(Debug, Clone, Eq)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
}

/// Equality is identifier-based: two `Item`s are the same item when they
/// carry the same backend-assigned id, whatever their names say.
impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl TryFrom<Record> for Item {
    type Error = StoreError;

    /// Validate a fetched record into a row. A missing or non-string name
    /// field is a `MalformedRecord` error, never a panic.
    fn try_from(record: Record) -> Result<Self, StoreError> {
        match record.fields.get(NAME_FIELD) {
            Some(Value::String(name)) => Ok(Item {
                id: record.id,
                name: name.clone(),
            }),
            _ => Err(StoreError::MalformedRecord {
                id: record.id,
                field: NAME_FIELD,
            }),
        }
    }
}
