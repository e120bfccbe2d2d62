//! Stateless request builder and response parser for the record store API.
//!
//! # Design
//! `StoreClient` holds only a base URL and the record type it queries, and
//! carries no mutable state between calls. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`; the transport executes the round-trip in
//! between. Fetch is always "all records of the configured type, no
//! predicate", and the parsed list preserves whatever order the backend
//! returned.

use uuid::Uuid;

use crate::error::StoreError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateRecord, Item, Record};

/// Stateless client for one record type of the store.
#[derive(Debug, Clone)]
pub struct StoreClient {
    base_url: String,
    record_type: String,
}

impl StoreClient {
    pub fn new(base_url: &str, record_type: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            record_type: record_type.to_string(),
        }
    }

    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    pub fn build_fetch_all(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/records?type={}", self.base_url, self.record_type),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Rejects blank names before any request exists, so an empty add intent
    /// never reaches the backend.
    pub fn build_create(&self, name: &str) -> Result<HttpRequest, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }
        let payload = CreateRecord::named(&self.record_type, name);
        let body = serde_json::to_string(&payload)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/records", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_delete(&self, id: Uuid) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/records/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Parse a fetch-all response into rows, preserving backend order.
    ///
    /// Any malformed record fails the whole fetch with a typed error; the
    /// caller keeps whatever list it had.
    pub fn parse_fetch_all(&self, response: HttpResponse) -> Result<Vec<Item>, StoreError> {
        check_status(&response, 200)?;
        let records: Vec<Record> = serde_json::from_str(&response.body)
            .map_err(|e| StoreError::Deserialization(e.to_string()))?;
        records.into_iter().map(Item::try_from).collect()
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<Item, StoreError> {
        check_status(&response, 201)?;
        let record: Record = serde_json::from_str(&response.body)
            .map_err(|e| StoreError::Deserialization(e.to_string()))?;
        Item::try_from(record)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), StoreError> {
        check_status(&response, 204)
    }
}

/// Map non-success status codes to the appropriate `StoreError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), StoreError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(StoreError::NotFound);
    }
    Err(StoreError::Backend {
        status: response.status,
        body: response.body.clone(),
    })
}
