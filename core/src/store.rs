//! Async seam between the presenter and the record store.
//!
//! # Design
//! `RecordStore` is the contract the presenter consumes: three asynchronous
//! operations, each resolving exactly once with a result. No streaming, no
//! partial results, no cancellation, and no timeouts at this layer — a call
//! fails with whatever the transport eventually reports.
//!
//! `HttpRecordStore` is the production implementation: it executes the
//! `StoreClient`'s built requests with reqwest and feeds the responses back
//! through the matching parse methods. Non-2xx statuses are returned as data
//! and interpreted by the client, never turned into transport errors.

use async_trait::async_trait;
use uuid::Uuid;

use crate::client::StoreClient;
use crate::error::StoreError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::Item;

/// Asynchronous CRUD contract against the cloud record store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records of the configured type, in backend-returned order.
    async fn fetch_all(&self) -> Result<Vec<Item>, StoreError>;

    /// Create a record with the given name; resolves with the stored item
    /// including its backend-assigned id.
    async fn create(&self, name: &str) -> Result<Item, StoreError>;

    /// Remove the record with the given id; resolves with the id removed.
    async fn delete(&self, id: Uuid) -> Result<Uuid, StoreError>;
}

/// `RecordStore` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRecordStore {
    client: StoreClient,
    http: reqwest::Client,
}

impl HttpRecordStore {
    pub fn new(base_url: &str, record_type: &str) -> Self {
        Self {
            client: StoreClient::new(base_url, record_type),
            http: reqwest::Client::new(),
        }
    }

    /// Execute a built request and hand the status and body back as data.
    async fn execute(&self, req: HttpRequest) -> Result<HttpResponse, StoreError> {
        log::debug!("{:?} {}", req.method, req.path);
        let mut builder = match req.method {
            HttpMethod::Get => self.http.get(&req.path),
            HttpMethod::Post => self.http.post(&req.path),
            HttpMethod::Delete => self.http.delete(&req.path),
        };
        for (key, value) in &req.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = req.body {
            builder = builder.body(body);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn fetch_all(&self) -> Result<Vec<Item>, StoreError> {
        let req = self.client.build_fetch_all();
        let resp = self.execute(req).await?;
        self.client.parse_fetch_all(resp)
    }

    async fn create(&self, name: &str) -> Result<Item, StoreError> {
        let req = self.client.build_create(name)?;
        let resp = self.execute(req).await?;
        self.client.parse_create(resp)
    }

    async fn delete(&self, id: Uuid) -> Result<Uuid, StoreError> {
        let req = self.client.build_delete(id);
        let resp = self.execute(req).await?;
        self.client.parse_delete(resp)?;
        Ok(id)
    }
}
