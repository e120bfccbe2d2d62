//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP traffic as plain data. `StoreClient` builds
//! `HttpRequest` values and parses `HttpResponse` values without ever touching
//! the network; the transport layer (`store::HttpRecordStore`, or a test
//! harness) executes the actual round-trip in between. This keeps the
//! build/parse core deterministic and trivially unit-testable.

/// HTTP method for a request. The record store contract only needs three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

/// An HTTP request described as plain data.
///
/// Built by `StoreClient::build_*` methods; whoever executes it returns the
/// corresponding `HttpResponse`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data, fed to `StoreClient::parse_*`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}
