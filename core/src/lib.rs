//! CRUD synchronization core for a cloud record store list screen.
//!
//! # Overview
//! Two pieces compose the crate:
//! - the **record store client**: `StoreClient` builds plain-data
//!   `HttpRequest`s and parses `HttpResponse`s without touching the network
//!   (host-does-IO pattern), and `HttpRecordStore` executes them, exposing
//!   the async `RecordStore` contract — fetch all records of one type,
//!   create by name, delete by id;
//! - the **list presenter**: `ListScreen` runs a single-writer task that
//!   owns the in-memory item list, reacts to user intents, and publishes
//!   full-redraw `Frame`s.
//!
//! The in-memory list reflects backend state only as of the last successful
//! operation; there is no persistence, no retry, and no pagination. Errors
//! are typed (`StoreError`), logged at the presenter boundary, and never
//! mutate the list.

pub mod client;
pub mod error;
pub mod http;
pub mod presenter;
pub mod store;
pub mod types;

pub use client::StoreClient;
pub use error::StoreError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use presenter::{Frame, Intent, ListScreen, LoadState};
pub use store::{HttpRecordStore, RecordStore};
pub use types::{CreateRecord, Item, Record, NAME_FIELD};
