//! In-memory stand-in for the cloud record store.
//!
//! Records live in a map keyed by id; list order is therefore
//! backend-defined and unspecified, which is exactly what the client
//! contract promises. `POST /records` accepts an arbitrary field map, so
//! tests can seed records that are missing the fields a client expects.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Record {
    pub id: Uuid,
    pub record_type: String,
    pub fields: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
pub struct CreateRecord {
    pub record_type: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
pub struct ListParams {
    /// Record type to filter on; absent means all records.
    #[serde(rename = "type")]
    pub record_type: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Record>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/records", get(list_records).post(create_record))
        .route("/records/{id}", delete(delete_record))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_records(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Record>> {
    let records = db.read().await;
    let matching = records
        .values()
        .filter(|record| {
            params
                .record_type
                .as_deref()
                .is_none_or(|t| record.record_type == t)
        })
        .cloned()
        .collect();
    Json(matching)
}

async fn create_record(
    State(db): State<Db>,
    Json(input): Json<CreateRecord>,
) -> (StatusCode, Json<Record>) {
    let record = Record {
        id: Uuid::new_v4(),
        record_type: input.record_type,
        fields: input.fields,
    };
    log::debug!("created {} record {}", record.record_type, record.id);
    db.write().await.insert(record.id, record.clone());
    (StatusCode::CREATED, Json(record))
}

async fn delete_record(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let mut records = db.write().await;
    let removed = records.remove(&id);
    if removed.is_some() {
        log::debug!("deleted record {id}");
    }
    removed
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}
