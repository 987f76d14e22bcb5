//! Request handlers for the `/api` endpoints.
//!
//! Each handler resolves the entity first, so an unknown entity answers 404
//! whatever the query string or body holds. Store calls do blocking file
//! I/O and run on tokio's blocking pool.

use crate::error::{ApiError, ApiResult};
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::routing::get;
use axum::{Json, Router};
use ffta_core::{parse_index, Entity, Error, ListFilters, Record, TableStore};
use serde::Serialize;
use std::sync::Arc;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    store: Arc<TableStore>,
}

impl AppState {
    /// Wraps a store for sharing across requests.
    pub fn new(store: Arc<TableStore>) -> Self {
        Self { store }
    }

    async fn run<T, F>(&self, op: F) -> ApiResult<T>
    where
        F: FnOnce(&TableStore) -> ffta_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        Ok(tokio::task::spawn_blocking(move || op(&store)).await??)
    }
}

/// Body of successful mutations.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    fn new(message: String) -> Json<Self> {
        Json(Self { message })
    }
}

/// Builds the API router over `store`.
pub fn router(store: Arc<TableStore>) -> Router {
    Router::new()
        .route("/api/:entity", get(list_records).post(create_record))
        .route(
            "/api/:entity/:index",
            get(get_record).put(update_record).delete(delete_record),
        )
        .with_state(AppState::new(store))
}

fn resolve(name: &str) -> ApiResult<Entity> {
    Ok(name.parse::<Entity>()?)
}

fn parse_body(body: &Bytes) -> ApiResult<Record> {
    let value = serde_json::from_slice(body)
        .map_err(|e| Error::InvalidRecord(format!("malformed JSON body: {e}")))?;
    Ok(Record::from_json(value)?)
}

async fn list_records(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    uri: Uri,
) -> ApiResult<Json<Vec<Record>>> {
    let entity = resolve(&entity)?;
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&uri)
        .map_err(|e| ApiError::Query(e.body_text()))?;
    let filters = ListFilters::from_pairs(pairs);

    let records = state
        .run(move |store| store.list_records(entity, &filters))
        .await?;
    Ok(Json(records))
}

async fn create_record(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Message>)> {
    let entity = resolve(&entity)?;
    let record = parse_body(&body)?;

    state
        .run(move |store| store.append_record(entity, record))
        .await?;
    Ok((
        StatusCode::CREATED,
        Message::new(format!("Record added to {entity}")),
    ))
}

async fn get_record(
    State(state): State<AppState>,
    Path((entity, index)): Path<(String, String)>,
) -> ApiResult<Json<Record>> {
    let entity = resolve(&entity)?;
    let index = parse_index(entity, &index)?;

    let record = state
        .run(move |store| store.get_record(entity, index))
        .await?;
    Ok(Json(record))
}

async fn update_record(
    State(state): State<AppState>,
    Path((entity, index)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<Json<Message>> {
    let entity = resolve(&entity)?;
    let index = parse_index(entity, &index)?;
    let partial = parse_body(&body)?;

    state
        .run(move |store| store.update_record(entity, index, partial))
        .await?;
    Ok(Message::new(format!("Record {index} updated in {entity}")))
}

async fn delete_record(
    State(state): State<AppState>,
    Path((entity, index)): Path<(String, String)>,
) -> ApiResult<Json<Message>> {
    let entity = resolve(&entity)?;
    let index = parse_index(entity, &index)?;

    state
        .run(move |store| store.delete_record(entity, index))
        .await?;
    Ok(Message::new(format!("Record {index} deleted from {entity}")))
}
