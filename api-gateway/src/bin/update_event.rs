//! Update Event Lambda - updateEvent?id=...
//!
//! Full-overwrite semantics: the stored document is replaced with exactly the
//! fields present in the body; absent fields are dropped, not preserved. The
//! update is attempted whether or not the id exists, and a nonexistent id
//! still reports success.

use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use serde_json::json;
use shared::error::Error as ApiError;
use shared::{
    failure_response, json_response, request_timestamp, require_id, Config, DocumentStore,
    UpdateEventRequest, EVENTS_COLLECTION,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Application state
struct AppState {
    store: DocumentStore,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let config = Config::from_env().map_err(|e| format!("Failed to load config: {}", e))?;
        let pool = shared::db::create_pool(&config).await?;

        Ok(Self {
            store: DocumentStore::new(pool),
        })
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    let timestamp = request_timestamp();

    let params = event.query_string_parameters();
    let id = match require_id(params.first("id")) {
        Ok(id) => id,
        Err(e) => return failure_response(&e, timestamp),
    };

    let request: UpdateEventRequest = match serde_json::from_slice(event.body()) {
        Ok(request) => request,
        Err(e) => {
            return failure_response(
                &ApiError::Validation(format!("Invalid request body: {}", e)),
                timestamp,
            );
        }
    };

    let body = match request.document_body() {
        Ok(body) => body,
        Err(e) => return failure_response(&e, timestamp),
    };

    match state.store.put(EVENTS_COLLECTION, &id, &body).await {
        Ok(rows) => {
            info!(event_id = %id, rows_updated = rows, "Updated event");
            // Plain message body, kept for compatibility with existing clients.
            json_response(200, &json!({ "message": "Event updated" }))
        }
        Err(e) => {
            error!(event_id = %id, error = %e, "Failed to update event");
            failure_response(&e, timestamp)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new().await?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
