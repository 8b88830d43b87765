//! Delete Event Lambda - deleteEvent?id=...
//!
//! Hard delete, no existence check: deleting an id that was never created
//! reports success.

use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use serde_json::json;
use shared::{
    failure_response, json_response, request_timestamp, require_id, Config, DocumentStore,
    SuccessEnvelope, EVENTS_COLLECTION,
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

    match state.store.delete(EVENTS_COLLECTION, &id).await {
        Ok(()) => {
            info!(event_id = %id, "Deleted event");
            json_response(
                200,
                &SuccessEnvelope::new(json!({ "message": "Event deleted" }), timestamp),
            )
        }
        Err(e) => {
            error!(event_id = %id, error = %e, "Failed to delete event");
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
