//! List Events Lambda - GET getAllEvents.
//!
//! Returns every event in the collection, in store order. The method is
//! checked before the store is read.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use serde_json::{json, Value};
use shared::{
    failure_response, json_response, request_timestamp, require_method, Config, Document,
    DocumentStore, SuccessEnvelope, EVENTS_COLLECTION,
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

    if let Err(e) = require_method(event.method().as_str(), "GET", "getAllEvents") {
        return failure_response(&e, timestamp);
    }

    match state.store.list(EVENTS_COLLECTION).await {
        Ok(docs) => {
            let events: Vec<Value> = docs.into_iter().map(Document::into_event_json).collect();
            info!(count = events.len(), "Listed events");
            // 201 kept for compatibility with existing clients.
            json_response(
                201,
                &SuccessEnvelope::new(json!({ "events": events }), timestamp),
            )
        }
        Err(e) => {
            error!(error = %e, "Failed to list events");
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
