//! Get Event Lambda - GET getEventById?id=...
//!
//! An unknown id is not an error: the response is 200 with an empty data
//! object, keeping "found nothing" distinct from "request invalid".

use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use serde_json::json;
use shared::{
    failure_response, json_response, request_timestamp, require_id, require_method, Config,
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

    if let Err(e) = require_method(event.method().as_str(), "GET", "getEventById") {
        return failure_response(&e, timestamp);
    }

    let params = event.query_string_parameters();
    let id = match require_id(params.first("id")) {
        Ok(id) => id,
        Err(e) => return failure_response(&e, timestamp),
    };

    match state.store.get(EVENTS_COLLECTION, &id).await {
        Ok(Some(doc)) => {
            info!(event_id = %id, "Fetched event");
            json_response(200, &SuccessEnvelope::new(doc.into_event_json(), timestamp))
        }
        Ok(None) => {
            info!(event_id = %id, "Event not found");
            json_response(200, &SuccessEnvelope::new(json!({}), timestamp))
        }
        Err(e) => {
            error!(event_id = %id, error = %e, "Failed to fetch event");
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
