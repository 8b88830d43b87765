//! Create Event Lambda - POST createEvent.
//!
//! Validates the six required fields, inserts the document, and returns 201
//! with the assigned id and the submitted fields.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use shared::error::Error as ApiError;
use shared::{
    failure_response, json_response, parse_event_date, request_timestamp, require_method, Config,
    CreateEventRequest, DocumentStore, SuccessEnvelope, EVENTS_COLLECTION,
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

    if let Err(e) = require_method(event.method().as_str(), "POST", "createEvent") {
        return failure_response(&e, timestamp);
    }

    let request: CreateEventRequest = match serde_json::from_slice(event.body()) {
        Ok(request) => request,
        Err(e) => {
            return failure_response(
                &ApiError::Validation(format!("Invalid request body: {}", e)),
                timestamp,
            );
        }
    };

    let missing = request.missing_fields();
    if !missing.is_empty() {
        return failure_response(
            &ApiError::Validation(format!("Missing required fields: {}", missing.join(", "))),
            timestamp,
        );
    }

    let date = match parse_event_date(&request.date) {
        Ok(date) => date,
        Err(e) => return failure_response(&e, timestamp),
    };

    match state
        .store
        .insert(EVENTS_COLLECTION, &request.document_body(date))
        .await
    {
        Ok(doc) => {
            info!(event_id = %doc.id, event_type = %request.event_type, "Created event");
            json_response(
                201,
                &SuccessEnvelope::new(request.response_body(&doc.id), timestamp),
            )
        }
        Err(e) => {
            error!(error = %e, "Failed to create event");
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
