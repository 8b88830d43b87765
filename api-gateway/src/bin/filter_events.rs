//! Filter Events Lambda - filterEvents?eventType=...&date=...
//!
//! Requires at least one filter. `eventType` is exact equality; `date`
//! matches the whole UTC day containing the given value. The response is a
//! bare array of matching events.

use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use serde_json::{json, Value};
use shared::error::Error as ApiError;
use shared::{
    day_bounds, failure_response, json_response, parse_event_date, request_timestamp, Config,
    Document, DocumentStore, Filter, EVENTS_COLLECTION,
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

/// Build the filter set from the query parameters.
///
/// `Ok(None)` means a date was supplied but does not parse: such a filter can
/// never match a stored point-in-time value, so the query is skipped and the
/// caller answers with an empty result set.
fn build_filters(
    event_type: Option<&str>,
    date: Option<&str>,
) -> Result<Option<Vec<Filter>>, ApiError> {
    if event_type.is_none() && date.is_none() {
        return Err(ApiError::Validation(
            "Provide at least one filter: eventType or date".to_string(),
        ));
    }

    let mut filters = Vec::new();

    if let Some(event_type) = event_type {
        filters.push(Filter::Eq {
            field: "eventType",
            value: json!(event_type),
        });
    }

    if let Some(raw) = date {
        match parse_event_date(raw) {
            Ok(parsed) => {
                let (start, end) = day_bounds(parsed);
                filters.push(Filter::DayRange {
                    field: "date",
                    start,
                    end,
                });
            }
            Err(_) => return Ok(None),
        }
    }

    Ok(Some(filters))
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    let timestamp = request_timestamp();

    let params = event.query_string_parameters();
    let event_type = params.first("eventType").filter(|v| !v.is_empty());
    let date = params.first("date").filter(|v| !v.is_empty());

    let filters = match build_filters(event_type, date) {
        Ok(Some(filters)) => filters,
        Ok(None) => {
            info!(date = ?date, "Unparseable date filter, returning empty result");
            return json_response(200, &Vec::<Value>::new());
        }
        Err(e) => return failure_response(&e, timestamp),
    };

    match state.store.query(EVENTS_COLLECTION, &filters).await {
        Ok(docs) => {
            let events: Vec<Value> = docs.into_iter().map(Document::into_event_json).collect();
            info!(count = events.len(), "Filtered events");
            // Bare array, kept for compatibility with existing clients.
            json_response(200, &events)
        }
        Err(e) => {
            error!(error = %e, "Failed to filter events");
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
