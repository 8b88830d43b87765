//! Updated-At Trigger Lambda - refreshes `updatedAt` on changed event documents.
//!
//! Invoked by the store's change stream with the old and new document images.
//! Best-effort: no caller waits on this write, so store failures are logged
//! and swallowed.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::{Config, DocumentStore, EVENTS_COLLECTION};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Change-stream payload for a single document write.
#[derive(Debug, Deserialize)]
struct DocumentChangeEvent {
    collection: String,
    document_id: String,
    /// Document body before the write, absent on creation.
    #[serde(default)]
    old: Option<Value>,
    /// Document body after the write, absent on deletion.
    #[serde(default)]
    new: Option<Value>,
}

#[derive(Debug, Serialize)]
struct TouchResponse {
    touched: bool,
}

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

/// Whether this change warrants a timestamp refresh.
///
/// The trigger's own write moves only the server timestamp, so its change
/// event carries identical old and new bodies; skipping those breaks the
/// re-fire loop. Deletions and other collections are ignored.
fn should_touch(change: &DocumentChangeEvent) -> bool {
    if change.collection != EVENTS_COLLECTION {
        return false;
    }
    let new = match &change.new {
        Some(body) => body,
        None => return false,
    };
    change.old.as_ref() != Some(new)
}

async fn handler(
    state: Arc<AppState>,
    event: LambdaEvent<DocumentChangeEvent>,
) -> Result<TouchResponse, Error> {
    let change = event.payload;

    if !should_touch(&change) {
        info!(
            collection = %change.collection,
            document_id = %change.document_id,
            "Skipping change event"
        );
        return Ok(TouchResponse { touched: false });
    }

    match state.store.touch(&change.collection, &change.document_id).await {
        Ok(()) => {
            info!(document_id = %change.document_id, "Stamped updatedAt");
            Ok(TouchResponse { touched: true })
        }
        Err(e) => {
            error!(document_id = %change.document_id, error = %e, "Failed to stamp updatedAt");
            Ok(TouchResponse { touched: false })
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn change(collection: &str, old: Option<Value>, new: Option<Value>) -> DocumentChangeEvent {
        DocumentChangeEvent {
            collection: collection.to_string(),
            document_id: "ev-1".to_string(),
            old,
            new,
        }
    }

    #[test]
    fn test_touches_on_body_change() {
        let event = change(
            "events",
            Some(json!({"title": "Old"})),
            Some(json!({"title": "New"})),
        );
        assert!(should_touch(&event));
    }

    #[test]
    fn test_touches_on_creation() {
        let event = change("events", None, Some(json!({"title": "New"})));
        assert!(should_touch(&event));
    }

    #[test]
    fn test_skips_unchanged_body() {
        // The trigger's own write: same body, only the server timestamp moved.
        let body = json!({"title": "Same"});
        let event = change("events", Some(body.clone()), Some(body));
        assert!(!should_touch(&event));
    }

    #[test]
    fn test_skips_deletion() {
        let event = change("events", Some(json!({"title": "Gone"})), None);
        assert!(!should_touch(&event));
    }

    #[test]
    fn test_skips_other_collections() {
        let event = change(
            "venues",
            Some(json!({"a": 1})),
            Some(json!({"a": 2})),
        );
        assert!(!should_touch(&event));
    }
}
