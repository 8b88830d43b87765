//! Document store adapter.
//!
//! All handlers talk to one logical collection of schemaless JSON documents
//! through this adapter. Documents live in the `documents` table (see
//! `schema.sql`): opaque store-assigned ids, a JSONB body, and a
//! server-stamped `updated_at`.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::Result;

/// The single collection served by the gateway.
pub const EVENTS_COLLECTION: &str = "events";

/// A stored document: opaque id, JSON body, server-assigned write timestamp.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Document {
    pub id: String,
    pub data: Value,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Flatten into the wire shape `{id, ...fields, updatedAt}`.
    pub fn into_event_json(self) -> Value {
        let mut obj = match self.data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        obj.insert("id".to_string(), Value::String(self.id));
        obj.insert(
            "updatedAt".to_string(),
            serde_json::to_value(self.updated_at).unwrap_or(Value::Null),
        );
        Value::Object(obj)
    }
}

/// Query filter. Field names are caller-supplied constants, never client input.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Exact equality on a top-level document field.
    Eq {
        field: &'static str,
        value: Value,
    },
    /// Half-open `[start, end)` range on a timestamp-valued field.
    DayRange {
        field: &'static str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Handle on the document store. Cloneable; each Lambda builds one per
/// process and shares it across invocations.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    pool: PgPool,
}

impl DocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new document. The store assigns the id and the initial
    /// `updated_at` from its own clock.
    pub async fn insert(&self, collection: &str, data: &Value) -> Result<Document> {
        let id = Uuid::new_v4().to_string();
        let doc = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            RETURNING id, data, updated_at
            "#,
        )
        .bind(collection)
        .bind(&id)
        .bind(data)
        .fetch_one(&self.pool)
        .await?;

        Ok(doc)
    }

    /// Fetch a single document. Unknown ids are `None`, never an error.
    pub async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let doc = sqlx::query_as::<_, Document>(
            "SELECT id, data, updated_at FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(doc)
    }

    /// Fetch every document in a collection, in store order.
    pub async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        let docs = sqlx::query_as::<_, Document>(
            "SELECT id, data, updated_at FROM documents WHERE collection = $1",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(docs)
    }

    /// Overwrite a document body in full. A nonexistent id is a no-op;
    /// the returned count says whether anything was written.
    pub async fn put(&self, collection: &str, id: &str, data: &Value) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE documents SET data = $3 WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(data)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Hard delete. Idempotent: deleting an absent id succeeds.
    pub async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Refresh `updated_at` to the store's clock without changing the body.
    pub async fn touch(&self, collection: &str, id: &str) -> Result<()> {
        sqlx::query("UPDATE documents SET updated_at = NOW() WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Run a conjunction of filters against a collection.
    pub async fn query(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Document>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT id, data, updated_at FROM documents WHERE collection = ");
        builder.push_bind(collection);

        for filter in filters {
            match filter {
                Filter::Eq { field, value } => {
                    let mut probe = Map::new();
                    probe.insert((*field).to_string(), value.clone());
                    builder.push(" AND data @> ");
                    builder.push_bind(Value::Object(probe));
                }
                Filter::DayRange { field, start, end } => {
                    // `field` is a compile-time constant, safe to splice.
                    builder.push(format!(" AND (data->>'{}')::timestamptz >= ", field));
                    builder.push_bind(*start);
                    builder.push(format!(" AND (data->>'{}')::timestamptz < ", field));
                    builder.push_bind(*end);
                }
            }
        }

        let docs = builder
            .build_query_as::<Document>()
            .fetch_all(&self.pool)
            .await?;

        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_event_json_flattens_fields() {
        let doc = Document {
            id: "ev-1".to_string(),
            data: json!({"title": "Meetup", "eventType": "social"}),
            updated_at: DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };

        let event = doc.into_event_json();
        assert_eq!(event["id"], "ev-1");
        assert_eq!(event["title"], "Meetup");
        assert_eq!(event["eventType"], "social");
        assert_eq!(event["updatedAt"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn test_into_event_json_tolerates_non_object_body() {
        let doc = Document {
            id: "ev-2".to_string(),
            data: Value::Null,
            updated_at: Utc::now(),
        };

        let event = doc.into_event_json();
        assert_eq!(event["id"], "ev-2");
        assert!(event.get("updatedAt").is_some());
    }
}
