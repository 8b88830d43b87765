//! Shared request types and field validation.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use validator::Validate;

use crate::{Error, Result};

/// Rust field name to wire name, in the canonical reporting order.
const FIELD_NAMES: [(&str, &str); 6] = [
    ("title", "title"),
    ("description", "description"),
    ("date", "date"),
    ("location", "location"),
    ("organizer", "organizer"),
    ("event_type", "eventType"),
];

/// Create event request payload. All six fields are required and non-empty;
/// absent fields default to empty strings so they are reported as missing
/// rather than failing deserialization.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub date: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub location: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub organizer: String,
    #[serde(default, rename = "eventType")]
    #[validate(length(min = 1))]
    pub event_type: String,
}

impl CreateEventRequest {
    /// Wire names of required fields that are missing or empty, in canonical order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => {
                let failed: Vec<String> =
                    errors.field_errors().keys().map(|k| k.to_string()).collect();
                FIELD_NAMES
                    .iter()
                    .filter(|(rust_name, _)| failed.iter().any(|f| f == rust_name))
                    .map(|(_, wire_name)| *wire_name)
                    .collect()
            }
        }
    }

    /// Document body to store, with the date normalized to a point-in-time value.
    pub fn document_body(&self, date: DateTime<Utc>) -> Value {
        json!({
            "title": self.title,
            "description": self.description,
            "date": date,
            "location": self.location,
            "organizer": self.organizer,
            "eventType": self.event_type,
        })
    }

    /// Response payload: the submitted fields plus the assigned id. The date
    /// is echoed back as submitted, not the normalized stored value.
    pub fn response_body(&self, id: &str) -> Value {
        json!({
            "id": id,
            "title": self.title,
            "description": self.description,
            "date": self.date,
            "location": self.location,
            "organizer": self.organizer,
            "eventType": self.event_type,
        })
    }
}

/// Update event request payload. No presence validation: the stored document
/// is overwritten with exactly the fields provided here.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub organizer: Option<String>,
    #[serde(rename = "eventType")]
    pub event_type: Option<String>,
}

impl UpdateEventRequest {
    /// Full replacement document body. Absent fields are omitted, not merged
    /// from the stored document.
    pub fn document_body(&self) -> Result<Value> {
        let mut doc = Map::new();
        if let Some(title) = &self.title {
            doc.insert("title".to_string(), Value::String(title.clone()));
        }
        if let Some(description) = &self.description {
            doc.insert("description".to_string(), Value::String(description.clone()));
        }
        if let Some(raw) = &self.date {
            let date = parse_event_date(raw)?;
            doc.insert("date".to_string(), serde_json::to_value(date)?);
        }
        if let Some(location) = &self.location {
            doc.insert("location".to_string(), Value::String(location.clone()));
        }
        if let Some(organizer) = &self.organizer {
            doc.insert("organizer".to_string(), Value::String(organizer.clone()));
        }
        if let Some(event_type) = &self.event_type {
            doc.insert("eventType".to_string(), Value::String(event_type.clone()));
        }
        Ok(Value::Object(doc))
    }
}

/// Enforce an endpoint's single allowed HTTP method.
pub fn require_method(method: &str, allowed: &str, endpoint: &str) -> Result<()> {
    if method == allowed {
        Ok(())
    } else {
        Err(Error::MethodNotAllowed(format!(
            "{} accepts {} requests only",
            endpoint, allowed
        )))
    }
}

/// The `id` query parameter, required and non-empty.
pub fn require_id(id: Option<&str>) -> Result<String> {
    match id {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(Error::Validation(
            "id query parameter is required".to_string(),
        )),
    }
}

/// Parse a client-supplied date string into a point-in-time value.
///
/// Accepts RFC 3339, a bare datetime (assumed UTC), or a bare date
/// (midnight UTC).
pub fn parse_event_date(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN)));
    }
    Err(Error::Validation(format!("Invalid date value: {}", raw)))
}

/// UTC day containing `date`, as a half-open `[start, end)` range.
pub fn day_bounds(date: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&date.date_naive().and_time(NaiveTime::MIN));
    (start, start + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn full_payload() -> &'static str {
        r#"{
            "title": "Meetup",
            "description": "d",
            "date": "2024-05-01",
            "location": "Hall A",
            "organizer": "Org",
            "eventType": "social"
        }"#
    }

    #[test]
    fn test_create_request_complete() {
        let request: CreateEventRequest = serde_json::from_str(full_payload()).unwrap();
        assert!(request.missing_fields().is_empty());
        assert_eq!(request.event_type, "social");
    }

    #[test]
    fn test_create_request_reports_missing_fields_in_order() {
        let request: CreateEventRequest =
            serde_json::from_str(r#"{"description": "d", "organizer": "", "date": "2024-05-01"}"#)
                .unwrap();
        assert_eq!(
            request.missing_fields(),
            vec!["title", "location", "organizer", "eventType"]
        );
    }

    #[test]
    fn test_create_request_empty_body() {
        let request: CreateEventRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(
            request.missing_fields(),
            vec!["title", "description", "date", "location", "organizer", "eventType"]
        );
    }

    #[test]
    fn test_create_response_echoes_input_date() {
        let request: CreateEventRequest = serde_json::from_str(full_payload()).unwrap();
        let body = request.response_body("ev-1");
        assert_eq!(body["id"], "ev-1");
        assert_eq!(body["date"], "2024-05-01");
        assert_eq!(body["eventType"], "social");
    }

    #[test]
    fn test_create_document_body_normalizes_date() {
        let request: CreateEventRequest = serde_json::from_str(full_payload()).unwrap();
        let date = parse_event_date(&request.date).unwrap();
        let doc = request.document_body(date);
        assert_eq!(doc["date"], "2024-05-01T00:00:00Z");
        assert!(doc.get("id").is_none());
    }

    #[test]
    fn test_update_document_body_omits_absent_fields() {
        let request: UpdateEventRequest =
            serde_json::from_str(r#"{"title": "New title", "eventType": "workshop"}"#).unwrap();
        let doc = request.document_body().unwrap();
        let obj = doc.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(doc["title"], "New title");
        assert_eq!(doc["eventType"], "workshop");
        assert!(obj.get("description").is_none());
    }

    #[test]
    fn test_update_document_body_rejects_bad_date() {
        let request: UpdateEventRequest =
            serde_json::from_str(r#"{"date": "not-a-date"}"#).unwrap();
        assert!(request.document_body().is_err());
    }

    #[test]
    fn test_parse_event_date_formats() {
        let midnight = parse_event_date("2024-05-01").unwrap();
        assert_eq!(midnight.hour(), 0);
        assert_eq!(midnight.to_rfc3339(), "2024-05-01T00:00:00+00:00");

        let datetime = parse_event_date("2024-05-01T18:30:00").unwrap();
        assert_eq!(datetime.hour(), 18);

        let rfc3339 = parse_event_date("2024-05-01T18:30:00-04:00").unwrap();
        assert_eq!(rfc3339.hour(), 22);

        assert!(parse_event_date("first of May").is_err());
        assert!(parse_event_date("").is_err());
    }

    #[test]
    fn test_require_method_rejects_disallowed_method() {
        let err = require_method("GET", "POST", "createEvent").unwrap_err();
        assert_eq!(err.status_code(), 405);
        assert_eq!(err.code(), "METHOD_NOT_ALLOWED");
        assert_eq!(err.public_message(), "createEvent accepts POST requests only");

        let err = require_method("DELETE", "GET", "getAllEvents").unwrap_err();
        assert_eq!(err.status_code(), 405);
    }

    #[test]
    fn test_require_method_accepts_allowed_method() {
        assert!(require_method("POST", "POST", "createEvent").is_ok());
        assert!(require_method("GET", "GET", "getEventById").is_ok());
    }

    #[test]
    fn test_require_id() {
        assert_eq!(require_id(Some("ev-1")).unwrap(), "ev-1");

        let err = require_id(None).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.public_message(), "id query parameter is required");

        assert!(require_id(Some("")).is_err());
    }

    #[test]
    fn test_day_bounds() {
        let date = parse_event_date("2024-05-01T18:30:00").unwrap();
        let (start, end) = day_bounds(date);
        assert_eq!(start.to_rfc3339(), "2024-05-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-05-02T00:00:00+00:00");
    }
}
