//! Uniform JSON response envelopes.
//!
//! Most endpoints wrap their payloads in `{status, data|error, timestamp}`,
//! where `timestamp` is the epoch-millisecond value captured at the start of
//! handling the request.

use lambda_http::{Body, Response};
use serde::Serialize;

use crate::error::Error;

/// Successful response wrapper: `{"status":"success","data":...,"timestamp":...}`.
#[derive(Debug, Serialize)]
pub struct SuccessEnvelope<T> {
    pub status: &'static str,
    pub data: T,
    pub timestamp: i64,
}

impl<T: Serialize> SuccessEnvelope<T> {
    pub fn new(data: T, timestamp: i64) -> Self {
        Self {
            status: "success",
            data,
            timestamp,
        }
    }
}

/// Failure response wrapper:
/// `{"status":"failure","message":...,"error":{"code":...,"details":...},"timestamp":...}`.
#[derive(Debug, Serialize)]
pub struct FailureEnvelope {
    pub status: &'static str,
    pub message: String,
    pub error: ErrorBody,
    pub timestamp: i64,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub details: String,
}

impl FailureEnvelope {
    pub fn from_error(err: &Error, timestamp: i64) -> Self {
        Self {
            status: "failure",
            message: err.public_message(),
            error: ErrorBody {
                code: err.code(),
                details: err.public_details(),
            },
            timestamp,
        }
    }
}

/// Epoch-millisecond timestamp for the envelope, captured once per request.
pub fn request_timestamp() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Serialize a body as a JSON HTTP response.
pub fn json_response<T: Serialize>(
    status: u16,
    body: &T,
) -> Result<Response<Body>, lambda_http::Error> {
    Ok(Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body)?))
        .expect("Failed to build response"))
}

/// Build the failure response for an error, using its own status code.
pub fn failure_response(err: &Error, timestamp: i64) -> Result<Response<Body>, lambda_http::Error> {
    json_response(err.status_code(), &FailureEnvelope::from_error(err, timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        let envelope = SuccessEnvelope::new(serde_json::json!({"id": "abc"}), 1714521600000);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["id"], "abc");
        assert_eq!(json["timestamp"], 1714521600000i64);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failure_shape() {
        let err = Error::Validation("Missing required fields: title".to_string());
        let envelope = FailureEnvelope::from_error(&err, 42);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["message"], "Missing required fields: title");
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"]["details"], "Missing required fields: title");
        assert_eq!(json["timestamp"], 42);
    }

    #[test]
    fn test_failure_shape_hides_store_errors() {
        let err = Error::Database(sqlx::Error::RowNotFound);
        let json = serde_json::to_value(&FailureEnvelope::from_error(&err, 0)).unwrap();
        assert_eq!(json["message"], "Something went wrong");
        assert_eq!(json["error"]["code"], "STORE_ERROR");
    }

    #[test]
    fn test_json_response_sets_content_type() {
        let response = json_response(201, &serde_json::json!({"ok": true})).unwrap();
        assert_eq!(response.status(), 201);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
    }
}
