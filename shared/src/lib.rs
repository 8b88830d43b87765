//! Shared library for the Events API Lambda functions.
//!
//! This crate provides the store adapter, response envelope, request types,
//! and configuration used across all Lambda functions.

pub mod config;
pub mod db;
pub mod envelope;
pub mod error;
pub mod models;
pub mod secrets;
pub mod store;

pub use config::Config;
pub use envelope::{
    failure_response, json_response, request_timestamp, FailureEnvelope, SuccessEnvelope,
};
pub use error::{Error, Result};
pub use models::{
    day_bounds, parse_event_date, require_id, require_method, CreateEventRequest,
    UpdateEventRequest,
};
pub use secrets::{get_secret, get_database_credentials, DatabaseCredentials};
pub use store::{DocumentStore, Document, Filter, EVENTS_COLLECTION};
