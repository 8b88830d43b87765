//! AWS Secrets Manager integration.

use aws_sdk_secretsmanager::Client as SecretsClient;
use serde::Deserialize;
use std::sync::OnceLock;

use crate::{Error, Result};

/// Each Lambda process needs exactly one secret (the database credentials),
/// so the fetched string is cached for the life of the execution environment.
static SECRET_CACHE: OnceLock<String> = OnceLock::new();

/// Database credentials from Secrets Manager.
#[derive(Debug, Deserialize)]
pub struct DatabaseCredentials {
    pub username: String,
    pub password: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub dbname: Option<String>,
}

/// Get the secret value from Secrets Manager, fetching at most once per process.
pub async fn get_secret(client: &SecretsClient, secret_arn: &str) -> Result<String> {
    if let Some(value) = SECRET_CACHE.get() {
        return Ok(value.clone());
    }

    let response = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|e| Error::Aws(format!("Failed to get secret: {}", e)))?;

    let secret_string = response
        .secret_string()
        .ok_or_else(|| Error::Aws("Secret has no string value".to_string()))?
        .to_string();

    // Concurrent first fetches race; whichever lands first wins and the
    // values are identical.
    Ok(SECRET_CACHE.get_or_init(|| secret_string).clone())
}

/// Get database credentials from Secrets Manager.
pub async fn get_database_credentials(
    client: &SecretsClient,
    secret_arn: &str,
) -> Result<DatabaseCredentials> {
    let secret_string = get_secret(client, secret_arn).await?;

    serde_json::from_str(&secret_string)
        .map_err(|e| Error::Aws(format!("Failed to parse database credentials: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_credentials() {
        let json = r#"{"username":"evadmin","password":"secret123","host":"db.example.com","port":5432,"dbname":"events"}"#;
        let creds: DatabaseCredentials = serde_json::from_str(json).unwrap();
        assert_eq!(creds.username, "evadmin");
        assert_eq!(creds.password, "secret123");
        assert_eq!(creds.host, Some("db.example.com".to_string()));
    }

    #[test]
    fn test_parse_credentials_without_optional_fields() {
        let json = r#"{"username":"evadmin","password":"secret123"}"#;
        let creds: DatabaseCredentials = serde_json::from_str(json).unwrap();
        assert_eq!(creds.host, None);
        assert_eq!(creds.port, None);
        assert_eq!(creds.dbname, None);
    }
}
