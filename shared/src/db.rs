//! Database connection management.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::secrets::get_database_credentials;
use crate::{Config, Result};

/// Create a database connection pool, pulling credentials from Secrets Manager.
pub async fn create_pool(config: &Config) -> Result<PgPool> {
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let secrets_client = aws_sdk_secretsmanager::Client::new(&aws_config);

    let creds = get_database_credentials(&secrets_client, &config.db_secret_arn).await?;

    let database_url = format!(
        "postgres://{}:{}@{}:{}/{}",
        creds.username,
        creds.password,
        creds.host.as_deref().unwrap_or(&config.db_host),
        creds.port.unwrap_or(5432),
        creds.dbname.as_deref().unwrap_or(&config.db_name),
    );

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&database_url)
        .await?;

    Ok(pool)
}
