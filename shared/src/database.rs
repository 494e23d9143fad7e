use anyhow::Result;
use sea_orm::{Database, DatabaseConnection};
use tracing::info;

pub async fn get_db_connection(database_url: &str) -> Result<DatabaseConnection> {
    info!("Connecting to database via Sea-ORM at: {}", redact_password(database_url));
    let db = Database::connect(database_url).await?;
    Ok(db)
}

/// Hide the password part of a connection URL for logging
fn redact_password(database_url: &str) -> String {
    let Some((scheme, rest)) = database_url.split_once("://") else {
        return database_url.to_string();
    };
    match rest.split_once('@') {
        Some((credentials, host)) => {
            let user = credentials.split(':').next().unwrap_or_default();
            format!("{}://{}:***@{}", scheme, user, host)
        }
        None => database_url.to_string(),
    }
}
