use anyhow::Context;
use sqlx::{Connection, PgConnection, postgres::PgConnectOptions};

/// Connection options from a URL, or from the `PG*` environment variables
/// when no URL is configured.
pub fn connect_options(database_url: Option<&str>) -> anyhow::Result<PgConnectOptions> {
    match database_url {
        Some(url) => url
            .parse::<PgConnectOptions>()
            .context("Invalid DATABASE_URL"),
        None => Ok(PgConnectOptions::new()),
    }
}

pub async fn open(options: &PgConnectOptions) -> Result<PgConnection, sqlx::Error> {
    PgConnection::connect_with(options).await
}

/// Closes the connection, logging rather than failing the request if the
/// terminate handshake goes wrong.
pub async fn close(conn: PgConnection) {
    if let Err(err) = conn.close().await {
        tracing::warn!(error = %err, "Failed to close DB connection");
    }
}

/// Opens a connection once at startup so misconfiguration shows up early.
pub async fn check(options: &PgConnectOptions) -> anyhow::Result<()> {
    let conn = open(options).await.context("Failed to connect to DB")?;
    close(conn).await;
    Ok(())
}
