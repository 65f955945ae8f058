//! Database module - PostgreSQL connection and migrations
//!
//! Health metric readings are stored as JSONB documents, one per row, so
//! the collection keeps the flat shape of the training file.

use std::time::Duration;
use sqlx::{postgres::PgPoolOptions, PgPool};

/// Create database connection pool.
///
/// Connects lazily: the service still scores from artifacts when the
/// database is down, only the record count and database training fail.
pub fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy(database_url)
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool, collection: &str) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(&schema_sql(collection))
        .execute(pool)
        .await?;

    tracing::info!("Database schema applied successfully");
    Ok(())
}

/// Schema for one collection. `collection` must already be validated as
/// a plain identifier.
fn schema_sql(collection: &str) -> String {
    format!(
        r#"
-- Health metric documents (Vibration, Temperature, Speed, PowerConsumption, ...)
CREATE TABLE IF NOT EXISTS {collection} (
    id BIGSERIAL PRIMARY KEY,
    doc JSONB NOT NULL,
    recorded_at TIMESTAMPTZ DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_{collection}_doc ON {collection} USING GIN (doc);
CREATE INDEX IF NOT EXISTS idx_{collection}_recorded ON {collection}(recorded_at);
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_uses_collection_name() {
        let sql = schema_sql("belt_a");
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS belt_a ("));
        assert!(sql.contains("idx_belt_a_doc ON belt_a USING GIN (doc)"));
    }
}
