//! Health metric documents (the training collection)

use serde_json::Value;
use sqlx::PgPool;

use crate::logic::Dataset;

pub struct HealthMetric;

impl HealthMetric {
    /// Fetch documents in insertion order, optionally filtered by JSONB
    /// containment (`{"BeltId": "A"}` matches every doc carrying that pair).
    pub async fn fetch_all(
        pool: &PgPool,
        collection: &str,
        filter: Option<&Value>,
    ) -> Result<Vec<Value>, sqlx::Error> {
        let sql = format!(
            "SELECT doc FROM {} WHERE ($1::jsonb IS NULL OR doc @> $1::jsonb) ORDER BY id",
            collection
        );

        sqlx::query_scalar::<_, Value>(&sql)
            .bind(filter.cloned())
            .fetch_all(pool)
            .await
    }

    /// Same documents, as a dataset ready for preprocessing
    pub async fn fetch_dataset(
        pool: &PgPool,
        collection: &str,
        filter: Option<&Value>,
    ) -> Result<Dataset, sqlx::Error> {
        let docs = Self::fetch_all(pool, collection, filter).await?;
        tracing::info!("Fetched {} records from {}", docs.len(), collection);
        Ok(Dataset::from_documents(docs))
    }

    pub async fn count(pool: &PgPool, collection: &str) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT COUNT(*) FROM {}", collection);
        sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(pool)
            .await
    }
}
