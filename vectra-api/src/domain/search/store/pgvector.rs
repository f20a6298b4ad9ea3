//! Direct SQL vector store backed by PostgreSQL with the pgvector extension.
//!
//! This is the fast path: cosine similarity is computed server-side as
//! `1 - (embedding <=> $query)`, which is the canonical similarity definition
//! for the whole system. Filter values are always bound parameters.

use std::sync::Arc;

use async_trait::async_trait;
use pgvector::Vector;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::search::filter::SearchFilter;
use crate::domain::search::traits::{Embedder, Result, SearchError, VectorStore};
use crate::domain::search::types::{
    BackendDescriptor, BackendHealth, BackendKind, HealthState, RawMatch,
};

pub struct PgVectorStore {
    pool: PgPool,
    table_name: String,
    descriptor: BackendDescriptor,
    embedder: Arc<dyn Embedder>,
}

impl PgVectorStore {
    pub fn new(pool: PgPool, table_name: String, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            pool,
            table_name,
            descriptor: BackendDescriptor {
                id: "pgvector-1".to_string(),
                display_name: "PostgreSQL Vector DB".to_string(),
                kind: BackendKind::SqlVector,
                description: "Local PostgreSQL with pgvector extension".to_string(),
            },
            embedder,
        }
    }

    async fn table_exists(&self) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT FROM information_schema.tables
                WHERE table_name = $1
            )
            "#,
        )
        .bind(&self.table_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn check_status(&self) -> Result<BackendHealth> {
        if !self.table_exists().await? {
            return Ok(BackendHealth {
                name: self.descriptor.display_name.clone(),
                status: HealthState::Warning,
                details: format!(
                    "Connected to database but table '{}' does not exist.",
                    self.table_name
                ),
                document_count: 0,
                dimensions: None,
            });
        }

        let document_count: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", self.table_name))
                .fetch_one(&self.pool)
                .await?;

        let dimensions: Option<i32> = sqlx::query_scalar(&format!(
            "SELECT vector_dims(embedding) FROM {} WHERE embedding IS NOT NULL LIMIT 1",
            self.table_name
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(BackendHealth {
            name: self.descriptor.display_name.clone(),
            status: HealthState::Ok,
            details: format!(
                "Connected to database. {} documents found.",
                document_count
            ),
            document_count,
            dimensions,
        })
    }
}

fn parse_row(row: &PgRow) -> Result<RawMatch> {
    let content: String = row
        .try_get("content")
        .map_err(|e| SearchError::MalformedRecord(e.to_string()))?;
    let metadata: serde_json::Value = row
        .try_get("metadata")
        .map_err(|e| SearchError::MalformedRecord(e.to_string()))?;
    let similarity: f64 = row
        .try_get("similarity")
        .map_err(|e| SearchError::MalformedRecord(e.to_string()))?;

    Ok(RawMatch {
        content,
        metadata,
        similarity,
    })
}

#[async_trait]
impl VectorStore for PgVectorStore {
    fn descriptor(&self) -> &BackendDescriptor {
        &self.descriptor
    }

    async fn search(&self, query: &str, k: usize, filter: &SearchFilter) -> Result<Vec<RawMatch>> {
        let embedding = self.embedder.embed(query).await?;

        // $1 is the query vector; filter binds follow, the limit comes last.
        let predicate = filter.to_sql_predicate(2);
        let limit_param = 2 + predicate.binds.len();

        let mut sql = format!(
            "SELECT content, metadata, 1 - (embedding <=> $1) AS similarity FROM {}",
            self.table_name
        );
        if let Some(where_clause) = predicate.where_clause() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_clause);
        }
        sql.push_str(&format!(" ORDER BY similarity DESC LIMIT ${}", limit_param));

        let mut db_query = sqlx::query(&sql).bind(Vector::from(embedding));
        for bind in &predicate.binds {
            db_query = db_query.bind(bind.clone());
        }
        db_query = db_query.bind(k as i64);

        let rows = db_query.fetch_all(&self.pool).await?;

        let mut matches = Vec::with_capacity(rows.len());
        for row in &rows {
            match parse_row(row) {
                Ok(raw) => matches.push(raw),
                Err(err) => {
                    tracing::warn!(backend = %self.descriptor.id, "skipping row: {}", err);
                }
            }
        }

        tracing::debug!(
            backend = %self.descriptor.id,
            matches = matches.len(),
            "direct SQL search completed"
        );

        Ok(matches)
    }

    async fn status(&self) -> BackendHealth {
        match self.check_status().await {
            Ok(health) => health,
            Err(err) => BackendHealth {
                name: self.descriptor.display_name.clone(),
                status: HealthState::Error,
                details: format!("Failed to connect to database: {}", err),
                document_count: 0,
                dimensions: None,
            },
        }
    }
}
