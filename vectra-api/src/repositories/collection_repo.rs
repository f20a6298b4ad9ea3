use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::search::CollectionDescriptor;

use super::repo_error::RepositoryError;

pub trait CollectionRepository {
    async fn get_collections(&self) -> Result<Vec<CollectionDescriptor>, RepositoryError>;
}

pub struct CollectionRepositoryImpl {
    pool: PgPool,
}

impl CollectionRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CollectionRepository for CollectionRepositoryImpl {
    async fn get_collections(&self) -> Result<Vec<CollectionDescriptor>, RepositoryError> {
        let table_exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT FROM information_schema.tables
                WHERE table_name = 'collections'
            )
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        if !table_exists {
            tracing::warn!("collections table does not exist");
            return Ok(vec![]);
        }

        let rows = sqlx::query("SELECT id, name, description, tags FROM collections")
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("found {} collections in database", rows.len());

        Ok(rows.iter().map(row_to_collection).collect())
    }
}

fn row_to_collection(row: &PgRow) -> CollectionDescriptor {
    CollectionDescriptor {
        id: row.try_get("id").unwrap_or_default(),
        name: row.try_get("name").unwrap_or_default(),
        description: row.try_get("description").unwrap_or_default(),
        tags: parse_tags(tags_value(row)),
    }
}

/// The tags column may be JSONB or plain text holding JSON.
fn tags_value(row: &PgRow) -> Option<serde_json::Value> {
    if let Ok(value) = row.try_get::<Option<serde_json::Value>, _>("tags") {
        return value;
    }
    row.try_get::<Option<String>, _>("tags")
        .ok()
        .flatten()
        .and_then(|s| serde_json::from_str(&s).ok())
}

/// Lenient tag extraction: anything that is not an array of strings becomes
/// an empty tag list rather than failing the row.
fn parse_tags(value: Option<serde_json::Value>) -> Vec<String> {
    match value {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Some(serde_json::Value::String(s)) => serde_json::from_str(&s).unwrap_or_default(),
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn tags_parse_from_json_array() {
        assert_eq!(
            parse_tags(Some(json!(["nasa", "technical"]))),
            vec!["nasa", "technical"]
        );
    }

    #[test]
    fn tags_parse_from_json_encoded_string() {
        assert_eq!(
            parse_tags(Some(json!("[\"nasa\"]"))),
            vec!["nasa".to_string()]
        );
    }

    #[test]
    fn malformed_tags_become_empty() {
        assert!(parse_tags(Some(json!("not json"))).is_empty());
        assert!(parse_tags(Some(json!({"a": 1}))).is_empty());
        assert!(parse_tags(Some(json!(42))).is_empty());
        assert!(parse_tags(None).is_empty());
    }

    #[test]
    fn non_string_array_entries_are_skipped() {
        assert_eq!(
            parse_tags(Some(json!(["nasa", 7, null]))),
            vec!["nasa".to_string()]
        );
    }
}
