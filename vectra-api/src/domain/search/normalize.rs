//! Canonical mapping from raw backend records to document matches.
//!
//! The mapping is identical regardless of originating adapter, so results are
//! indistinguishable in shape to a caller.

use serde_json::Value;
use uuid::Uuid;

use super::types::{BackendDescriptor, DocumentMatch, RawMatch};

/// Normalize a raw backend record into the canonical match shape.
///
/// Missing document/chunk identifiers are replaced with fresh unique ones;
/// missing names, tags and chunk indexes get absent/empty defaults.
pub fn to_document_match(raw: RawMatch, backend: &BackendDescriptor) -> DocumentMatch {
    let metadata = raw.metadata;

    DocumentMatch {
        content: raw.content,
        document_id: string_field(&metadata, "documentId").unwrap_or_else(fresh_id),
        document_name: string_field(&metadata, "documentName")
            .unwrap_or_else(|| "Unknown Document".to_string()),
        chunk_id: string_field(&metadata, "chunkId").unwrap_or_else(fresh_id),
        chunk_index: metadata.get("chunkIndex").and_then(Value::as_i64),
        tags: string_array(&metadata, "tags"),
        source_backend_id: backend.id.clone(),
        source_backend_name: backend.display_name.clone(),
        source_backend_kind: backend.kind.to_string(),
        similarity: sanitize_similarity(raw.similarity),
    }
}

/// Coerce a backend-reported score into the [0, 1] range, with NaN as 0.0.
pub fn sanitize_similarity(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

fn string_field(metadata: &Value, key: &str) -> Option<String> {
    metadata
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_array(metadata: &Value, key: &str) -> Vec<String> {
    metadata
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::search::types::BackendKind;

    fn backend() -> BackendDescriptor {
        BackendDescriptor {
            id: "pgvector-1".to_string(),
            display_name: "PostgreSQL Vector DB".to_string(),
            kind: BackendKind::SqlVector,
            description: "Local PostgreSQL with pgvector extension".to_string(),
        }
    }

    #[test]
    fn complete_metadata_maps_through() {
        let raw = RawMatch {
            content: "chunk text".to_string(),
            metadata: json!({
                "documentId": "doc-1",
                "documentName": "Flight Plan",
                "chunkId": "chunk-9",
                "chunkIndex": 9,
                "tags": ["nasa", "technical"],
            }),
            similarity: 0.91,
        };

        let doc = to_document_match(raw, &backend());
        assert_eq!(doc.document_id, "doc-1");
        assert_eq!(doc.document_name, "Flight Plan");
        assert_eq!(doc.chunk_id, "chunk-9");
        assert_eq!(doc.chunk_index, Some(9));
        assert_eq!(doc.tags, vec!["nasa", "technical"]);
        assert_eq!(doc.source_backend_id, "pgvector-1");
        assert_eq!(doc.source_backend_kind, "sql_vector");
        assert_eq!(doc.similarity, 0.91);
    }

    #[test]
    fn missing_ids_are_synthesized_and_unique() {
        let raw = RawMatch {
            content: String::new(),
            metadata: json!({}),
            similarity: 0.5,
        };

        let first = to_document_match(raw.clone(), &backend());
        let second = to_document_match(raw, &backend());

        assert!(!first.document_id.is_empty());
        assert!(!first.chunk_id.is_empty());
        // A synthesized identifier is never reused across matches.
        assert_ne!(first.document_id, second.document_id);
        assert_ne!(first.chunk_id, second.chunk_id);
    }

    #[test]
    fn missing_optional_fields_get_defaults() {
        let raw = RawMatch {
            content: String::new(),
            metadata: json!({ "documentId": "doc-1", "chunkId": "chunk-1" }),
            similarity: 0.5,
        };

        let doc = to_document_match(raw, &backend());
        assert_eq!(doc.document_name, "Unknown Document");
        assert_eq!(doc.chunk_index, None);
        assert!(doc.tags.is_empty());
    }

    #[test]
    fn nan_similarity_becomes_zero() {
        assert_eq!(sanitize_similarity(f64::NAN), 0.0);
    }

    #[test]
    fn similarity_is_clamped_to_unit_range() {
        assert_eq!(sanitize_similarity(1.2), 1.0);
        assert_eq!(sanitize_similarity(-0.3), 0.0);
        assert_eq!(sanitize_similarity(0.77), 0.77);
    }

    #[test]
    fn empty_string_ids_count_as_missing() {
        let raw = RawMatch {
            content: String::new(),
            metadata: json!({ "documentId": "", "chunkId": "" }),
            similarity: 0.5,
        };

        let doc = to_document_match(raw, &backend());
        assert!(!doc.document_id.is_empty());
        assert!(!doc.chunk_id.is_empty());
    }
}
