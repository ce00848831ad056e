//! Normalization of upstream file listings.

use serde_json::Value;

use assistant_chat_core::FileDescriptor;

use crate::error::{ClientError, Result};

/// Turn a file listing into descriptors.
///
/// The upstream returns either a bare array or an object with a `files`
/// array. An object without `files` means no files. Entries without an ID
/// are skipped.
///
/// # Errors
///
/// Returns [`ClientError::Parse`] if the body is neither an array nor an
/// object.
pub fn normalize_file_list(body: Value) -> Result<Vec<FileDescriptor>> {
    let entries = match body {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("files") {
            Some(Value::Array(entries)) => entries,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(ClientError::Parse(format!(
                    "expected 'files' to be an array, got {other}"
                )))
            }
        },
        other => {
            return Err(ClientError::Parse(format!(
                "expected a file list, got {other}"
            )))
        }
    };

    Ok(entries.iter().filter_map(normalize_file).collect())
}

/// Turn one upstream file entry into a descriptor.
#[must_use]
pub fn normalize_file(entry: &Value) -> Option<FileDescriptor> {
    let Some(id) = text(entry, "id") else {
        tracing::debug!(entry = %entry, "Skipping file entry without id");
        return None;
    };

    Some(FileDescriptor {
        id,
        name: text(entry, "name").unwrap_or_default(),
        size_bytes: entry
            .get("size_bytes")
            .or_else(|| entry.get("size"))
            .and_then(Value::as_u64),
        created_at: text(entry, "created_at").or_else(|| text(entry, "created_on")),
        status: text(entry, "status"),
    })
}

fn text(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_array() {
        let files = normalize_file_list(json!([
            {"id": "f1", "name": "a.pdf", "size": 1024, "created_on": "2024-05-01T00:00:00Z", "status": "Available"}
        ]))
        .unwrap();

        assert_eq!(
            files,
            vec![FileDescriptor {
                id: "f1".into(),
                name: "a.pdf".into(),
                size_bytes: Some(1024),
                created_at: Some("2024-05-01T00:00:00Z".into()),
                status: Some("Available".into()),
            }]
        );
    }

    #[test]
    fn wrapped_in_files_key() {
        let files =
            normalize_file_list(json!({"files": [{"id": "f1", "name": "a.pdf"}, {"id": "f2"}]}))
                .unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[1].name, "");
    }

    #[test]
    fn object_without_files_is_empty() {
        assert!(normalize_file_list(json!({})).unwrap().is_empty());
    }

    #[test]
    fn entries_without_id_skipped() {
        let files = normalize_file_list(json!([{"name": "orphan"}, {"id": "f1"}])).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].id, "f1");
    }

    #[test]
    fn scalar_body_rejected() {
        let err = normalize_file_list(json!("nope")).unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
    }
}
