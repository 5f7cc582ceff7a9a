//! Reading schema and configuration documents from disk or memory.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::LoadError;

/// Read a document as text, without parsing it.
///
/// Schema text is kept verbatim so that it can be sanitized before parsing.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::ReadError` if it can't be read.
pub fn load_document(path: &Path) -> Result<String, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), bytes = content.len(), "loaded document");
    Ok(content)
}

/// Read and parse a JSON document from a file path.
///
/// # Errors
///
/// Same as [`load_document`], plus `LoadError::InvalidJson` if the file
/// isn't valid JSON.
pub fn load_json(path: &Path) -> Result<Value, LoadError> {
    let content = load_document(path)?;
    load_json_str(&content)
}

/// Parse a JSON document from a string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't valid JSON.
pub fn load_json_str(content: &str) -> Result<Value, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_document_keeps_text_verbatim() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "pattern" :  "^(?!aws:)" }}"#).unwrap();

        let text = load_document(file.path()).unwrap();
        assert_eq!(text, "{ \"pattern\" :  \"^(?!aws:)\" }\n");
    }

    #[test]
    fn load_document_file_not_found() {
        let result = load_document(Path::new("/nonexistent/schema.json"));
        assert!(matches!(result, Err(LoadError::FileNotFound { .. })));
    }

    #[test]
    fn load_json_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"typeName": "Org::Service::Memo"}}"#).unwrap();

        let document = load_json(file.path()).unwrap();
        assert_eq!(document["typeName"], "Org::Service::Memo");
    }

    #[test]
    fn load_json_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let result = load_json(file.path());
        assert!(matches!(result, Err(LoadError::InvalidJson { .. })));
    }

    #[test]
    fn load_json_str_valid() {
        let document = load_json_str(r#"{"type": "object"}"#).unwrap();
        assert_eq!(document["type"], "object");
    }

    #[test]
    fn load_json_str_invalid() {
        let result = load_json_str("{");
        assert!(matches!(result, Err(LoadError::InvalidJson { .. })));
    }
}
