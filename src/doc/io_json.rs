//! JSON serialization for annotation documents.
//!
//! This is the logical interchange format: a nested mapping with top-level
//! keys for file metadata and the annotation list, each annotation entry
//! carrying its namespace id, observation list, and metadata block.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::model::Document;
use crate::error::MirdocError;

/// Reads a document from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_json(path: &Path) -> Result<Document, MirdocError> {
    let file = File::open(path).map_err(MirdocError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| MirdocError::JsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a document to a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_json(path: &Path, document: &Document) -> Result<(), MirdocError> {
    let file = File::create(path).map_err(MirdocError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, document).map_err(|source| MirdocError::JsonWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a document from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_json_str(json: &str) -> Result<Document, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads a document from raw JSON bytes.
pub fn from_json_slice(json: &[u8]) -> Result<Document, serde_json::Error> {
    serde_json::from_slice(json)
}

/// Writes a document to a JSON string.
///
/// Useful for testing without file I/O.
pub fn to_json_string(document: &Document) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{Annotation, AnnotationMetadata, Curator, Document, Sandbox};

    fn sample_document() -> Document {
        let mut doc = Document::new();
        doc.file_metadata.title = "Track A".into();
        doc.file_metadata.artist = "Example Band".into();
        doc.file_metadata.duration = Some(30.0);
        doc.file_metadata.identifiers.insert("musicbrainz", "1f9a");

        let mut beats = Annotation::new("beat").with_metadata(AnnotationMetadata {
            curator: Curator::new("A. Annotator", "a@example.com"),
            corpus: "example".into(),
            version: "1.0".into(),
            ..Default::default()
        });
        beats.append(0.5, 0.0, 1, None);
        beats.append(1.0, 0.0, 2, None);
        doc.push(beats);

        let mut tags = Annotation::new("tag_open");
        tags.append(0.0, 30.0, "rock", Some(0.9));
        doc.push(tags);

        doc
    }

    #[test]
    fn test_json_roundtrip() {
        let original = sample_document();

        let json = to_json_string(&original).expect("serialization failed");
        let restored = from_json_str(&json).expect("deserialization failed");

        assert_eq!(original, restored);
    }

    #[test]
    fn test_json_format() {
        let json = to_json_string(&sample_document()).expect("serialization failed");

        assert!(json.contains("\"file_metadata\""));
        assert!(json.contains("\"annotations\""));
        assert!(json.contains("\"namespace\": \"beat\""));
        assert!(json.contains("\"musicbrainz\""));
    }

    #[test]
    fn test_empty_fields_are_skipped() {
        let doc = Document::new();
        let json = to_json_string(&doc).expect("serialization failed");

        assert!(!json.contains("annotations"));
        assert!(!json.contains("sandbox"));
        assert!(!json.contains("title"));
    }

    #[test]
    fn test_missing_fields_default_on_read() {
        let doc = from_json_str(r#"{"annotations": [{"namespace": "beat"}]}"#).unwrap();

        assert_eq!(doc.annotations.len(), 1);
        assert!(doc.annotations[0].is_empty());
        assert_eq!(doc.file_metadata, Default::default());
        assert_eq!(doc.sandbox, Sandbox::new());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("sample.json");

        let original = sample_document();
        write_json(&path, &original).expect("write failed");
        let restored = read_json(&path).expect("read failed");

        assert_eq!(original, restored);
    }

    #[test]
    fn test_read_missing_file_fails() {
        let err = read_json(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, MirdocError::Io(_)));
    }

    #[test]
    fn test_read_malformed_json_fails_with_path() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").expect("write fixture");

        let err = read_json(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
