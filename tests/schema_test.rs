//! Integration tests for loading, sanitizing and validating schema documents.

use std::io::Write;

use resource_schema::{
    load_document, load_json, sanitize, LoadError, MetaSchema, PropertyType, ResourceSchema,
    ValidateError,
};
use serde_json::json;
use tempfile::NamedTempFile;

const META_SCHEMA: &str = r#"{
    "$schema": "http://json-schema.org/draft-07/schema#",
    "type": "object",
    "required": ["typeName", "description", "properties", "primaryIdentifier", "additionalProperties"],
    "properties": {
        "typeName": {
            "type": "string",
            "pattern": "^[a-zA-Z0-9]{2,64}::[a-zA-Z0-9]{2,64}::[a-zA-Z0-9]{2,64}$"
        },
        "description": { "type": "string", "maxLength": 1024 },
        "properties": { "type": "object", "minProperties": 1 },
        "primaryIdentifier": {
            "type": "array",
            "minItems": 1,
            "items": { "type": "string" }
        },
        "additionalProperties": { "const": false }
    }
}"#;

const BUCKET_SCHEMA: &str = r##"{
    "$schema": "https://example.com/provider.definition.schema.v1.json",
    "typeName": "Org::Storage::Bucket",
    "description": "An object storage bucket",
    "definitions": {
        "Tag": {
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "Key": { "type": "string", "pattern": "^(?!aws:).{1,128}$" },
                "Value": { "type": "string", "maxLength": 256 }
            },
            "required": ["Key", "Value"]
        }
    },
    "properties": {
        "BucketName": { "type": "string", "pattern": "^[a-z0-9][a-z0-9.-]{1,61}[a-z0-9]$" },
        "Region": { "type": "string", "pattern": "^[a-z]{2}-[a-z]+-\\d\\Z" },
        "Tags": {
            "type": "array",
            "items": { "$ref": "#/definitions/Tag" }
        },
        "Metadata": {
            "type": "object",
            "patternProperties": {
                "^(?!aws:)[a-z]+$": { "type": "string" }
            },
            "additionalProperties": false
        }
    },
    "additionalProperties": false,
    "primaryIdentifier": ["/properties/BucketName"]
}"##;

fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

// === Loading ===

mod loading {
    use super::*;

    #[test]
    fn schema_from_path() {
        let file = temp_file(BUCKET_SCHEMA);
        let schema = ResourceSchema::from_path(file.path()).unwrap();
        assert_eq!(schema.type_name(), Some("Org::Storage::Bucket"));
        assert_eq!(schema.source(), BUCKET_SCHEMA);
    }

    #[test]
    fn missing_schema_file() {
        let result = ResourceSchema::from_path(std::path::Path::new("/nonexistent/bucket.json"));
        assert!(matches!(result, Err(LoadError::FileNotFound { .. })));
    }

    #[test]
    fn document_and_json_helpers_agree() {
        let file = temp_file(BUCKET_SCHEMA);
        let text = load_document(file.path()).unwrap();
        let value = load_json(file.path()).unwrap();
        assert_eq!(serde_json::from_str::<serde_json::Value>(&text).unwrap(), value);
    }

    #[test]
    fn type_unions_load_into_model() {
        let nullable = BUCKET_SCHEMA.replace(
            r#""BucketName": { "type": "string","#,
            r#""BucketName": { "type": ["string", "null"],"#,
        );
        assert_ne!(nullable, BUCKET_SCHEMA);

        let resource = ResourceSchema::from_document(&nullable)
            .unwrap()
            .resource()
            .unwrap();
        let name = &resource.properties["BucketName"];
        assert_eq!(name.declared_type(), Some(PropertyType::String));
        assert!(name.property_type.as_ref().unwrap().is_nullable());
    }

    #[test]
    fn model_from_loaded_schema_expands() {
        let schema = ResourceSchema::from_document(BUCKET_SCHEMA).unwrap();
        let mut resource = schema.resource().unwrap();
        resource.expand().unwrap();

        let tag = resource.properties["Tags"].items.as_deref().unwrap();
        assert_eq!(
            tag.property("Key").unwrap().pattern.as_deref(),
            Some("^(?!aws:).{1,128}$")
        );
    }
}

// === Sanitizing ===

mod sanitizing {
    use super::*;

    #[test]
    fn only_unsupported_regexes_change() {
        let sanitized = sanitize(BUCKET_SCHEMA);
        let expected = BUCKET_SCHEMA.replace(
            r#""pattern": "^[a-z]{2}-[a-z]+-\\d\\Z""#,
            r#""pattern": """#,
        );
        assert_ne!(expected, BUCKET_SCHEMA);
        assert_eq!(sanitized, expected);
    }

    #[test]
    fn sanitized_copy_keeps_what_the_engine_runs() {
        let schema = ResourceSchema::from_document(BUCKET_SCHEMA).unwrap();
        let sanitized = schema.sanitized();
        assert_eq!(sanitized["properties"]["Region"]["pattern"], json!(""));
        assert_eq!(
            sanitized["definitions"]["Tag"]["properties"]["Key"]["pattern"],
            json!("^(?!aws:).{1,128}$")
        );
        assert_eq!(
            sanitized["properties"]["BucketName"]["pattern"],
            json!("^[a-z0-9][a-z0-9.-]{1,61}[a-z0-9]$")
        );
        assert!(sanitized["properties"]["Metadata"]["patternProperties"]
            .get("^(?!aws:)[a-z]+$")
            .is_some());
    }
}

// === Meta-Schema Validation ===

mod meta_schema {
    use super::*;

    #[test]
    fn accepts_resource_schema() {
        let meta = MetaSchema::from_document(META_SCHEMA).unwrap();
        let schema = ResourceSchema::from_document(BUCKET_SCHEMA).unwrap();
        assert!(meta.validate_resource_schema(&schema).is_ok());
    }

    #[test]
    fn meta_schema_from_path() {
        let file = temp_file(META_SCHEMA);
        let meta = MetaSchema::from_path(file.path()).unwrap();
        assert!(meta.validate_resource_document(BUCKET_SCHEMA).is_ok());
    }

    #[test]
    fn rejects_open_resource() {
        let meta = MetaSchema::from_document(META_SCHEMA).unwrap();
        let open = BUCKET_SCHEMA.replace(
            r#""additionalProperties": false,
    "primaryIdentifier""#,
            r#""additionalProperties": true,
    "primaryIdentifier""#,
        );
        assert_ne!(open, BUCKET_SCHEMA);

        match meta.validate_resource_document(&open) {
            Err(ValidateError::Invalid { errors }) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].path, "/additionalProperties");
            }
            other => panic!("expected one violation, got {other:?}"),
        }
    }
}

// === Configuration Validation ===

mod configuration {
    use super::*;

    fn bucket() -> ResourceSchema {
        ResourceSchema::from_document(BUCKET_SCHEMA).unwrap()
    }

    #[test]
    fn valid_configuration() {
        let result = bucket().validate_configuration(&json!({
            "BucketName": "reports-2024",
            "Tags": [{ "Key": "team", "Value": "storage" }],
            "Metadata": { "owner": "storage" }
        }));
        assert!(result.is_ok(), "{result:?}");
    }

    #[test]
    fn neutralized_pattern_accepts_anything() {
        let result = bucket().validate_configuration(&json!({
            "BucketName": "reports-2024",
            "Region": "not a region"
        }));
        assert!(result.is_ok(), "{result:?}");
    }

    #[test]
    fn lookahead_patterns_reject_reserved_prefix() {
        let result = bucket().validate_configuration(&json!({
            "BucketName": "reports-2024",
            "Tags": [{ "Key": "aws:reserved", "Value": "x" }],
            "Metadata": { "aws:owner": "storage" }
        }));
        match result {
            Err(ValidateError::Invalid { errors }) => {
                let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
                assert!(paths.contains(&"/Tags/0/Key"), "{paths:?}");
                assert!(paths.contains(&"/Metadata"), "{paths:?}");
            }
            other => panic!("expected violations, got {other:?}"),
        }
    }

    #[test]
    fn violations_point_at_instance_location() {
        let result = bucket().validate_configuration(&json!({
            "BucketName": "Reports",
            "Tags": [{ "Key": "team" }]
        }));
        match result {
            Err(ValidateError::Invalid { errors }) => {
                let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
                assert!(paths.contains(&"/BucketName"), "{paths:?}");
                assert!(paths.contains(&"/Tags/0"), "{paths:?}");
            }
            other => panic!("expected violations, got {other:?}"),
        }
    }

    #[test]
    fn configuration_from_path() {
        let file = temp_file(r#"{ "BucketName": "reports-2024", "Unknown": true }"#);
        let result = bucket().validate_configuration_path(file.path());
        assert!(matches!(result, Err(ValidateError::Invalid { .. })));
    }

    #[test]
    fn configuration_text_must_be_json() {
        let result = bucket().validate_configuration_document("BucketName=reports");
        assert!(matches!(
            result,
            Err(ValidateError::Load(LoadError::InvalidJson { .. }))
        ));
    }
}
