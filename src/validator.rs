//! Validation of resource schemas and of resource configurations.
//!
//! Two layers are involved. A [`MetaSchema`] checks that a resource schema
//! document is well formed. A [`ResourceSchema`] checks configurations
//! (instances of the resource) against the schema itself, using a copy whose
//! regexes have been passed through [`sanitize`].

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{LoadError, SchemaError, ValidateError};
use crate::loader::{load_document, load_json_str};
use crate::resource::Resource;
use crate::sanitize::sanitize;

/// Keyword naming the meta-schema a document claims to follow.
const SCHEMA_KEYWORD: &str = "$schema";

/// The schema every resource schema document must satisfy.
#[derive(Debug, Clone)]
pub struct MetaSchema {
    schema: Value,
}

impl MetaSchema {
    /// # Errors
    ///
    /// Returns a `LoadError` if the file is missing, unreadable or not JSON.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        Self::from_document(&load_document(path)?)
    }

    /// # Errors
    ///
    /// Returns `LoadError::InvalidJson` if the text isn't valid JSON.
    pub fn from_document(document: &str) -> Result<Self, LoadError> {
        Ok(Self {
            schema: load_json_str(document)?,
        })
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Validate raw resource schema text.
    ///
    /// # Errors
    ///
    /// Returns `ValidateError::Load` if the text isn't JSON,
    /// `ValidateError::InvalidSchema` if the meta-schema can't be compiled, or
    /// `ValidateError::Invalid` listing every violation.
    pub fn validate_resource_document(&self, document: &str) -> Result<(), ValidateError> {
        let document = load_json_str(document)?;
        validate_against_schema(&self.schema, &document)
    }

    /// Validate an already loaded resource schema.
    ///
    /// The original document is checked, not the sanitized copy.
    ///
    /// # Errors
    ///
    /// Returns `ValidateError::InvalidSchema` if the meta-schema can't be
    /// compiled, or `ValidateError::Invalid` listing every violation.
    pub fn validate_resource_schema(&self, resource: &ResourceSchema) -> Result<(), ValidateError> {
        debug!(
            type_name = resource.type_name().unwrap_or_default(),
            "validating resource schema"
        );
        validate_against_schema(&self.schema, &resource.document)
    }
}

/// A loaded resource schema document, ready to validate configurations.
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    source: String,
    document: Value,
    sanitized: Value,
}

impl ResourceSchema {
    /// # Errors
    ///
    /// Returns a `LoadError` if the file is missing, unreadable or not JSON.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        Self::from_document(&load_document(path)?)
    }

    /// Parse schema text, keeping both the original and a sanitized copy.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidJson` if the text isn't valid JSON.
    pub fn from_document(source: &str) -> Result<Self, LoadError> {
        let document = load_json_str(source)?;
        let mut sanitized = load_json_str(&sanitize(source))?;

        // The declared meta-schema is the resource provider definition, not a
        // JSON Schema draft, so the validator must not try to follow it.
        if let Value::Object(map) = &mut sanitized {
            map.remove(SCHEMA_KEYWORD);
        }

        Ok(Self {
            source: source.to_string(),
            document,
            sanitized,
        })
    }

    /// The schema text exactly as loaded.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The original parsed document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// The parsed document after regex sanitization.
    pub fn sanitized(&self) -> &Value {
        &self.sanitized
    }

    pub fn type_name(&self) -> Option<&str> {
        self.document.get("typeName").and_then(Value::as_str)
    }

    /// Decode the original document into the typed model.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidJson` if the document doesn't fit the model.
    pub fn resource(&self) -> Result<Resource, LoadError> {
        serde_json::from_value(self.document.clone())
            .map_err(|source| LoadError::InvalidJson { source })
    }

    /// Validate configuration text against this schema.
    ///
    /// # Errors
    ///
    /// Returns `ValidateError::Load` if the text isn't JSON, otherwise as
    /// [`ResourceSchema::validate_configuration`].
    pub fn validate_configuration_document(&self, document: &str) -> Result<(), ValidateError> {
        let configuration = load_json_str(document)?;
        self.validate_configuration(&configuration)
    }

    /// Validate a configuration file against this schema.
    ///
    /// # Errors
    ///
    /// Returns `ValidateError::Load` if the file is missing, unreadable or
    /// not JSON, otherwise as [`ResourceSchema::validate_configuration`].
    pub fn validate_configuration_path(&self, path: &Path) -> Result<(), ValidateError> {
        let document = load_document(path)?;
        self.validate_configuration_document(&document)
    }

    /// Validate a parsed configuration against this schema.
    ///
    /// # Errors
    ///
    /// Returns `ValidateError::InvalidSchema` if the schema can't be compiled,
    /// or `ValidateError::Invalid` listing every violation.
    pub fn validate_configuration(&self, configuration: &Value) -> Result<(), ValidateError> {
        debug!(
            type_name = self.type_name().unwrap_or_default(),
            "validating configuration"
        );
        validate_against_schema(&self.sanitized, configuration)
    }
}

/// Validate a document against a JSON schema.
///
/// Every violation is collected, each with the JSON Pointer of the offending
/// instance location.
pub fn validate_against_schema(schema: &Value, document: &Value) -> Result<(), ValidateError> {
    let validator = jsonschema::validator_for(schema).map_err(|e| ValidateError::InvalidSchema {
        message: e.to_string(),
    })?;

    let errors: Vec<SchemaError> = validator
        .iter_errors(document)
        .map(|e| SchemaError {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        debug!(count = errors.len(), "validation failed");
        Err(ValidateError::Invalid { errors })
    }
}
