//! Restricted internal `$ref` pointers.
//!
//! A resource schema only points inside itself, and only at two places:
//! `/definitions/<name>` and `/properties/<name>`. A leading `#` anchor is
//! accepted. Anything else is malformed and fails on access rather than
//! resolving to an empty name.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// Optional anchor marker preceding a pointer.
pub const POINTER_ANCHOR: &str = "#";

/// Path separator inside a pointer.
pub const POINTER_SEPARATOR: char = '/';

/// Pool a pointer refers into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Definitions,
    Properties,
}

impl Namespace {
    /// Returns the wire-format segment for this namespace.
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Definitions => "definitions",
            Namespace::Properties => "properties",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "definitions" => Some(Namespace::Definitions),
            "properties" => Some(Namespace::Properties),
            _ => None,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unparsed `$ref` value.
///
/// Parsing happens on access so that a malformed pointer in a document still
/// deserializes, and only fails when something tries to follow it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pointer(String);

impl Pointer {
    pub fn new(pointer: impl Into<String>) -> Self {
        Self(pointer.into())
    }

    /// Pointer to a named definition.
    pub fn definition(name: &str) -> Self {
        Self(format!("#/{}/{}", Namespace::Definitions, name))
    }

    /// Pointer to a named top-level property.
    pub fn property(name: &str) -> Self {
        Self(format!("#/{}/{}", Namespace::Properties, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The pool this pointer refers into.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::MalformedPointer` unless the pointer has the
    /// shape `/definitions/<name>` or `/properties/<name>`.
    pub fn namespace(&self) -> Result<Namespace, ResolveError> {
        self.split().map(|(namespace, _)| namespace)
    }

    /// The referenced name.
    ///
    /// # Errors
    ///
    /// Same failure mode as [`Pointer::namespace`].
    pub fn name(&self) -> Result<&str, ResolveError> {
        self.split().map(|(_, name)| name)
    }

    /// The anchored form, so `/definitions/Tag` and `#/definitions/Tag`
    /// compare equal.
    ///
    /// # Errors
    ///
    /// Same failure mode as [`Pointer::namespace`].
    pub fn canonical(&self) -> Result<Pointer, ResolveError> {
        let (namespace, name) = self.split()?;
        Ok(match namespace {
            Namespace::Definitions => Pointer::definition(name),
            Namespace::Properties => Pointer::property(name),
        })
    }

    fn split(&self) -> Result<(Namespace, &str), ResolveError> {
        let trimmed = self
            .0
            .strip_prefix(POINTER_ANCHOR)
            .unwrap_or(self.0.as_str());
        let parts: Vec<&str> = trimmed.split(POINTER_SEPARATOR).collect();

        match parts.as_slice() {
            ["", namespace, name] if !name.is_empty() => Namespace::parse(namespace)
                .map(|namespace| (namespace, *name))
                .ok_or_else(|| self.malformed()),
            _ => Err(self.malformed()),
        }
    }

    fn malformed(&self) -> ResolveError {
        ResolveError::MalformedPointer {
            pointer: self.0.clone(),
        }
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Pointer {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_anchored_forms() {
        for (raw, namespace) in [
            ("/definitions/test", Namespace::Definitions),
            ("/properties/test", Namespace::Properties),
            ("#/definitions/test", Namespace::Definitions),
            ("#/properties/test", Namespace::Properties),
        ] {
            let pointer = Pointer::new(raw);
            assert_eq!(pointer.namespace().unwrap(), namespace, "{raw}");
            assert_eq!(pointer.name().unwrap(), "test", "{raw}");
        }
    }

    #[test]
    fn malformed_shapes_fail_both_accessors() {
        for raw in ["", "/", "/definitions", "/properties", "#", "#/"] {
            let pointer = Pointer::new(raw);
            assert!(
                matches!(pointer.namespace(), Err(ResolveError::MalformedPointer { .. })),
                "namespace of {raw:?}"
            );
            assert!(
                matches!(pointer.name(), Err(ResolveError::MalformedPointer { .. })),
                "name of {raw:?}"
            );
        }
    }

    #[test]
    fn too_many_segments_is_malformed() {
        let pointer = Pointer::new("/definitions/Tag/properties/Key");
        assert!(pointer.name().is_err());
    }

    #[test]
    fn unknown_namespace_is_malformed() {
        let pointer = Pointer::new("#/$defs/Tag");
        assert_eq!(
            pointer.namespace(),
            Err(ResolveError::MalformedPointer {
                pointer: "#/$defs/Tag".into()
            })
        );
    }

    #[test]
    fn external_file_pointer_is_malformed() {
        let pointer = Pointer::new("resource-schema.json#/properties/Arn");
        assert!(pointer.namespace().is_err());
    }

    #[test]
    fn constructors_round_trip() {
        assert_eq!(Pointer::definition("Tag").as_str(), "#/definitions/Tag");
        assert_eq!(Pointer::property("Arn").name().unwrap(), "Arn");
        assert_eq!(
            Pointer::property("Arn").namespace().unwrap(),
            Namespace::Properties
        );
    }

    #[test]
    fn canonical_ignores_anchor() {
        assert_eq!(
            Pointer::new("/definitions/Tag").canonical().unwrap(),
            Pointer::new("#/definitions/Tag").canonical().unwrap()
        );
        assert!(Pointer::new("/definitions").canonical().is_err());
    }

    #[test]
    fn serializes_transparently() {
        let pointer: Pointer = serde_json::from_str(r##""#/definitions/Tag""##).unwrap();
        assert_eq!(pointer.as_str(), "#/definitions/Tag");
        assert_eq!(
            serde_json::to_string(&pointer).unwrap(),
            r##""#/definitions/Tag""##
        );
    }
}
