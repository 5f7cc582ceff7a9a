//! The top-level resource schema.
//!
//! A [`Resource`] owns two pools of [`Property`] trees: `definitions`, which
//! are only reachable through pointers, and `properties`, the navigable shape
//! of the document. Pointer lists (`primaryIdentifier`,
//! `createOnlyProperties`, ...) name paths into `properties`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ExpandError, ResolveError};
use crate::expand::{expand, expand_with, ExpandOptions};
use crate::path::{contains_path, PropertyPath, PropertyTransform, ARRAY_ITEMS_SEGMENT};
use crate::pointer::{Namespace, Pointer};
use crate::property::Property;

/// Lifecycle operation a handler implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandlerType {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl HandlerType {
    pub const ALL: [HandlerType; 5] = [
        HandlerType::Create,
        HandlerType::Read,
        HandlerType::Update,
        HandlerType::Delete,
        HandlerType::List,
    ];

    /// Returns the key used in the `handlers` map.
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerType::Create => "create",
            HandlerType::Read => "read",
            HandlerType::Update => "update",
            HandlerType::Delete => "delete",
            HandlerType::List => "list",
        }
    }
}

impl fmt::Display for HandlerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation-specific input schema, e.g. the filter accepted by `list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HandlerSchema {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Property>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<Property>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<Property>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<Property>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Handler {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_in_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler_schema: Option<HandlerSchema>,
}

/// How a resource is replaced when an update requires replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementStrategy {
    CreateThenDelete,
    DeleteThenCreate,
}

/// Console link template for a provisioned resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceLink {
    #[serde(rename = "$comment", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_uri: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub mappings: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tagging {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taggable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_on_create: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_updatable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_formation_system_tags: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_property: Option<PropertyPath>,
}

/// The pointer-list fields of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerList {
    PrimaryIdentifier,
    AdditionalIdentifiers,
    ReadOnlyProperties,
    WriteOnlyProperties,
    CreateOnlyProperties,
    ConditionalCreateOnlyProperties,
    DeprecatedProperties,
}

impl PointerList {
    pub const ALL: [PointerList; 7] = [
        PointerList::PrimaryIdentifier,
        PointerList::AdditionalIdentifiers,
        PointerList::ReadOnlyProperties,
        PointerList::WriteOnlyProperties,
        PointerList::CreateOnlyProperties,
        PointerList::ConditionalCreateOnlyProperties,
        PointerList::DeprecatedProperties,
    ];

    /// Returns the wire-format key of this list.
    pub fn as_str(&self) -> &'static str {
        match self {
            PointerList::PrimaryIdentifier => "primaryIdentifier",
            PointerList::AdditionalIdentifiers => "additionalIdentifiers",
            PointerList::ReadOnlyProperties => "readOnlyProperties",
            PointerList::WriteOnlyProperties => "writeOnlyProperties",
            PointerList::CreateOnlyProperties => "createOnlyProperties",
            PointerList::ConditionalCreateOnlyProperties => "conditionalCreateOnlyProperties",
            PointerList::DeprecatedProperties => "deprecatedProperties",
        }
    }
}

impl fmt::Display for PointerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource schema document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Resource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub definitions: BTreeMap<String, Property>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Property>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub primary_identifier: Vec<PropertyPath>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_identifiers: Vec<Vec<PropertyPath>>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub read_only_properties: Vec<PropertyPath>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub write_only_properties: Vec<PropertyPath>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub create_only_properties: Vec<PropertyPath>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditional_create_only_properties: Vec<PropertyPath>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deprecated_properties: Vec<PropertyPath>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub handlers: BTreeMap<String, Handler>,

    #[serde(skip_serializing_if = "PropertyTransform::is_empty")]
    pub property_transform: PropertyTransform,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement_strategy: Option<ReplacementStrategy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_link: Option<ResourceLink>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub taggable: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagging: Option<Tagging>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<Property>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<Property>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<Property>,
}

impl Resource {
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    pub fn handler(&self, handler_type: HandlerType) -> Option<&Handler> {
        self.handlers.get(handler_type.as_str())
    }

    /// The pool a namespace refers to.
    pub fn pool(&self, namespace: Namespace) -> &BTreeMap<String, Property> {
        match namespace {
            Namespace::Definitions => &self.definitions,
            Namespace::Properties => &self.properties,
        }
    }

    /// Follow a node's pointer one step.
    ///
    /// Returns `Ok(false)` if the node has no pointer. Otherwise the node's
    /// content is replaced by a copy of the target and `Ok(true)` is
    /// returned. A `default` set on the node before resolution is kept.
    /// The copied content may itself still be a pointer.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::MalformedPointer` for a badly shaped pointer and
    /// `ResolveError::UnresolvedReference` if the target does not exist.
    pub fn resolve_property(&self, property: &mut Property) -> Result<bool, ResolveError> {
        let Some(pointer) = property.reference.take() else {
            return Ok(false);
        };

        let target = match self.lookup(&pointer) {
            Ok(target) => target,
            Err(e) => {
                property.reference = Some(pointer);
                return Err(e);
            }
        };

        let default = property.default.take();
        let origin = property.resolved_from.take().unwrap_or(pointer);
        *property = target.clone();
        if default.is_some() {
            property.default = default;
        }
        property.resolved_from = Some(origin);

        Ok(true)
    }

    fn lookup(&self, pointer: &Pointer) -> Result<&Property, ResolveError> {
        let namespace = pointer.namespace()?;
        let name = pointer.name()?;

        self.pool(namespace)
            .get(name)
            .ok_or_else(|| ResolveError::UnresolvedReference {
                namespace,
                name: name.to_string(),
            })
    }

    /// Replace every pointer in `definitions` and `properties` with its content.
    ///
    /// # Errors
    ///
    /// See [`expand_with`].
    pub fn expand(&mut self) -> Result<(), ExpandError> {
        expand(self)
    }

    /// Like [`Resource::expand`] with explicit options.
    ///
    /// # Errors
    ///
    /// See [`expand_with`].
    pub fn expand_with(&mut self, options: &ExpandOptions) -> Result<(), ExpandError> {
        expand_with(self, options)
    }

    /// All paths in one pointer list.
    ///
    /// `additionalIdentifiers` is a list of groups; its paths are flattened.
    pub fn pointer_list(&self, list: PointerList) -> Vec<&PropertyPath> {
        let paths: &[PropertyPath] = match list {
            PointerList::PrimaryIdentifier => &self.primary_identifier,
            PointerList::AdditionalIdentifiers => {
                return self.additional_identifiers.iter().flatten().collect();
            }
            PointerList::ReadOnlyProperties => &self.read_only_properties,
            PointerList::WriteOnlyProperties => &self.write_only_properties,
            PointerList::CreateOnlyProperties => &self.create_only_properties,
            PointerList::ConditionalCreateOnlyProperties => {
                &self.conditional_create_only_properties
            }
            PointerList::DeprecatedProperties => &self.deprecated_properties,
        };
        paths.iter().collect()
    }

    /// True if the navigation path is named in the given pointer list.
    pub fn list_contains<S: AsRef<str>>(&self, list: PointerList, path: &[S]) -> bool {
        contains_path(self.pointer_list(list), path)
    }

    /// True if the slash-joined navigation path (e.g. `/Parent/Nested`) is create-only.
    pub fn is_create_only_property_path(&self, path: &str) -> bool {
        self.create_only_properties
            .iter()
            .any(|candidate| candidate.equals_string(path))
    }

    /// Navigate to the property a path names.
    ///
    /// Array nodes are stepped through transparently; a `*` segment may also
    /// address array items explicitly. Pointers are not followed, so this is
    /// meant for expanded resources.
    pub fn property_at(&self, path: &PropertyPath) -> Option<&Property> {
        if path.is_degenerate() {
            return None;
        }

        let mut segments = path.segments().into_iter();
        let mut current = self.properties.get(segments.next()?)?;

        for segment in segments {
            if let Some(items) = current.items.as_deref() {
                if segment == ARRAY_ITEMS_SEGMENT {
                    current = items;
                    continue;
                }
                current = items;
            }
            current = current.property(segment)?;
        }

        Some(current)
    }

    /// Pointer-list entries that do not name a navigable property.
    pub fn dangling_property_paths(&self) -> Vec<(PointerList, &PropertyPath)> {
        PointerList::ALL
            .iter()
            .flat_map(|list| {
                self.pointer_list(*list)
                    .into_iter()
                    .map(move |path| (*list, path))
            })
            .filter(|(_, path)| self.property_at(path).is_none())
            .collect()
    }
}
