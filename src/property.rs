//! Property tree nodes.
//!
//! A [`Property`] mirrors one subschema of a resource schema document. Which
//! fields are meaningful depends on its [`PropertyKind`]; the serialized form
//! uses the document's own keys (`$ref`, `patternProperties`, `allOf`, ...).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::path::PropertyPath;
use crate::pointer::Pointer;

/// Declared JSON type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    Null,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Integer => "integer",
            PropertyType::Number => "number",
            PropertyType::Boolean => "boolean",
            PropertyType::Array => "array",
            PropertyType::Object => "object",
            PropertyType::Null => "null",
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, PropertyType::Array | PropertyType::Object)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node's `type`: either one name or a union such as `["string", "null"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyTypes {
    Single(PropertyType),
    Union(Vec<PropertyType>),
}

impl PropertyTypes {
    /// The type that decides the node's shape: the first non-null member,
    /// or `null` if that is all the union holds.
    pub fn primary(&self) -> Option<PropertyType> {
        match self {
            PropertyTypes::Single(property_type) => Some(*property_type),
            PropertyTypes::Union(types) => types
                .iter()
                .copied()
                .find(|t| *t != PropertyType::Null)
                .or_else(|| types.first().copied()),
        }
    }

    pub fn contains(&self, property_type: PropertyType) -> bool {
        match self {
            PropertyTypes::Single(single) => *single == property_type,
            PropertyTypes::Union(types) => types.contains(&property_type),
        }
    }

    pub fn is_nullable(&self) -> bool {
        self.contains(PropertyType::Null)
    }
}

impl From<PropertyType> for PropertyTypes {
    fn from(property_type: PropertyType) -> Self {
        PropertyTypes::Single(property_type)
    }
}

/// The authoritative shape of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Carries a `$ref` that has not been expanded yet.
    Reference,
    Scalar(PropertyType),
    Array,
    Object,
    /// Expressed only through `allOf` / `anyOf` / `oneOf`.
    Composed,
    /// Declares no shape at all.
    Any,
}

/// Link from a property to an identifying property of another resource type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_path: Option<PropertyPath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

/// One node of the property tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Property {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<Pointer>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyTypes>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "$comment", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Literal default. Survives expansion when set on a referencing node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Value>>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub const_value: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub insertion_order: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Property>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Property>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_properties: Option<BTreeMap<String, Property>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<Property>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<Property>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<Property>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_ref: Option<RelationshipRef>,

    /// Pointer this node's content was expanded from. Not serialized.
    #[serde(skip)]
    pub resolved_from: Option<Pointer>,
}

impl Property {
    /// A node that only points elsewhere.
    pub fn reference(pointer: impl Into<Pointer>) -> Self {
        Self {
            reference: Some(pointer.into()),
            ..Self::default()
        }
    }

    /// A node with just a declared type.
    pub fn typed(property_type: PropertyType) -> Self {
        Self {
            property_type: Some(property_type.into()),
            ..Self::default()
        }
    }

    /// The declared type that decides this node's shape, if any.
    pub fn declared_type(&self) -> Option<PropertyType> {
        self.property_type.as_ref().and_then(PropertyTypes::primary)
    }

    /// Classify the node. A `$ref` always wins, then the declared type,
    /// then whatever structure is present.
    pub fn kind(&self) -> PropertyKind {
        if self.reference.is_some() {
            return PropertyKind::Reference;
        }

        match self.declared_type() {
            Some(PropertyType::Array) => PropertyKind::Array,
            Some(PropertyType::Object) => PropertyKind::Object,
            Some(scalar) => PropertyKind::Scalar(scalar),
            None if self.items.is_some() => PropertyKind::Array,
            None if self.properties.is_some() || self.pattern_properties.is_some() => {
                PropertyKind::Object
            }
            None if self.is_composed() => PropertyKind::Composed,
            None => PropertyKind::Any,
        }
    }

    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }

    /// True if any of `allOf` / `anyOf` / `oneOf` is present.
    pub fn is_composed(&self) -> bool {
        !(self.all_of.is_empty() && self.any_of.is_empty() && self.one_of.is_empty())
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Named child of an object node.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.as_ref().and_then(|props| props.get(name))
    }
}
