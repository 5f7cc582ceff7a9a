//! Resource Schema
//!
//! Typed model of resource schema documents, with expansion of internal
//! `$ref` pointers.
//!
//! A resource schema declares a resource type: its properties, shared
//! definitions, identifier lists and handlers. Property nodes may point at
//! `/definitions/<name>` or `/properties/<name>`. [`expand`] replaces every
//! such pointer with the content it names, so that consumers can walk the
//! tree without ever following a reference.
//!
//! # Example
//!
//! ```
//! use resource_schema::{PropertyType, Resource};
//! use serde_json::json;
//!
//! let mut resource: Resource = serde_json::from_value(json!({
//!     "typeName": "Org::Service::Memo",
//!     "definitions": {
//!         "Tag": {
//!             "type": "object",
//!             "properties": {
//!                 "Key": { "type": "string" },
//!                 "Value": { "type": "string" }
//!             }
//!         }
//!     },
//!     "properties": {
//!         "Tags": {
//!             "type": "array",
//!             "items": { "$ref": "#/definitions/Tag" }
//!         }
//!     },
//!     "primaryIdentifier": ["/properties/Tags"]
//! }))
//! .unwrap();
//!
//! resource.expand().unwrap();
//!
//! let tag = resource.properties["Tags"].items.as_deref().unwrap();
//! assert!(!tag.is_reference());
//! assert_eq!(tag.property("Key").unwrap().declared_type(), Some(PropertyType::String));
//! ```
//!
//! # Pointers
//!
//! | Pointer | Resolves to |
//! |---------|-------------|
//! | `#/definitions/Tag` | `definitions.Tag` |
//! | `/properties/Arn` | `properties.Arn` |
//! | anything else | `MalformedPointer` |
//!
//! A `default` written next to a `$ref` survives expansion; everything else
//! on the referencing node is replaced by the target's content.

mod error;
mod expand;
mod loader;
mod path;
mod pointer;
mod property;
mod resource;
mod sanitize;
mod validator;

pub use error::{ExpandError, LoadError, ResolveError, SchemaError, ValidateError};
pub use expand::{expand, expand_with, ExpandOptions, DEFAULT_MAX_DEPTH};
pub use loader::{load_document, load_json, load_json_str};
pub use path::{contains_path, PropertyPath, PropertyTransform, ARRAY_ITEMS_SEGMENT};
pub use pointer::{Namespace, Pointer, POINTER_ANCHOR, POINTER_SEPARATOR};
pub use property::{Property, PropertyKind, PropertyType, PropertyTypes, RelationshipRef};
pub use resource::{
    Handler, HandlerSchema, HandlerType, PointerList, ReplacementStrategy, Resource, ResourceLink,
    Tagging,
};
pub use sanitize::sanitize;
pub use validator::{validate_against_schema, MetaSchema, ResourceSchema};
