//! Pointer expansion - replaces every internal `$ref` with the content it names.
//!
//! Both pools are walked in key order, `definitions` first. Each node that
//! carries a pointer is overwritten with a deep copy of its target (keeping a
//! locally set `default`), and the walk continues into `items`, `properties`
//! and `patternProperties` at any depth. Composition branches are only
//! entered when [`ExpandOptions::composed`] is set.
//!
//! The expanded pools are built from the untouched resource and only swapped
//! in once both succeed, so a failure leaves the resource as it was.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::error::{ExpandError, ResolveError};
use crate::pointer::{Namespace, Pointer};
use crate::property::Property;
use crate::resource::Resource;

/// Default limit on property nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options for pointer expansion.
#[derive(Debug, Clone)]
pub struct ExpandOptions {
    /// Deepest property nesting accepted before failing with
    /// `ResolveError::DepthExceeded`.
    pub max_depth: usize,
    /// Also expand inside `allOf` / `anyOf` / `oneOf` branches.
    /// Off by default: callers usually pick a branch before expanding it.
    pub composed: bool,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            composed: false,
        }
    }
}

impl ExpandOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nesting limit.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set whether composition branches are expanded.
    pub fn composed(mut self, composed: bool) -> Self {
        self.composed = composed;
        self
    }
}

/// Expand a resource with default options.
///
/// # Errors
///
/// See [`expand_with`].
pub fn expand(resource: &mut Resource) -> Result<(), ExpandError> {
    expand_with(resource, &ExpandOptions::default())
}

/// Expand every pointer in `resource.definitions` and `resource.properties`.
///
/// Running this on an already expanded resource changes nothing.
///
/// # Errors
///
/// Returns the first failure in pool order, wrapped with the path where it
/// occurred: a malformed pointer, a pointer to a missing entry, a pointer
/// cycle, or nesting deeper than `options.max_depth`.
pub fn expand_with(resource: &mut Resource, options: &ExpandOptions) -> Result<(), ExpandError> {
    debug!(
        type_name = resource.type_name.as_deref().unwrap_or_default(),
        definitions = resource.definitions.len(),
        properties = resource.properties.len(),
        "expanding resource"
    );

    let (definitions, properties) = {
        let expander = Expander {
            resource: &*resource,
            options,
        };
        (
            expander.expand_pool(Namespace::Definitions)?,
            expander.expand_pool(Namespace::Properties)?,
        )
    };

    resource.definitions = definitions;
    resource.properties = properties;
    Ok(())
}

struct Expander<'a> {
    resource: &'a Resource,
    options: &'a ExpandOptions,
}

impl Expander<'_> {
    fn expand_pool(&self, namespace: Namespace) -> Result<BTreeMap<String, Property>, ExpandError> {
        let mut expanded = BTreeMap::new();

        for (name, property) in self.resource.pool(namespace) {
            let path = format!("{}.{}", namespace, name);
            let own = match namespace {
                Namespace::Definitions => Pointer::definition(name),
                Namespace::Properties => Pointer::property(name),
            };

            let mut property = property.clone();
            let mut chain = vec![own];
            self.expand_node(&mut property, &path, &mut chain, 0)?;
            expanded.insert(name.clone(), property);
        }

        debug!(pool = %namespace, entries = expanded.len(), "expanded pool");
        Ok(expanded)
    }

    /// `chain` holds the canonical pointers being resolved above this node.
    fn expand_node(
        &self,
        node: &mut Property,
        path: &str,
        chain: &mut Vec<Pointer>,
        depth: usize,
    ) -> Result<(), ExpandError> {
        if depth > self.options.max_depth {
            return Err(at(
                path,
                ResolveError::DepthExceeded {
                    limit: self.options.max_depth,
                },
            ));
        }

        let entry_len = chain.len();

        while let Some(pointer) = node.reference.clone() {
            let key = pointer.canonical().map_err(|e| at(path, e))?;
            if chain.contains(&key) {
                let mut cycle: Vec<String> = chain.iter().map(ToString::to_string).collect();
                cycle.push(key.to_string());
                return Err(at(path, ResolveError::CyclicReference { chain: cycle }));
            }

            self.resource
                .resolve_property(node)
                .map_err(|e| at(path, e))?;
            trace!(path = path, pointer = %pointer, "resolved pointer");
            chain.push(key);
        }

        let result = self.expand_children(node, path, chain, depth);
        chain.truncate(entry_len);
        result
    }

    fn expand_children(
        &self,
        node: &mut Property,
        path: &str,
        chain: &mut Vec<Pointer>,
        depth: usize,
    ) -> Result<(), ExpandError> {
        if let Some(items) = node.items.as_deref_mut() {
            let child_path = format!("{}[*]", path);
            self.expand_node(items, &child_path, chain, depth + 1)?;
        }

        if let Some(properties) = node.properties.as_mut() {
            for (name, child) in properties.iter_mut() {
                let child_path = format!("{}.{}", path, name);
                self.expand_node(child, &child_path, chain, depth + 1)?;
            }
        }

        if let Some(patterns) = node.pattern_properties.as_mut() {
            for (pattern, child) in patterns.iter_mut() {
                let child_path = format!("{}[{:?}]", path, pattern);
                self.expand_node(child, &child_path, chain, depth + 1)?;
            }
        }

        if self.options.composed {
            let branches = [
                ("allOf", &mut node.all_of),
                ("anyOf", &mut node.any_of),
                ("oneOf", &mut node.one_of),
            ];
            for (keyword, subschemas) in branches {
                for (i, subschema) in subschemas.iter_mut().enumerate() {
                    let child_path = format!("{}.{}[{}]", path, keyword, i);
                    self.expand_node(subschema, &child_path, chain, depth + 1)?;
                }
            }
        }

        Ok(())
    }
}

fn at(path: &str, source: ResolveError) -> ExpandError {
    ExpandError {
        path: path.to_string(),
        source,
    }
}
