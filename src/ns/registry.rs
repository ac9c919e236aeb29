//! The namespace registry: a catalog mapping namespace identifiers to
//! their schemas.
//!
//! The registry is an explicit value passed to every validation call rather
//! than hidden process-wide state. The expected lifecycle is "load once,
//! resolve many": build the registry (usually via
//! [`NamespaceRegistry::with_builtins`]), register any custom namespaces,
//! then hand shared references to validation.

use std::collections::BTreeMap;

use serde_json::Value;

use super::schema::NamespaceSchema;
use crate::error::MirdocError;

/// The catalog of standard MIR namespaces, embedded at compile time.
const BUILTIN_CATALOG: &str = include_str!("catalog.json");

/// A catalog of namespace schemas keyed by identifier.
#[derive(Clone, Debug, Default)]
pub struct NamespaceRegistry {
    schemas: BTreeMap<String, NamespaceSchema>,
}

impl NamespaceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry preloaded with the standard MIR namespaces
    /// (`beat`, `chord_harte`, `segment_open`, `tag_open`, ...).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .load_catalog(BUILTIN_CATALOG)
            .expect("builtin namespace catalog is well-formed");
        registry
    }

    /// Registers a schema under `id`.
    ///
    /// # Errors
    /// Returns [`MirdocError::DuplicateNamespace`] and leaves the registry
    /// unchanged if `id` is already present. Use
    /// [`register_force`](Self::register_force) to replace explicitly.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        schema: NamespaceSchema,
    ) -> Result<(), MirdocError> {
        let id = id.into();
        if self.schemas.contains_key(&id) {
            return Err(MirdocError::DuplicateNamespace(id));
        }
        self.schemas.insert(id, schema);
        Ok(())
    }

    /// Registers a schema under `id`, replacing any existing entry.
    pub fn register_force(&mut self, id: impl Into<String>, schema: NamespaceSchema) {
        self.schemas.insert(id.into(), schema);
    }

    /// Resolves a namespace identifier to its schema.
    ///
    /// # Errors
    /// Returns [`MirdocError::UnknownNamespace`] if `id` is not registered.
    pub fn resolve(&self, id: &str) -> Result<&NamespaceSchema, MirdocError> {
        self.schemas
            .get(id)
            .ok_or_else(|| MirdocError::UnknownNamespace(id.to_string()))
    }

    /// Looks up a namespace without the error wrapping of
    /// [`resolve`](Self::resolve).
    pub fn get(&self, id: &str) -> Option<&NamespaceSchema> {
        self.schemas.get(id)
    }

    /// Returns true if `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.schemas.contains_key(id)
    }

    /// Iterates over all registered identifiers in sorted order.
    ///
    /// The iterator is lazy and can be restarted by calling `ids()` again.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.schemas.keys().map(String::as_str)
    }

    /// The number of registered namespaces.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// True if no namespaces are registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Loads a JSON catalog of `{id: description}` pairs, registering each
    /// namespace.
    ///
    /// The whole catalog is parsed before any registration happens, so a
    /// malformed description or a duplicate identifier leaves the registry
    /// unchanged.
    pub fn load_catalog(&mut self, catalog: &str) -> Result<(), MirdocError> {
        let entries: serde_json::Map<String, Value> = serde_json::from_str(catalog)
            .map_err(|e| MirdocError::SchemaParse(format!("catalog is not a JSON object: {}", e)))?;

        let mut parsed = Vec::with_capacity(entries.len());
        for (id, description) in &entries {
            let schema = NamespaceSchema::load(description)
                .map_err(|e| MirdocError::SchemaParse(format!("namespace '{}': {}", id, e)))?;
            if self.schemas.contains_key(id) {
                return Err(MirdocError::DuplicateNamespace(id.clone()));
            }
            parsed.push((id.clone(), schema));
        }

        self.schemas.extend(parsed);
        Ok(())
    }
}
