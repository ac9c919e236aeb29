//! Namespace schemas and the registry that catalogs them.
//!
//! A namespace is a named category of annotation ("beat", "chord_harte",
//! "tag_open") with its own value and confidence constraints. Annotations
//! declare a namespace by identifier; validation resolves that identifier
//! against a [`NamespaceRegistry`] and checks every observation against
//! the resolved [`NamespaceSchema`].
//!
//! # Example
//!
//! ```
//! use mirdoc::ns::{NamespaceRegistry, NamespaceSchema};
//!
//! let mut registry = NamespaceRegistry::with_builtins();
//!
//! // Register a custom namespace from a declarative description
//! let schema = NamespaceSchema::load(&serde_json::json!({
//!     "value": {"enum": ["verse", "chorus", "bridge"]},
//!     "description": "Coarse song sections"
//! })).unwrap();
//! registry.register("section_coarse", schema).unwrap();
//!
//! assert!(registry.contains("section_coarse"));
//! ```

mod constraint;
mod registry;
mod schema;

pub use constraint::{Constraint, Field};
pub use registry::NamespaceRegistry;
pub use schema::{MetadataFields, NamespaceSchema};
