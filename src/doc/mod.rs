//! The annotation document model.
//!
//! This module defines the object graph for one annotated recording and
//! its codecs. A [`Document`] owns file metadata plus an ordered
//! collection of [`Annotation`]s; each annotation owns its
//! [`Observation`]s and provenance metadata, and declares the namespace
//! its values conform to.
//!
//! # Design Principles
//!
//! 1. **Permissive construction**: the graph can represent "invalid" data
//!    (negative times, values of the wrong shape) so that validation can
//!    report issues rather than panic during parsing.
//!
//! 2. **Insertion order**: observations and annotations keep the order
//!    they were added in; nothing is sorted behind the caller's back.
//!
//! 3. **Namespace by identifier**: annotations reference their schema by
//!    string id, resolved against a registry only at validation time.
//!
//! # Example
//!
//! ```
//! use mirdoc::doc::{Annotation, Document};
//!
//! let mut beats = Annotation::new("beat");
//! beats.append(0.5, 0.0, 1, None);
//! beats.append(1.0, 0.0, 2, None);
//!
//! let mut doc = Document::new();
//! doc.file_metadata.title = "Example".into();
//! doc.push(beats);
//!
//! assert_eq!(doc.filter_namespace("beat").len(), 1);
//! ```

pub mod io_json;
pub mod io_lab;
mod model;
mod sandbox;

// Re-export core types for convenient access
pub use model::{
    Annotation, AnnotationArray, AnnotationMetadata, ConflictPolicy, Curator, Document,
    FileMetadata, Observation,
};
pub use sandbox::Sandbox;
