//! Core document model for music annotation data.
//!
//! This module defines the object graph a single annotated recording is
//! packaged into: a [`Document`] owns one [`FileMetadata`] and one
//! [`AnnotationArray`]; each [`Annotation`] owns an ordered sequence of
//! [`Observation`]s plus provenance metadata. The graph is deliberately
//! permissive at construction time so that validation can report problems
//! instead of panicking during parsing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::sandbox::Sandbox;
use crate::error::MirdocError;

/// A single timed annotation event: time, duration, value, confidence.
///
/// Times and durations are in seconds. The value is typed by the owning
/// annotation's namespace and checked during validation, not here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Event time in seconds.
    pub time: f64,

    /// Event duration in seconds; zero for instantaneous events.
    pub duration: f64,

    /// The annotated value, constrained by the owning namespace.
    #[serde(default)]
    pub value: Value,

    /// Optional confidence in the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Observation {
    /// Creates a new observation with no confidence.
    pub fn new(time: f64, duration: f64, value: impl Into<Value>) -> Self {
        Self {
            time,
            duration,
            value: value.into(),
            confidence: None,
        }
    }

    /// Adds a confidence score to the observation.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// The end time of the observation, `time + duration`.
    pub fn end(&self) -> f64 {
        self.time + self.duration
    }
}

/// The person of correspondence for an annotation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Curator {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
}

impl Curator {
    /// Creates a new curator.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// True if both fields are empty.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty()
    }
}

/// Provenance metadata for one annotation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationMetadata {
    /// Curation contact for this annotation.
    #[serde(default, skip_serializing_if = "Curator::is_empty")]
    pub curator: Curator,

    /// Version of this annotation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,

    /// Corpus this annotation belongs to.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub corpus: String,

    /// Free-form information about the annotator (experience, principal
    /// instrument, ...). Namespaces may declare required fields here.
    #[serde(default, skip_serializing_if = "Sandbox::is_empty")]
    pub annotator: Sandbox,

    /// Tools used to create the annotation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub annotation_tools: String,

    /// Rules provided to the annotator.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub annotation_rules: String,

    /// How the integrity of the data was checked.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub validation: String,

    /// Where the data originated, e.g. "Manual Annotation".
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data_source: String,
}

impl AnnotationMetadata {
    /// True if every field is empty.
    pub fn is_empty(&self) -> bool {
        self.curator.is_empty()
            && self.version.is_empty()
            && self.corpus.is_empty()
            && self.annotator.is_empty()
            && self.annotation_tools.is_empty()
            && self.annotation_rules.is_empty()
            && self.validation.is_empty()
            && self.data_source.is_empty()
    }
}

/// One full set of observations of a single namespace, plus provenance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Identifier of the namespace this annotation conforms to. Resolution
    /// against a registry happens at validation time; an unknown namespace
    /// is a validation failure, not a construction failure.
    pub namespace: String,

    /// Start offset of the annotated region, in seconds.
    #[serde(default)]
    pub time: f64,

    /// Duration of the annotated region, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// The observations, in insertion order. Order is not required to be
    /// time-sorted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<Observation>,

    /// Provenance metadata.
    #[serde(default, skip_serializing_if = "AnnotationMetadata::is_empty")]
    pub annotation_metadata: AnnotationMetadata,

    /// Free-form scratch data.
    #[serde(default, skip_serializing_if = "Sandbox::is_empty")]
    pub sandbox: Sandbox,
}

impl Annotation {
    /// Creates an empty annotation of the given namespace.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            time: 0.0,
            duration: None,
            data: Vec::new(),
            annotation_metadata: AnnotationMetadata::default(),
            sandbox: Sandbox::new(),
        }
    }

    /// Sets the provenance metadata.
    pub fn with_metadata(mut self, metadata: AnnotationMetadata) -> Self {
        self.annotation_metadata = metadata;
        self
    }

    /// Sets the annotated region.
    pub fn with_region(mut self, time: f64, duration: f64) -> Self {
        self.time = time;
        self.duration = Some(duration);
        self
    }

    /// Appends one observation to the end of the sequence.
    ///
    /// No sorting is performed and duplicate times are not rejected.
    pub fn append(
        &mut self,
        time: f64,
        duration: f64,
        value: impl Into<Value>,
        confidence: Option<f64>,
    ) {
        self.data.push(Observation {
            time,
            duration,
            value: value.into(),
            confidence,
        });
    }

    /// The number of observations.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the annotation holds no observations.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Extracts observation data as `(intervals, values)` sequences for
    /// hand-off to evaluation tooling.
    ///
    /// `intervals[i] = [time, time + duration]` of observation `i`; the
    /// values are borrowed in the same order.
    pub fn to_interval_values(&self) -> (Vec<[f64; 2]>, Vec<&Value>) {
        let intervals = self.data.iter().map(|o| [o.time, o.end()]).collect();
        let values = self.data.iter().map(|o| &o.value).collect();
        (intervals, values)
    }

    /// Returns a copy of this annotation restricted to `[start, end]`.
    ///
    /// Observations whose span intersects the range are kept and clipped
    /// to it; everything else is dropped. The applied range is recorded in
    /// the sandbox under `"trim"`.
    ///
    /// # Errors
    /// Returns [`MirdocError::InvalidRange`] when `start` is negative or
    /// not less than `end`.
    pub fn trim(&self, start: f64, end: f64) -> Result<Annotation, MirdocError> {
        if !start.is_finite() || !end.is_finite() || start < 0.0 || start >= end {
            return Err(MirdocError::InvalidRange { start, end });
        }

        let data = self
            .data
            .iter()
            .filter(|o| o.time <= end && o.end() >= start)
            .map(|o| {
                let time = o.time.max(start);
                Observation {
                    time,
                    duration: o.end().min(end) - time,
                    value: o.value.clone(),
                    confidence: o.confidence,
                }
            })
            .collect();

        let mut trimmed = Annotation {
            namespace: self.namespace.clone(),
            time: start,
            duration: Some(end - start),
            data,
            annotation_metadata: self.annotation_metadata.clone(),
            sandbox: self.sandbox.clone(),
        };

        let record = serde_json::json!({"start": start, "end": end});
        match trimmed.sandbox.0.get_mut("trim") {
            Some(Value::Array(ranges)) => ranges.push(record),
            _ => trimmed.sandbox.insert("trim", Value::Array(vec![record])),
        }

        Ok(trimmed)
    }
}

/// An insertion-ordered container of annotations for a single file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationArray(pub Vec<Annotation>);

impl AnnotationArray {
    /// Creates an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an annotation.
    pub fn push(&mut self, annotation: Annotation) {
        self.0.push(annotation);
    }

    /// Appends every annotation from `other`.
    pub fn extend(&mut self, other: impl IntoIterator<Item = Annotation>) {
        self.0.extend(other);
    }

    /// The number of annotations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the array holds no annotations.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the annotations in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
        self.0.iter()
    }

    /// Iterates mutably over the annotations.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Annotation> {
        self.0.iter_mut()
    }

    /// Returns the annotations whose namespace equals `namespace`, in
    /// order. The result borrows from this array; nothing is copied.
    pub fn filter_namespace(&self, namespace: &str) -> Vec<&Annotation> {
        self.search(|a| a.namespace == namespace)
    }

    /// Returns the annotations matching a predicate, in order.
    pub fn search<F>(&self, predicate: F) -> Vec<&Annotation>
    where
        F: Fn(&Annotation) -> bool,
    {
        self.0.iter().filter(|a| predicate(a)).collect()
    }
}

impl std::ops::Index<usize> for AnnotationArray {
    type Output = Annotation;

    fn index(&self, index: usize) -> &Annotation {
        &self.0[index]
    }
}

impl IntoIterator for AnnotationArray {
    type Item = Annotation;
    type IntoIter = std::vec::IntoIter<Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a AnnotationArray {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Annotation> for AnnotationArray {
    fn from_iter<I: IntoIterator<Item = Annotation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Metadata for the annotated audio file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Name of the recording.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// Name of the artist / musician.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub artist: String,

    /// Name of the release.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub release: String,

    /// Duration of the file in seconds. When set, validation requires it
    /// to cover the end time of every observation in the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// External identifier schemes (e.g. musicbrainz ids).
    #[serde(default, skip_serializing_if = "Sandbox::is_empty")]
    pub identifiers: Sandbox,
}

/// Strategy for resolving file-metadata conflicts when merging documents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Refuse the merge on differing metadata.
    #[default]
    Fail,
    /// Take the other document's metadata.
    Overwrite,
    /// Keep this document's metadata.
    Ignore,
}

/// One file's complete annotated package: file metadata plus all its
/// annotations. The top-level unit of exchange.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Metadata for the annotated file.
    #[serde(default)]
    pub file_metadata: FileMetadata,

    /// All annotations for the file.
    #[serde(default, skip_serializing_if = "AnnotationArray::is_empty")]
    pub annotations: AnnotationArray,

    /// Unconstrained document-level scratch data.
    #[serde(default, skip_serializing_if = "Sandbox::is_empty")]
    pub sandbox: Sandbox,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an annotation.
    pub fn push(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// Returns the annotations whose namespace equals `namespace`.
    pub fn filter_namespace(&self, namespace: &str) -> Vec<&Annotation> {
        self.annotations.filter_namespace(namespace)
    }

    /// Returns the annotations matching a predicate.
    pub fn search<F>(&self, predicate: F) -> Vec<&Annotation>
    where
        F: Fn(&Annotation) -> bool,
    {
        self.annotations.search(predicate)
    }

    /// Adds the contents of another document to this one.
    ///
    /// # Errors
    /// Returns [`MirdocError::MetadataConflict`] when the file metadata
    /// differs and `policy` is [`ConflictPolicy::Fail`].
    pub fn merge(&mut self, other: Document, policy: ConflictPolicy) -> Result<(), MirdocError> {
        let Document {
            file_metadata,
            annotations,
            sandbox,
        } = other;

        if self.file_metadata != file_metadata {
            match policy {
                ConflictPolicy::Fail => return Err(MirdocError::MetadataConflict),
                ConflictPolicy::Overwrite => self.file_metadata = file_metadata,
                ConflictPolicy::Ignore => {}
            }
        }

        self.annotations.extend(annotations);
        self.sandbox.update(&sandbox);
        Ok(())
    }

    /// Returns a copy of this document with every annotation trimmed to
    /// `[start, end]`.
    ///
    /// # Errors
    /// Returns [`MirdocError::InvalidRange`] when `start` is negative or
    /// not less than `end`.
    pub fn trim(&self, start: f64, end: f64) -> Result<Document, MirdocError> {
        let annotations = self
            .annotations
            .iter()
            .map(|a| a.trim(start, end))
            .collect::<Result<_, _>>()?;

        Ok(Document {
            file_metadata: self.file_metadata.clone(),
            annotations,
            sandbox: self.sandbox.clone(),
        })
    }
}
