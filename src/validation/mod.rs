//! Namespace-driven validation of annotations and documents.
//!
//! Validation checks data against the schema of its declared namespace:
//! - Timing sanity (non-negative, finite times and durations)
//! - Observation values against the namespace value constraint
//! - Observation confidences against the confidence constraint
//! - Annotator metadata against the namespace's field declarations
//! - File duration coverage of every observation in the document
//!
//! Every check appends to a [`ValidationReport`] and none short-circuits,
//! so one run always enumerates every violation in the input. Domain-level
//! invalidity is never an `Err`; only programming errors (malformed
//! schemas, registry misuse) surface as
//! [`MirdocError`](crate::error::MirdocError) elsewhere.

mod report;

pub use report::{IssueCode, Severity, ValidationIssue, ValidationReport};

use serde_json::Value;

use crate::doc::{Annotation, Document};
use crate::ns::{NamespaceRegistry, NamespaceSchema};

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, treat warnings as errors when deciding overall success.
    /// The set of recorded issues is identical either way.
    pub strict: bool,
}

/// Validates one annotation against its declared namespace.
///
/// Resolution failure produces exactly one
/// [`IssueCode::UnknownNamespace`] error and no per-observation checks.
/// The annotation is never mutated; validating the same annotation twice
/// yields identical reports.
pub fn validate_annotation(
    annotation: &Annotation,
    registry: &NamespaceRegistry,
    _opts: &ValidateOptions,
) -> ValidationReport {
    let mut report = ValidationReport::new();
    check_annotation(annotation, registry, "", &mut report);
    report
}

/// Validates a whole document: file metadata invariants first, then every
/// owned annotation, with issue paths rooted under `annotations[i]` so
/// records from different annotations never collide.
pub fn validate_document(
    document: &Document,
    registry: &NamespaceRegistry,
    _opts: &ValidateOptions,
) -> ValidationReport {
    let mut report = ValidationReport::new();

    check_file_metadata(document, &mut report);

    for (index, annotation) in document.annotations.iter().enumerate() {
        let prefix = format!("annotations[{}].", index);
        check_annotation(annotation, registry, &prefix, &mut report);
    }

    report
}

/// Checks the file-metadata invariants, including duration coverage of
/// every observation end time.
fn check_file_metadata(document: &Document, report: &mut ValidationReport) {
    let duration = match document.file_metadata.duration {
        Some(d) => d,
        None => return,
    };

    if !duration.is_finite() {
        report.add(ValidationIssue::error(
            IssueCode::NonFiniteDuration,
            "file_metadata.duration",
            format!("file duration must be finite, got {}", duration),
        ));
        return;
    }
    if duration < 0.0 {
        report.add(ValidationIssue::error(
            IssueCode::NegativeDuration,
            "file_metadata.duration",
            format!("file duration must be non-negative, got {}", duration),
        ));
        return;
    }

    for (ann_index, annotation) in document.annotations.iter().enumerate() {
        for (obs_index, obs) in annotation.data.iter().enumerate() {
            if obs.end().is_finite() && obs.end() > duration {
                report.add(ValidationIssue::error(
                    IssueCode::DurationExceedsFile,
                    format!("annotations[{}].data[{}]", ann_index, obs_index),
                    format!(
                        "observation ends at {}s but the file duration is {}s",
                        obs.end(),
                        duration
                    ),
                ));
            }
        }
    }
}

fn check_annotation(
    annotation: &Annotation,
    registry: &NamespaceRegistry,
    prefix: &str,
    report: &mut ValidationReport,
) {
    let schema = match registry.get(&annotation.namespace) {
        Some(schema) => schema,
        None => {
            report.add(ValidationIssue::error(
                IssueCode::UnknownNamespace,
                format!("{}namespace", prefix),
                format!("namespace '{}' is not registered", annotation.namespace),
            ));
            return;
        }
    };

    check_time_field(annotation.time, &format!("{}time", prefix), report);
    if let Some(duration) = annotation.duration {
        check_duration_field(duration, &format!("{}duration", prefix), report);
    }

    for (index, obs) in annotation.data.iter().enumerate() {
        let obs_path = format!("{}data[{}]", prefix, index);

        check_time_field(obs.time, &format!("{}.time", obs_path), report);
        check_duration_field(obs.duration, &format!("{}.duration", obs_path), report);

        schema
            .value
            .check(&obs.value, &format!("{}.value", obs_path), report);

        if let Some(confidence) = obs.confidence {
            check_confidence(schema, confidence, &format!("{}.confidence", obs_path), report);
        }
    }

    check_annotator_fields(annotation, schema, prefix, report);
}

fn check_time_field(time: f64, path: &str, report: &mut ValidationReport) {
    if !time.is_finite() {
        report.add(ValidationIssue::error(
            IssueCode::NonFiniteTime,
            path,
            format!("time must be finite, got {}", time),
        ));
    } else if time < 0.0 {
        report.add(ValidationIssue::error(
            IssueCode::NegativeTime,
            path,
            format!("time must be non-negative, got {}", time),
        ));
    }
}

fn check_duration_field(duration: f64, path: &str, report: &mut ValidationReport) {
    if !duration.is_finite() {
        report.add(ValidationIssue::error(
            IssueCode::NonFiniteDuration,
            path,
            format!("duration must be finite, got {}", duration),
        ));
    } else if duration < 0.0 {
        report.add(ValidationIssue::error(
            IssueCode::NegativeDuration,
            path,
            format!("duration must be non-negative, got {}", duration),
        ));
    }
}

fn check_confidence(
    schema: &NamespaceSchema,
    confidence: f64,
    path: &str,
    report: &mut ValidationReport,
) {
    if !confidence.is_finite() {
        report.add(ValidationIssue::error(
            IssueCode::ConfidenceMismatch,
            path,
            format!("confidence must be finite, got {}", confidence),
        ));
        return;
    }

    if let Some(constraint) = &schema.confidence {
        constraint.check_with_code(
            &Value::from(confidence),
            path,
            IssueCode::ConfidenceMismatch,
            report,
        );
    }
}

/// Checks annotator metadata against the namespace's field declarations.
///
/// Required fields must be present; fields declared neither required nor
/// optional are warnings on an open declaration and errors on a closed
/// one. A namespace with no declarations places no constraints here.
fn check_annotator_fields(
    annotation: &Annotation,
    schema: &NamespaceSchema,
    prefix: &str,
    report: &mut ValidationReport,
) {
    let declared = &schema.annotator_fields;
    if declared.is_unconstrained() {
        return;
    }

    let annotator = &annotation.annotation_metadata.annotator;

    for name in &declared.required {
        if !annotator.contains_key(name) {
            report.add(ValidationIssue::error(
                IssueCode::MissingMetadataField,
                format!("{}annotation_metadata.annotator.{}", prefix, name),
                format!("required annotator field '{}' is missing", name),
            ));
        }
    }

    for (name, _) in annotator.iter() {
        let known = declared.required.iter().any(|r| r == name)
            || declared.optional.iter().any(|o| o == name);
        if !known {
            let path = format!("{}annotation_metadata.annotator.{}", prefix, name);
            let message = format!("annotator field '{}' is not declared by the namespace", name);
            if declared.closed {
                report.add(ValidationIssue::error(
                    IssueCode::UnexpectedMetadataField,
                    path,
                    message,
                ));
            } else {
                report.add(ValidationIssue::warning(
                    IssueCode::UnexpectedMetadataField,
                    path,
                    message,
                ));
            }
        }
    }
}
