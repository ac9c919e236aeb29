//! Validation report types for structured error reporting.
//!
//! This module provides rich, structured validation results that can be
//! displayed to users, written to files, or processed programmatically.
//! Checks append to a report and never short-circuit, so a single run
//! always describes every problem in the input.

use std::fmt;

use serde::Serialize;

/// The result of validating an annotation or a whole document.
///
/// Contains all issues found during validation, categorized by severity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// All issues found during validation.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Adds an issue to the report.
    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Returns the number of errors in the report.
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    /// Returns the number of warnings in the report.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    /// Returns true if there are no issues at all.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return writeln!(f, "Validation passed: no issues found");
        }

        writeln!(
            f,
            "Validation completed with {} error(s) and {} warning(s):",
            self.error_count(),
            self.warning_count()
        )?;
        writeln!(f)?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// A single validation issue (error or warning).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// The severity of the issue.
    pub severity: Severity,

    /// A stable code for the issue type.
    pub code: IssueCode,

    /// Field path of the offending element, e.g.
    /// `annotations[1].data[0].value.position`.
    pub path: String,

    /// A human-readable description naming the expected constraint and the
    /// observed value.
    pub message: String,
}

impl ValidationIssue {
    /// Creates a new validation issue.
    pub fn new(
        severity: Severity,
        code: IssueCode,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            code,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new error.
    pub fn error(code: IssueCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, path, message)
    }

    /// Creates a new warning.
    pub fn warning(code: IssueCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, path, message)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(
            f,
            "[{}] {:?} at {}: {}",
            severity, self.code, self.path, self.message
        )
    }
}

/// The severity of a validation issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// A warning that doesn't invalidate the annotation but may indicate
    /// problems.
    Warning,
    /// An error that indicates data not conforming to its namespace schema.
    Error,
}

/// A stable code identifying the type of validation issue.
///
/// These codes can be used for filtering, ignoring specific issues,
/// or programmatic handling of validation results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IssueCode {
    /// An annotation declares a namespace that is not in the registry.
    UnknownNamespace,

    // Timing issues
    /// An observation or annotation has a negative time.
    NegativeTime,
    /// An observation or annotation has a negative duration.
    NegativeDuration,
    /// A time field is NaN or infinite.
    NonFiniteTime,
    /// A duration field is NaN or infinite.
    NonFiniteDuration,
    /// An observation extends past the declared file duration.
    DurationExceedsFile,

    // Constraint issues
    /// An observation value does not satisfy its namespace constraint.
    ValueMismatch,
    /// An observation confidence does not satisfy its namespace constraint.
    ConfidenceMismatch,
    /// A required field of a structured value is missing.
    MissingField,
    /// A field of a structured value is not declared in the schema.
    UnexpectedField,

    // Annotation metadata issues
    /// A metadata field required by the namespace is missing.
    MissingMetadataField,
    /// A metadata field is not declared by the namespace.
    UnexpectedMetadataField,
}
