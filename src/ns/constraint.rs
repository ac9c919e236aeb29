//! The value-constraint grammar for namespace schemas.
//!
//! A [`Constraint`] is a recursive tree describing what observation values
//! (and confidences) a namespace accepts: anything, an enumerated set, a
//! bounded number, or a structured object whose fields are themselves
//! constrained. Checking a value against a constraint appends issues to a
//! [`ValidationReport`](crate::validation::ValidationReport) and never
//! returns early, so every violation in a nested value is reported.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::validation::{IssueCode, ValidationIssue, ValidationReport};

/// A constraint on a single JSON-compatible value.
#[derive(Clone, Debug, PartialEq)]
pub enum Constraint {
    /// Any JSON-compatible value passes, including null.
    Any,

    /// Membership in a fixed set, checked by exact equality.
    Enum(Vec<Value>),

    /// A number with optional inclusive-by-default bounds.
    Number {
        minimum: Option<f64>,
        maximum: Option<f64>,
        /// Treat `minimum` as an exclusive bound.
        exclusive_minimum: bool,
        /// Treat `maximum` as an exclusive bound.
        exclusive_maximum: bool,
        /// Additionally require an integral value.
        integer: bool,
        /// Also accept null in place of a number.
        nullable: bool,
    },

    /// A structured object with named, recursively constrained fields.
    Object {
        fields: BTreeMap<String, Field>,
        /// Reject fields not declared in `fields` as hard errors.
        /// Open objects report them as warnings instead.
        closed: bool,
    },
}

/// One named field of an [`Constraint::Object`].
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub constraint: Constraint,
    pub required: bool,
}

impl Constraint {
    /// Checks `value` against this constraint, appending one issue per
    /// violation under the given field path.
    pub fn check(&self, value: &Value, path: &str, report: &mut ValidationReport) {
        self.check_with_code(value, path, IssueCode::ValueMismatch, report);
    }

    /// Like [`check`](Self::check), but leaf mismatches are reported under
    /// `code` (the engine uses this to distinguish value and confidence
    /// violations).
    pub(crate) fn check_with_code(
        &self,
        value: &Value,
        path: &str,
        code: IssueCode,
        report: &mut ValidationReport,
    ) {
        match self {
            Constraint::Any => {}

            Constraint::Enum(allowed) => {
                if !allowed.contains(value) {
                    report.add(ValidationIssue::error(
                        code,
                        path,
                        format!("expected {}, got {}", self, value),
                    ));
                }
            }

            Constraint::Number {
                minimum,
                maximum,
                exclusive_minimum,
                exclusive_maximum,
                integer,
                nullable,
            } => {
                if value.is_null() && *nullable {
                    return;
                }

                let number = match value.as_f64() {
                    Some(n) => n,
                    None => {
                        report.add(ValidationIssue::error(
                            code,
                            path,
                            format!("expected {}, got {}", self, value),
                        ));
                        return;
                    }
                };

                if *integer && number.fract() != 0.0 {
                    report.add(ValidationIssue::error(
                        code,
                        path,
                        format!("expected {}, got {}", self, value),
                    ));
                }

                let below = match minimum {
                    Some(min) if *exclusive_minimum => number <= *min,
                    Some(min) => number < *min,
                    None => false,
                };
                let above = match maximum {
                    Some(max) if *exclusive_maximum => number >= *max,
                    Some(max) => number > *max,
                    None => false,
                };
                if below || above {
                    report.add(ValidationIssue::error(
                        code,
                        path,
                        format!("expected {}, got {}", self, value),
                    ));
                }
            }

            Constraint::Object { fields, closed } => {
                let object = match value.as_object() {
                    Some(o) => o,
                    None => {
                        report.add(ValidationIssue::error(
                            code,
                            path,
                            format!("expected {}, got {}", self, value),
                        ));
                        return;
                    }
                };

                for (name, field) in fields {
                    let field_path = format!("{}.{}", path, name);
                    match object.get(name) {
                        Some(present) => {
                            field
                                .constraint
                                .check_with_code(present, &field_path, code, report);
                        }
                        None if field.required => {
                            report.add(ValidationIssue::error(
                                IssueCode::MissingField,
                                field_path,
                                format!("required field '{}' is missing", name),
                            ));
                        }
                        None => {}
                    }
                }

                for name in object.keys() {
                    if !fields.contains_key(name) {
                        let field_path = format!("{}.{}", path, name);
                        let message = format!("field '{}' is not declared in the schema", name);
                        if *closed {
                            report.add(ValidationIssue::error(
                                IssueCode::UnexpectedField,
                                field_path,
                                message,
                            ));
                        } else {
                            report.add(ValidationIssue::warning(
                                IssueCode::UnexpectedField,
                                field_path,
                                message,
                            ));
                        }
                    }
                }
            }
        }
    }
}

impl fmt::Display for Constraint {
    /// Renders a short expectation string for issue messages,
    /// e.g. `integer >= 1` or `one of [1,2,4]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Any => write!(f, "any value"),
            Constraint::Enum(allowed) => {
                if allowed.len() <= 5 {
                    let rendered: Vec<String> = allowed.iter().map(|v| v.to_string()).collect();
                    write!(f, "one of [{}]", rendered.join(", "))
                } else {
                    write!(f, "one of {} permitted values", allowed.len())
                }
            }
            Constraint::Number {
                minimum,
                maximum,
                exclusive_minimum,
                exclusive_maximum,
                integer,
                nullable,
            } => {
                write!(f, "{}", if *integer { "integer" } else { "number" })?;
                if let Some(min) = minimum {
                    write!(f, " {} {}", if *exclusive_minimum { ">" } else { ">=" }, min)?;
                }
                if let Some(max) = maximum {
                    write!(f, " {} {}", if *exclusive_maximum { "<" } else { "<=" }, max)?;
                }
                if *nullable {
                    write!(f, " or null")?;
                }
                Ok(())
            }
            Constraint::Object { fields, .. } => {
                write!(f, "object with {} declared field(s)", fields.len())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(constraint: &Constraint, value: &Value) -> ValidationReport {
        let mut report = ValidationReport::new();
        constraint.check(value, "value", &mut report);
        report
    }

    fn positive_integer() -> Constraint {
        Constraint::Number {
            minimum: Some(1.0),
            maximum: None,
            exclusive_minimum: false,
            exclusive_maximum: false,
            integer: true,
            nullable: false,
        }
    }

    #[test]
    fn test_any_accepts_everything() {
        for value in [json!(null), json!(3), json!("x"), json!({"a": 1}), json!([1])] {
            assert!(check(&Constraint::Any, &value).is_clean());
        }
    }

    #[test]
    fn test_enum_membership() {
        let constraint = Constraint::Enum(vec![json!(1), json!(2), json!(4)]);

        assert!(check(&constraint, &json!(2)).is_clean());

        let report = check(&constraint, &json!(3));
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.issues[0].code, IssueCode::ValueMismatch);
    }

    #[test]
    fn test_number_bounds_inclusive() {
        let constraint = positive_integer();

        assert!(check(&constraint, &json!(1)).is_clean());
        assert_eq!(check(&constraint, &json!(0)).error_count(), 1);
        assert_eq!(check(&constraint, &json!(-1)).error_count(), 1);
    }

    #[test]
    fn test_number_bounds_exclusive() {
        let constraint = Constraint::Number {
            minimum: Some(0.0),
            maximum: Some(1.0),
            exclusive_minimum: true,
            exclusive_maximum: false,
            integer: false,
            nullable: false,
        };

        assert_eq!(check(&constraint, &json!(0.0)).error_count(), 1);
        assert!(check(&constraint, &json!(0.5)).is_clean());
        assert!(check(&constraint, &json!(1.0)).is_clean());
    }

    #[test]
    fn test_integer_rejects_fractional() {
        let constraint = positive_integer();

        assert_eq!(check(&constraint, &json!(1.5)).error_count(), 1);
        // An integral float is still an integer
        assert!(check(&constraint, &json!(2.0)).is_clean());
    }

    #[test]
    fn test_nullable_number() {
        let constraint = Constraint::Number {
            minimum: Some(1.0),
            maximum: None,
            exclusive_minimum: false,
            exclusive_maximum: false,
            integer: true,
            nullable: true,
        };

        assert!(check(&constraint, &json!(null)).is_clean());
        assert_eq!(check(&constraint, &json!("x")).error_count(), 1);
    }

    #[test]
    fn test_number_rejects_non_numbers() {
        let report = check(&positive_integer(), &json!("fast"));
        assert_eq!(report.error_count(), 1);
        assert!(report.issues[0].message.contains("integer >= 1"));
    }

    fn position_object(closed: bool) -> Constraint {
        let mut fields = BTreeMap::new();
        fields.insert(
            "position".to_string(),
            Field {
                constraint: positive_integer(),
                required: true,
            },
        );
        fields.insert(
            "measure".to_string(),
            Field {
                constraint: positive_integer(),
                required: false,
            },
        );
        Constraint::Object { fields, closed }
    }

    #[test]
    fn test_object_recurses_into_fields() {
        let constraint = position_object(false);

        assert!(check(&constraint, &json!({"position": 2})).is_clean());

        let report = check(&constraint, &json!({"position": -3, "measure": 0}));
        assert_eq!(report.error_count(), 2);
        assert_eq!(report.issues[0].path, "value.measure");
        assert_eq!(report.issues[1].path, "value.position");
    }

    #[test]
    fn test_object_missing_required_field() {
        let report = check(&position_object(false), &json!({"measure": 1}));
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.issues[0].code, IssueCode::MissingField);
        assert_eq!(report.issues[0].path, "value.position");
    }

    #[test]
    fn test_open_object_warns_on_unknown_field() {
        let report = check(&position_object(false), &json!({"position": 1, "extra": true}));
        assert_eq!(report.error_count(), 0);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.issues[0].code, IssueCode::UnexpectedField);
    }

    #[test]
    fn test_closed_object_rejects_unknown_field() {
        let report = check(&position_object(true), &json!({"position": 1, "extra": true}));
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 0);
        assert_eq!(report.issues[0].code, IssueCode::UnexpectedField);
    }

    #[test]
    fn test_object_rejects_non_objects() {
        let report = check(&position_object(false), &json!([1, 2]));
        assert_eq!(report.error_count(), 1);
    }

    #[test]
    fn test_check_accumulates_all_violations() {
        let constraint = position_object(true);
        let report = check(&constraint, &json!({"measure": -1, "extra": 0}));

        // missing position, bad measure, undeclared extra
        assert_eq!(report.error_count(), 3);
    }
}
