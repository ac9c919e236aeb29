//! Namespace schema construction from declarative descriptions.
//!
//! A namespace description is a JSON object of the form:
//!
//! ```json
//! {
//!   "value": {"type": "integer", "minimum": 1, "nullable": true},
//!   "confidence": {"type": "number", "minimum": 0, "maximum": 1},
//!   "dense": false,
//!   "description": "Beat event markers",
//!   "annotator": {"required": ["instrument"], "optional": ["experience"]}
//! }
//! ```
//!
//! Loading is pure: it returns an in-memory [`NamespaceSchema`] and has no
//! effect on any registry. Structurally invalid descriptions (unknown
//! constraint kinds, malformed bounds) fail with
//! [`MirdocError::SchemaParse`].

use std::collections::BTreeMap;

use serde_json::Value;

use super::constraint::{Constraint, Field};
use crate::error::MirdocError;

/// Required/optional annotator metadata fields declared by a namespace.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetadataFields {
    pub required: Vec<String>,
    pub optional: Vec<String>,
    /// Reject undeclared annotator fields as hard errors instead of
    /// warnings.
    pub closed: bool,
}

impl MetadataFields {
    /// True when no fields are declared and the block is open, i.e. the
    /// namespace places no constraints on annotator metadata.
    pub fn is_unconstrained(&self) -> bool {
        self.required.is_empty() && self.optional.is_empty() && !self.closed
    }
}

/// The full schema for one namespace: value/confidence constraints plus
/// packing and metadata declarations.
#[derive(Clone, Debug, PartialEq)]
pub struct NamespaceSchema {
    /// Constraint every observation value must satisfy.
    pub value: Constraint,

    /// Constraint checked against an observation confidence when one is
    /// present. Absent confidence always passes.
    pub confidence: Option<Constraint>,

    /// Whether observations of this namespace are densely sampled
    /// (contiguous frames) rather than sparse events.
    pub dense: bool,

    /// Human-readable description of the namespace.
    pub description: Option<String>,

    /// Annotator metadata field declarations.
    pub annotator_fields: MetadataFields,
}

impl NamespaceSchema {
    /// Parses a declarative namespace description into a schema.
    ///
    /// # Errors
    /// Returns [`MirdocError::SchemaParse`] on any structurally invalid
    /// description; the registry and all other state are untouched.
    pub fn load(description: &Value) -> Result<Self, MirdocError> {
        let block = description
            .as_object()
            .ok_or_else(|| parse_error("namespace description must be an object"))?;

        for key in block.keys() {
            if !matches!(
                key.as_str(),
                "value" | "confidence" | "dense" | "description" | "annotator"
            ) {
                return Err(parse_error(format!("unknown description key '{}'", key)));
            }
        }

        let value = match block.get("value") {
            Some(v) => parse_constraint(v)?,
            None => Constraint::Any,
        };

        let confidence = block.get("confidence").map(parse_constraint).transpose()?;

        let dense = match block.get("dense") {
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                return Err(parse_error(format!("'dense' must be a boolean, got {}", other)))
            }
            None => false,
        };

        let description = match block.get("description") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                return Err(parse_error(format!(
                    "'description' must be a string, got {}",
                    other
                )))
            }
            None => None,
        };

        let annotator_fields = match block.get("annotator") {
            Some(v) => parse_metadata_fields(v)?,
            None => MetadataFields::default(),
        };

        Ok(Self {
            value,
            confidence,
            dense,
            description,
            annotator_fields,
        })
    }
}

fn parse_error(message: impl Into<String>) -> MirdocError {
    MirdocError::SchemaParse(message.into())
}

fn parse_constraint(description: &Value) -> Result<Constraint, MirdocError> {
    let block = description
        .as_object()
        .ok_or_else(|| parse_error(format!("constraint must be an object, got {}", description)))?;

    if let Some(allowed) = block.get("enum") {
        if block.len() != 1 {
            return Err(parse_error("an enum constraint takes no other keys"));
        }
        let items = allowed
            .as_array()
            .ok_or_else(|| parse_error(format!("'enum' must be an array, got {}", allowed)))?;
        if items.is_empty() {
            return Err(parse_error("'enum' must list at least one value"));
        }
        return Ok(Constraint::Enum(items.clone()));
    }

    let kind = block
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| parse_error("constraint must declare a 'type' or an 'enum'"))?;

    match kind {
        "any" => {
            if block.len() != 1 {
                return Err(parse_error("an 'any' constraint takes no other keys"));
            }
            Ok(Constraint::Any)
        }
        "number" | "integer" => parse_number(block, kind == "integer"),
        "object" => parse_object(block),
        other => Err(parse_error(format!("unknown constraint kind '{}'", other))),
    }
}

fn parse_number(
    block: &serde_json::Map<String, Value>,
    integer: bool,
) -> Result<Constraint, MirdocError> {
    for key in block.keys() {
        if !matches!(
            key.as_str(),
            "type" | "minimum" | "maximum" | "exclusiveMinimum" | "exclusiveMaximum" | "nullable"
        ) {
            return Err(parse_error(format!(
                "unknown key '{}' in a number constraint",
                key
            )));
        }
    }

    let bound = |name: &str| -> Result<Option<f64>, MirdocError> {
        match block.get(name) {
            Some(v) => v
                .as_f64()
                .map(Some)
                .ok_or_else(|| parse_error(format!("'{}' must be a number, got {}", name, v))),
            None => Ok(None),
        }
    };
    let flag = |name: &str| -> Result<bool, MirdocError> {
        match block.get(name) {
            Some(Value::Bool(b)) => Ok(*b),
            Some(v) => Err(parse_error(format!("'{}' must be a boolean, got {}", name, v))),
            None => Ok(false),
        }
    };

    let minimum = bound("minimum")?;
    let maximum = bound("maximum")?;

    if let (Some(min), Some(max)) = (minimum, maximum) {
        if min > max {
            return Err(parse_error(format!(
                "minimum {} is greater than maximum {}",
                min, max
            )));
        }
    }

    Ok(Constraint::Number {
        minimum,
        maximum,
        exclusive_minimum: flag("exclusiveMinimum")?,
        exclusive_maximum: flag("exclusiveMaximum")?,
        integer,
        nullable: flag("nullable")?,
    })
}

fn parse_object(block: &serde_json::Map<String, Value>) -> Result<Constraint, MirdocError> {
    for key in block.keys() {
        if !matches!(
            key.as_str(),
            "type" | "properties" | "required" | "additionalProperties"
        ) {
            return Err(parse_error(format!(
                "unknown key '{}' in an object constraint",
                key
            )));
        }
    }

    let properties = block
        .get("properties")
        .ok_or_else(|| parse_error("an object constraint must declare 'properties'"))?
        .as_object()
        .ok_or_else(|| parse_error("'properties' must be an object"))?;

    let required: Vec<String> = match block.get("required") {
        Some(v) => {
            let names = v
                .as_array()
                .ok_or_else(|| parse_error(format!("'required' must be an array, got {}", v)))?;
            names
                .iter()
                .map(|n| {
                    n.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| parse_error(format!("'required' entries must be strings, got {}", n)))
                })
                .collect::<Result<_, _>>()?
        }
        None => Vec::new(),
    };

    for name in &required {
        if !properties.contains_key(name) {
            return Err(parse_error(format!(
                "required field '{}' is not declared in 'properties'",
                name
            )));
        }
    }

    let closed = match block.get("additionalProperties") {
        Some(Value::Bool(b)) => !*b,
        Some(v) => {
            return Err(parse_error(format!(
                "'additionalProperties' must be a boolean, got {}",
                v
            )))
        }
        None => false,
    };

    let mut fields = BTreeMap::new();
    for (name, sub) in properties {
        fields.insert(
            name.clone(),
            Field {
                constraint: parse_constraint(sub)?,
                required: required.iter().any(|r| r == name),
            },
        );
    }

    Ok(Constraint::Object { fields, closed })
}

fn parse_metadata_fields(description: &Value) -> Result<MetadataFields, MirdocError> {
    let block = description
        .as_object()
        .ok_or_else(|| parse_error("'annotator' must be an object"))?;

    for key in block.keys() {
        if !matches!(key.as_str(), "required" | "optional" | "closed") {
            return Err(parse_error(format!(
                "unknown key '{}' in an annotator block",
                key
            )));
        }
    }

    let names = |name: &str| -> Result<Vec<String>, MirdocError> {
        match block.get(name) {
            Some(v) => {
                let items = v
                    .as_array()
                    .ok_or_else(|| parse_error(format!("'{}' must be an array, got {}", name, v)))?;
                items
                    .iter()
                    .map(|n| {
                        n.as_str().map(str::to_string).ok_or_else(|| {
                            parse_error(format!("'{}' entries must be strings, got {}", name, n))
                        })
                    })
                    .collect()
            }
            None => Ok(Vec::new()),
        }
    };

    let closed = match block.get("closed") {
        Some(Value::Bool(b)) => *b,
        Some(v) => return Err(parse_error(format!("'closed' must be a boolean, got {}", v))),
        None => false,
    };

    Ok(MetadataFields {
        required: names("required")?,
        optional: names("optional")?,
        closed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_defaults() {
        let schema = NamespaceSchema::load(&json!({})).unwrap();

        assert_eq!(schema.value, Constraint::Any);
        assert!(schema.confidence.is_none());
        assert!(!schema.dense);
        assert!(schema.annotator_fields.is_unconstrained());
    }

    #[test]
    fn test_load_number_constraint() {
        let schema = NamespaceSchema::load(&json!({
            "value": {"type": "integer", "minimum": 1, "nullable": true},
            "dense": false,
            "description": "Beat markers"
        }))
        .unwrap();

        match schema.value {
            Constraint::Number {
                minimum,
                integer,
                nullable,
                ..
            } => {
                assert_eq!(minimum, Some(1.0));
                assert!(integer);
                assert!(nullable);
            }
            other => panic!("expected a number constraint, got {:?}", other),
        }
        assert_eq!(schema.description.as_deref(), Some("Beat markers"));
    }

    #[test]
    fn test_load_enum_constraint() {
        let schema = NamespaceSchema::load(&json!({
            "value": {"enum": ["major", "minor"]}
        }))
        .unwrap();

        assert_eq!(
            schema.value,
            Constraint::Enum(vec![json!("major"), json!("minor")])
        );
    }

    #[test]
    fn test_load_object_constraint() {
        let schema = NamespaceSchema::load(&json!({
            "value": {
                "type": "object",
                "properties": {
                    "position": {"type": "integer", "minimum": 1},
                    "num_beats": {"type": "integer", "minimum": 1}
                },
                "required": ["position"],
                "additionalProperties": false
            }
        }))
        .unwrap();

        match schema.value {
            Constraint::Object { fields, closed } => {
                assert!(closed);
                assert!(fields["position"].required);
                assert!(!fields["num_beats"].required);
            }
            other => panic!("expected an object constraint, got {:?}", other),
        }
    }

    #[test]
    fn test_load_confidence_constraint() {
        let schema = NamespaceSchema::load(&json!({
            "confidence": {"type": "number", "minimum": 0, "maximum": 1}
        }))
        .unwrap();

        assert!(schema.confidence.is_some());
    }

    #[test]
    fn test_load_annotator_fields() {
        let schema = NamespaceSchema::load(&json!({
            "annotator": {"required": ["instrument"], "optional": ["experience"], "closed": true}
        }))
        .unwrap();

        assert_eq!(schema.annotator_fields.required, vec!["instrument"]);
        assert_eq!(schema.annotator_fields.optional, vec!["experience"]);
        assert!(schema.annotator_fields.closed);
    }

    #[test]
    fn test_unknown_constraint_kind_fails() {
        let err = NamespaceSchema::load(&json!({"value": {"type": "matrix"}})).unwrap_err();
        assert!(matches!(err, MirdocError::SchemaParse(_)));
        assert!(err.to_string().contains("matrix"));
    }

    #[test]
    fn test_malformed_bounds_fail() {
        let err = NamespaceSchema::load(&json!({
            "value": {"type": "number", "minimum": "low"}
        }))
        .unwrap_err();
        assert!(matches!(err, MirdocError::SchemaParse(_)));
    }

    #[test]
    fn test_inverted_bounds_fail() {
        let err = NamespaceSchema::load(&json!({
            "value": {"type": "number", "minimum": 5, "maximum": 1}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("greater than maximum"));
    }

    #[test]
    fn test_required_must_be_declared() {
        let err = NamespaceSchema::load(&json!({
            "value": {
                "type": "object",
                "properties": {"a": {"type": "any"}},
                "required": ["b"]
            }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("'b'"));
    }

    #[test]
    fn test_unknown_description_key_fails() {
        let err = NamespaceSchema::load(&json!({"values": {}})).unwrap_err();
        assert!(err.to_string().contains("values"));
    }

    #[test]
    fn test_empty_enum_fails() {
        let err = NamespaceSchema::load(&json!({"value": {"enum": []}})).unwrap_err();
        assert!(matches!(err, MirdocError::SchemaParse(_)));
    }
}
