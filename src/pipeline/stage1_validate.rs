use std::fmt;

use serde_json::{Map, Value};

use crate::schema::{FEATURE_COUNT, FeatureVector, RangePolicy, builtin_features};

pub type RawRecord = Map<String, Value>;

/// Pseudo-field used for problems with the request body as a whole.
pub const BODY_FIELD: &str = "body";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldIssue {
    Required,
    NotNumeric,
    OutOfRange,
    NotAnObject,
    Malformed(String),
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldIssue::Required => f.write_str("field required"),
            FieldIssue::NotNumeric => f.write_str("must be numeric"),
            FieldIssue::OutOfRange => f.write_str("value out of expected range"),
            FieldIssue::NotAnObject => f.write_str("must be a JSON object"),
            FieldIssue::Malformed(detail) => write!(f, "malformed JSON: {detail}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub issue: FieldIssue,
}

impl FieldError {
    pub fn new(field: impl Into<String>, issue: FieldIssue) -> Self {
        Self {
            field: field.into(),
            issue,
        }
    }
}

/// Every hard failure found in one pass over the record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation: {}", .errors.len(), summarize(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn body(issue: FieldIssue) -> Self {
        Self {
            errors: vec![FieldError::new(BODY_FIELD, issue)],
        }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.issue))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone)]
pub struct Stage1Output {
    pub features: FeatureVector,
    /// Soft range violations accepted under [`RangePolicy::Warn`].
    pub warnings: Vec<FieldError>,
}

pub fn run_stage1(body: &Value, policy: RangePolicy) -> Result<Stage1Output, ValidationError> {
    match body {
        Value::Object(record) => validate_record(record, policy),
        _ => Err(ValidationError::body(FieldIssue::NotAnObject)),
    }
}

pub fn validate_record(
    record: &RawRecord,
    policy: RangePolicy,
) -> Result<Stage1Output, ValidationError> {
    let mut values = [0.0f64; FEATURE_COUNT];
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for (idx, def) in builtin_features().iter().enumerate() {
        let Some(raw) = record.get(def.name) else {
            errors.push(FieldError::new(def.name, FieldIssue::Required));
            continue;
        };
        let Some(value) = coerce_f64(raw) else {
            errors.push(FieldError::new(def.name, FieldIssue::NotNumeric));
            continue;
        };
        values[idx] = value;

        if def.range.contains(value) {
            continue;
        }
        match policy {
            RangePolicy::Off => {}
            RangePolicy::Warn => {
                warnings.push(FieldError::new(def.name, FieldIssue::OutOfRange));
            }
            RangePolicy::Strict => {
                errors.push(FieldError::new(def.name, FieldIssue::OutOfRange));
            }
        }
    }

    if !errors.is_empty() {
        return Err(ValidationError { errors });
    }

    Ok(Stage1Output {
        features: FeatureVector::new(values),
        warnings,
    })
}

pub fn coerce_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_validate.rs"]
mod tests;
