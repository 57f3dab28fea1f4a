//! The validation engine and its report.
//!
//! Validation is recomputed on demand, never cached. Fields are evaluated
//! independently — one field's result can never affect another's — and the
//! report is assembled in instance field order regardless of the order in
//! which individual evaluations complete.

use std::sync::Arc;

use futures_util::future::join_all;
use indexmap::IndexMap;
use serde::Serialize;

use formkit_fields::{Coerced, FieldSpec, FieldValue, RawValue};

use crate::instance::FormInstance;

/// Per-field error messages from one validation pass.
///
/// A field absent from the report is valid; overall validity means the
/// report is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    errors: IndexMap<String, Vec<String>>,
}

impl ValidationReport {
    /// True when no field reported any problem.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of fields with at least one problem.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages recorded for one field, if any.
    pub fn field_errors(&self, name: &str) -> Option<&[String]> {
        self.errors.get(name).map(Vec::as_slice)
    }

    /// All entries, in instance field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(name, errors)| (name.as_str(), errors.as_slice()))
    }

    fn record(&mut self, name: String, errors: Vec<String>) {
        if !errors.is_empty() {
            self.errors.insert(name, errors);
        }
    }
}

/// Computes validation reports for form instances.
#[derive(Debug, Default)]
pub struct ValidationEngine;

impl ValidationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Validate every field of the instance and assemble the report.
    ///
    /// Required checks run first, then every declared validator in order
    /// with no short-circuiting; a value that cannot be coerced validates
    /// as absent after recording the coercion problem. Disabled fields are
    /// skipped. The per-field messages are also snapshotted into each
    /// field's `last_errors` for display.
    pub async fn validate(&self, instance: &mut FormInstance) -> ValidationReport {
        let jobs: Vec<_> = instance
            .fields()
            .filter(|(_, state)| !state.spec().disabled)
            .map(|(name, state)| {
                let name = name.to_string();
                let spec = state.spec_arc();
                let raw = state.value().clone();
                async move {
                    let errors = validate_field(&spec, &raw).await;
                    (name, errors)
                }
            })
            .collect();

        // join_all preserves submission order, which is instance field
        // order, so the report is deterministic.
        let results = join_all(jobs).await;

        let mut report = ValidationReport::default();
        for state in instance.fields_mut().values_mut() {
            state.set_last_errors(Vec::new());
        }
        for (name, errors) in results {
            if let Some(state) = instance.fields_mut().get_mut(&name) {
                state.set_last_errors(errors.clone());
            }
            report.record(name, errors);
        }
        report
    }
}

/// Evaluate one field: coercion, required check, kind constraints, then
/// every validator in declaration order.
async fn validate_field(spec: &Arc<FieldSpec>, raw: &RawValue) -> Vec<String> {
    let mut errors = Vec::new();
    let typed = match spec.kind.coerce(raw) {
        Coerced::Value(value) => value,
        Coerced::Absent => {
            if spec.required {
                errors.push(required_message());
            }
            FieldValue::Absent
        }
        Coerced::Invalid(message) => {
            if spec.required {
                errors.push(required_message());
            }
            errors.push(message);
            FieldValue::Absent
        }
    };

    errors.extend(spec.kind.constraint_errors(&typed));
    for validator in &spec.validators {
        errors.extend(validator.validate(&typed).await);
    }
    errors
}

fn required_message() -> String {
    "this field is required".to_string()
}
