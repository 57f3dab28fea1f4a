//! Data binding — the round trip between an instance's internal field
//! values and an external flat data mapping.
//!
//! Outbound, each kind converts to JSON with `Null` as the no-value
//! sentinel. Inbound, unknown keys and un-coercible values are tolerated:
//! logged, skipped, and never surfaced as errors, so partial or
//! forward-compatible data binds cleanly.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::instance::FormInstance;

/// The external flat representation of a form's data, in effective field
/// order.
pub type DataMap = IndexMap<String, Value>;

impl FormInstance {
    /// Produce the external mapping from current field values.
    ///
    /// Every field appears, in effective order; a field with no usable
    /// value maps to `Null` rather than being omitted.
    pub fn data(&self) -> DataMap {
        self.fields()
            .map(|(name, state)| {
                let spec = state.spec();
                (name.to_string(), spec.kind.to_external(state.value()))
            })
            .collect()
    }

    /// Overwrite field values from an external mapping.
    ///
    /// Keys that are not fields of this instance are ignored. A value the
    /// field's kind cannot accept is a tolerated type-coercion failure:
    /// the field keeps its previous value and the problem is logged.
    pub fn set_data(&mut self, data: &DataMap) {
        for (key, value) in data {
            match self.fields_mut().get_mut(key) {
                None => {
                    debug!(field = %key, "skipping unknown data key");
                }
                Some(state) => {
                    let converted = state.spec().kind.to_internal(value);
                    match converted {
                        Some(raw) => state.set_value(raw),
                        None => {
                            warn!(
                                field = %key,
                                kind = state.spec().kind.as_str(),
                                "skipping un-coercible value"
                            );
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FormSchema;
    use formkit_fields::{ChoiceOption, FieldSpec, RawValue};
    use serde_json::json;

    fn person_schema() -> FormSchema {
        FormSchema::builder("person")
            .field(FieldSpec::text("name"))
            .field(FieldSpec::integer("age").required(false))
            .field(FieldSpec::boolean("active"))
            .field(
                FieldSpec::choice(
                    "choice",
                    vec![ChoiceOption::new("blue"), ChoiceOption::new("red")],
                )
                .default_value("blue"),
            )
            .build()
            .unwrap()
    }

    fn data(pairs: &[(&str, Value)]) -> DataMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn round_trip_covers_set_keys() {
        let schema = person_schema();
        let mut instance = FormInstance::of(&schema).build();

        let input = data(&[
            ("name", json!("anna")),
            ("age", json!(34)),
            ("active", json!(false)),
        ]);
        instance.set_data(&input);

        let out = instance.data();
        assert_eq!(out["name"], json!("anna"));
        assert_eq!(out["age"], json!(34));
        assert_eq!(out["active"], json!(false));
        // untouched choice reports its declared default
        assert_eq!(out["choice"], json!("blue"));
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let schema = person_schema();
        let mut instance = FormInstance::of(&schema).build();
        instance.set_data(&data(&[("zzz", json!("ignored")), ("name", json!("bob"))]));
        assert_eq!(instance.data()["name"], json!("bob"));
        assert!(!instance.data().contains_key("zzz"));
    }

    #[test]
    fn uncoercible_value_keeps_previous() {
        let schema = person_schema();
        let mut instance = FormInstance::of(&schema).build();
        instance.set_data(&data(&[("active", json!(true))]));
        // a string cannot bind to a boolean field
        instance.set_data(&data(&[("active", json!("nope"))]));
        assert_eq!(instance.raw_value("active"), Some(&RawValue::Bool(true)));
    }

    #[test]
    fn integer_with_no_value_reports_null() {
        let schema = person_schema();
        let instance = FormInstance::of(&schema).build();
        assert_eq!(instance.data()["age"], Value::Null);
    }

    #[test]
    fn raw_garbage_in_integer_reports_null_not_error() {
        let schema = person_schema();
        let mut instance = FormInstance::of(&schema).build();
        instance.set_raw_value("age", RawValue::Text("abc".into()));
        assert_eq!(instance.data()["age"], Value::Null);
    }

    #[test]
    fn data_follows_effective_field_order() {
        let schema = person_schema();
        let instance = FormInstance::of(&schema)
            .field_order(["age", "active"])
            .build();
        let out = instance.data();
        let keys: Vec<&String> = out.keys().collect();
        assert_eq!(keys, vec!["age", "active", "name", "choice"]);
    }

    #[test]
    fn initial_data_binds_through_builder() {
        let schema = person_schema();
        let instance = FormInstance::of(&schema)
            .initial_data(data(&[
                ("name", json!("anna")),
                ("age", json!(100)),
                ("active", json!(true)),
                ("choice", json!("blue")),
            ]))
            .build();
        let out = instance.data();
        assert_eq!(out["name"], json!("anna"));
        assert_eq!(out["age"], json!(100));
        assert_eq!(out["active"], json!(true));
        assert_eq!(out["choice"], json!("blue"));
    }
}
