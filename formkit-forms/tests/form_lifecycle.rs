//! End-to-end lifecycle tests driving the engine the way a rendering layer
//! would: build a schema, bind data, validate, and run the submit/cancel
//! protocol.

use formkit_fields::{validate_fn, ChoiceOption, FieldSpec, FieldValue, NumberRange, RawValue};
use formkit_forms::{
    CancelOutcome, DataMap, FormController, FormEvent, FormInstance, FormSchema, ProtocolState,
    SubmitOutcome, ValidationEngine,
};
use serde_json::{json, Value};

/// The shared demo schema: a palindromic name, an optional bounded even
/// age, an active flag, and a colour choice.
fn demo_schema() -> FormSchema {
    FormSchema::builder("demo")
        .field(
            FieldSpec::text("name")
                .placeholder("Name (palindrome)")
                .validator(validate_fn(|value: &FieldValue| match value {
                    FieldValue::Text(s) if s.chars().eq(s.chars().rev()) => Vec::new(),
                    _ => vec!["must be a palindrome".to_string()],
                })),
        )
        .field(
            FieldSpec::integer("age")
                .required(false)
                .range(Some(0), Some(130))
                .validator(validate_fn(|value: &FieldValue| match value.as_integer() {
                    Some(n) if n % 2 != 0 => vec!["must be an even number".to_string()],
                    _ => Vec::new(),
                })),
        )
        .field(FieldSpec::boolean("active").label("Active?"))
        .field(
            FieldSpec::choice(
                "choice",
                vec![
                    ChoiceOption::labeled("blue", "Blue"),
                    ChoiceOption::labeled("red", "Red"),
                ],
            )
            .label("Selection")
            .required(false),
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

#[tokio::test]
async fn data_injection_round_trips() {
    let my_data = data(&[
        ("name", json!("anna")),
        ("age", json!(100)),
        ("active", json!(true)),
        ("choice", json!("blue")),
    ]);
    let instance = FormInstance::of(&demo_schema())
        .initial_data(my_data.clone())
        .build();

    assert_eq!(instance.data(), my_data);
}

#[tokio::test]
async fn field_order_reorders_but_never_hides() {
    let order = ["age", "active"];
    let instance = FormInstance::of(&demo_schema())
        .field_order(order)
        .initial_data(data(&[("name", json!("anna"))]))
        .build();

    let out = instance.data();
    let keys: Vec<&str> = out.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["age", "active", "name", "choice"]);
}

#[tokio::test]
async fn instances_of_one_schema_are_isolated() {
    let schema = demo_schema();
    let mut a = FormInstance::of(&schema).build();
    let b = FormInstance::of(&schema).build();

    a.set_raw_value("name", RawValue::Text("otto".into()));
    a.set_raw_value("active", RawValue::Bool(true));

    assert_eq!(b.data()["name"], json!(""));
    assert_eq!(b.data()["active"], json!(false));
}

#[tokio::test]
async fn validation_aggregates_across_rules_without_short_circuiting() {
    let schema = demo_schema();
    let mut instance = FormInstance::of(&schema).build();

    // empty required name: required error plus the palindrome message
    let report = ValidationEngine::new().validate(&mut instance).await;
    let name_errors = report.field_errors("name").unwrap();
    assert_eq!(name_errors.len(), 2);
    assert_eq!(name_errors[0], "this field is required");
    assert_eq!(name_errors[1], "must be a palindrome");

    // 1331 against a lone upper-bound rule: exactly one error
    let bounded = FormSchema::builder("bounded")
        .field(
            FieldSpec::integer("age")
                .required(false)
                .validator(NumberRange::at_most(130)),
        )
        .build()
        .unwrap();
    let mut instance = FormInstance::of(&bounded).build();
    instance.set_raw_value("age", RawValue::Text("1331".into()));
    let report = ValidationEngine::new().validate(&mut instance).await;
    assert!(!report.is_valid());
    assert_eq!(
        report.field_errors("age").unwrap(),
        &["must be at most 130".to_string()]
    );
    assert_eq!(report.len(), 1);
}

#[tokio::test]
async fn end_to_end_submit_carries_the_data() {
    let my_data = data(&[
        ("name", json!("anna")),
        ("age", json!(100)),
        ("active", json!(true)),
        ("choice", json!("blue")),
    ]);
    let instance = FormInstance::of(&demo_schema())
        .title("Demo")
        .initial_data(my_data.clone())
        .build();
    let (mut controller, mut events) = FormController::new(instance);

    let report = controller.request_validate().await;
    assert!(report.is_valid());

    assert_eq!(
        controller.notify_submit_intent().await,
        SubmitOutcome::Submitted
    );
    assert_eq!(controller.state(), ProtocolState::Submitted);

    match events.try_recv().unwrap() {
        FormEvent::Submitted { form } => {
            assert_eq!(form, controller.instance().id());
            // the caller fetches the data off the referenced instance
            assert_eq!(controller.instance().data(), my_data);
        }
        other => panic!("expected a submitted event, got {other:?}"),
    }
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn rejected_submit_keeps_entered_values_for_correction() {
    let instance = FormInstance::of(&demo_schema())
        .initial_data(data(&[("name", json!("steve")), ("age", json!(34))]))
        .build();
    let (mut controller, mut events) = FormController::new(instance);

    match controller.notify_submit_intent().await {
        SubmitOutcome::Rejected(report) => {
            assert_eq!(
                report.field_errors("name").unwrap(),
                &["must be a palindrome".to_string()]
            );
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(events.try_recv().is_err());
    assert_eq!(controller.state(), ProtocolState::Ready);
    assert_eq!(controller.instance().data()["name"], json!("steve"));
    assert_eq!(controller.instance().data()["age"], json!(34));

    // correct the field and resubmit
    controller
        .instance_mut()
        .set_raw_value("name", RawValue::Text("otto".into()));
    assert_eq!(
        controller.notify_submit_intent().await,
        SubmitOutcome::Submitted
    );
    assert!(matches!(
        events.try_recv(),
        Ok(FormEvent::Submitted { .. })
    ));
}

#[tokio::test]
async fn two_rapid_cancels_emit_one_event() {
    let (mut controller, mut events) =
        FormController::new(FormInstance::of(&demo_schema()).build());

    assert_eq!(controller.notify_cancel_intent(), CancelOutcome::Cancelled);
    assert_eq!(controller.notify_cancel_intent(), CancelOutcome::Ignored);
    assert_eq!(controller.state(), ProtocolState::Cancelled);

    assert!(matches!(
        events.try_recv(),
        Ok(FormEvent::Cancelled { .. })
    ));
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn reopened_form_runs_a_fresh_attempt() {
    let instance = FormInstance::of(&demo_schema())
        .initial_data(data(&[("name", json!("anna"))]))
        .build();
    let (mut controller, mut events) = FormController::new(instance);

    assert_eq!(
        controller.notify_submit_intent().await,
        SubmitOutcome::Submitted
    );
    assert!(controller.reopen());

    controller
        .instance_mut()
        .set_raw_value("name", RawValue::Text("otto".into()));
    assert_eq!(
        controller.notify_submit_intent().await,
        SubmitOutcome::Submitted
    );

    let mut submitted = 0;
    while events.try_recv().is_ok() {
        submitted += 1;
    }
    assert_eq!(submitted, 2);
}

#[tokio::test]
async fn partial_data_updates_leave_other_fields_alone() {
    let instance = FormInstance::of(&demo_schema())
        .initial_data(data(&[
            ("name", json!("anna")),
            ("age", json!(100)),
            ("active", json!(true)),
            ("choice", json!("red")),
        ]))
        .build();
    let (mut controller, _events) = FormController::new(instance);

    controller
        .instance_mut()
        .set_data(&data(&[("age", json!(30)), ("unknown", json!("zzz"))]));

    let out = controller.instance().data();
    assert_eq!(out["age"], json!(30));
    assert_eq!(out["name"], json!("anna"));
    assert_eq!(out["choice"], json!("red"));
}
