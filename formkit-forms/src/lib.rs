//! # Formkit Forms
//!
//! A declarative form engine: declare a schema of named, typed fields once,
//! create independent stateful instances per use, bind data in and out,
//! validate, and drive a submit/cancel protocol with exactly-once event
//! emission. Rendering is a collaborator, not a concern — any toolkit can
//! drive the engine through the `ControlFactory` seam and the raw value
//! accessors.
//!
//! ## Quick Start
//!
//! ```rust
//! use formkit_fields::{ChoiceOption, FieldSpec};
//! use formkit_forms::{FormController, FormInstance, FormSchema, SubmitOutcome};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Declare the schema once
//! let schema = FormSchema::builder("person")
//!     .field(FieldSpec::text("name"))
//!     .field(FieldSpec::integer("age").required(false))
//!     .field(FieldSpec::boolean("active"))
//!     .field(FieldSpec::choice(
//!         "choice",
//!         vec![ChoiceOption::new("blue"), ChoiceOption::new("red")],
//!     ))
//!     .build()?;
//!
//! // One instance per use
//! let instance = FormInstance::of(&schema)
//!     .title("New person")
//!     .initial_data(
//!         [
//!             ("name".to_string(), serde_json::json!("anna")),
//!             ("age".to_string(), serde_json::json!(34)),
//!             ("active".to_string(), serde_json::json!(true)),
//!             ("choice".to_string(), serde_json::json!("blue")),
//!         ]
//!         .into_iter()
//!         .collect(),
//!     )
//!     .build();
//!
//! let (mut controller, mut events) = FormController::new(instance);
//! assert_eq!(controller.notify_submit_intent().await, SubmitOutcome::Submitted);
//! let event = events.recv().await.unwrap();
//! println!("submitted: {event:?}");
//! # Ok(())
//! # }
//! ```

mod binding;
mod error;
mod instance;
mod protocol;
mod render;
mod schema;
mod validation;

pub use binding::DataMap;
pub use error::{SchemaError, SchemaResult};
pub use instance::{FieldState, FormId, FormInstance, InstanceBuilder};
pub use protocol::{CancelOutcome, FormController, FormEvent, ProtocolState, SubmitOutcome};
pub use render::{ControlFactory, ControlId};
pub use schema::{FormSchema, SchemaBuilder};
pub use validation::{ValidationEngine, ValidationReport};
