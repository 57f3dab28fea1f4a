//! Field declaration model for Formkit
//!
//! `formkit-fields` is a standalone, declaration-only crate: it describes
//! named, typed fields (kind, label, default, validators) and the
//! conversions between a field's control-native value, its typed view, and
//! its external JSON representation. It knows nothing about schemas, form
//! instances, or rendering — those live in `formkit-forms`.
//!
//! # Architecture
//!
//! - **Declarations are immutable**: a `FieldSpec` is built once and shared
//!   read-only; runtime values live with the form instance that owns them
//! - **Native binding**: boolean and choice values never pass through string
//!   coercion; text-backed kinds keep the raw string the control produced
//! - **One validator contract**: `validate(value) -> Vec<String>`, async so
//!   a rule may suspend, with no exception-based success/failure signaling

pub mod error;
pub mod types;
pub mod validators;

pub use error::{FieldError, Result};
pub use types::{ChoiceOption, Coerced, FieldKind, FieldSpec, FieldValue, RawValue};
pub use validators::{validate_fn, FnValidator, LengthRange, NumberRange, Pattern, Validator};
