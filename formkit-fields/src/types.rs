//! Core field declaration types.
//!
//! A `FieldSpec` describes one named, typed unit of input. The declarative
//! parts (kind, label, default, ...) serialize to/from YAML and JSON via
//! serde; validators are runtime objects and are never serialized.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FieldError, Result};
use crate::validators::Validator;

/// A single option in a choice field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChoiceOption {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ChoiceOption {
    /// Option whose display label is its value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: None,
        }
    }

    /// Option with a display label distinct from the stored value.
    pub fn labeled(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: Some(label.into()),
        }
    }

    /// Label shown by the rendering layer.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.value)
    }
}

/// The kind of a field — determines what shape its value takes and how it
/// converts to and from external data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FieldKind {
    Text {
        #[serde(default)]
        multiline: bool,
    },
    Integer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    Boolean,
    Choice {
        options: Vec<ChoiceOption>,
    },
}

/// The control-native value a field holds at runtime.
///
/// Text-backed kinds (Text, Integer) store the raw string exactly as the
/// control produced it. Boolean and Choice bind natively and never pass
/// through string coercion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum RawValue {
    Text(String),
    Bool(bool),
    Choice(Option<String>),
}

/// The typed view of a field value handed to validators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum FieldValue {
    /// No usable value (empty input, unselected choice, failed coercion)
    Absent,
    Text(String),
    Integer(i64),
    Bool(bool),
    Choice(String),
}

impl FieldValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

/// Outcome of coercing a raw value into its typed view.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    /// A usable typed value
    Value(FieldValue),
    /// No value was entered
    Absent,
    /// A value was entered but cannot be converted (message is user-facing)
    Invalid(String),
}

impl FieldKind {
    /// Short name used in messages and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text { .. } => "text",
            FieldKind::Integer { .. } => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Choice { .. } => "choice",
        }
    }

    /// The value a freshly constructed field holds when no default is given.
    pub fn empty_raw(&self) -> RawValue {
        match self {
            FieldKind::Text { .. } | FieldKind::Integer { .. } => RawValue::Text(String::new()),
            FieldKind::Boolean => RawValue::Bool(false),
            FieldKind::Choice { .. } => RawValue::Choice(None),
        }
    }

    /// Seed a runtime value from an optional declared default.
    ///
    /// Defaults are checked at declaration time, so a mismatch here falls
    /// back to the empty value instead of failing.
    pub fn default_raw(&self, default: Option<&Value>) -> RawValue {
        default
            .and_then(|v| self.to_internal(v))
            .unwrap_or_else(|| self.empty_raw())
    }

    /// Convert a raw control value into the typed view used for validation.
    pub fn coerce(&self, raw: &RawValue) -> Coerced {
        match (self, raw) {
            (FieldKind::Text { .. }, RawValue::Text(s)) => {
                if s.is_empty() {
                    Coerced::Absent
                } else {
                    Coerced::Value(FieldValue::Text(s.clone()))
                }
            }
            (FieldKind::Integer { .. }, RawValue::Text(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Coerced::Absent
                } else {
                    match trimmed.parse::<i64>() {
                        Ok(n) => Coerced::Value(FieldValue::Integer(n)),
                        Err(_) => Coerced::Invalid(format!("'{trimmed}' is not a valid integer")),
                    }
                }
            }
            (FieldKind::Boolean, RawValue::Bool(b)) => Coerced::Value(FieldValue::Bool(*b)),
            (FieldKind::Choice { options }, RawValue::Choice(selected)) => match selected {
                None => Coerced::Absent,
                Some(v) => {
                    if options.iter().any(|o| o.value == *v) {
                        Coerced::Value(FieldValue::Choice(v.clone()))
                    } else {
                        Coerced::Invalid(format!("'{v}' is not one of the available options"))
                    }
                }
            },
            // A field only ever stores the raw variant its kind produced;
            // anything else means the caller bypassed the binding layer.
            (kind, _) => Coerced::Invalid(format!(
                "value does not match field kind '{}'",
                kind.as_str()
            )),
        }
    }

    /// Constraint messages carried by the kind itself (integer bounds).
    /// Choice membership is enforced during coercion.
    pub fn constraint_errors(&self, value: &FieldValue) -> Vec<String> {
        let mut errors = Vec::new();
        if let (FieldKind::Integer { min, max }, FieldValue::Integer(n)) = (self, value) {
            if let Some(min) = min {
                if n < min {
                    errors.push(format!("must be at least {min}"));
                }
            }
            if let Some(max) = max {
                if n > max {
                    errors.push(format!("must be at most {max}"));
                }
            }
        }
        errors
    }

    /// Convert a raw value to its external JSON representation.
    ///
    /// `Null` is the no-value sentinel: an unparsable integer or an
    /// unselected choice converts to `Null` instead of erroring.
    pub fn to_external(&self, raw: &RawValue) -> Value {
        match (self, raw) {
            (FieldKind::Text { .. }, RawValue::Text(s)) => Value::String(s.clone()),
            (FieldKind::Integer { .. }, RawValue::Text(s)) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or(Value::Null),
            (FieldKind::Boolean, RawValue::Bool(b)) => Value::Bool(*b),
            (FieldKind::Choice { .. }, RawValue::Choice(Some(v))) => Value::String(v.clone()),
            (FieldKind::Choice { .. }, RawValue::Choice(None)) => Value::Null,
            _ => Value::Null,
        }
    }

    /// Convert an external JSON value to the field's internal representation.
    ///
    /// Returns `None` when the value cannot be accepted by this kind; the
    /// binding layer treats that as a tolerated type-coercion failure.
    pub fn to_internal(&self, value: &Value) -> Option<RawValue> {
        match self {
            FieldKind::Text { .. } => match value {
                Value::String(s) => Some(RawValue::Text(s.clone())),
                Value::Number(n) => Some(RawValue::Text(n.to_string())),
                Value::Null => Some(RawValue::Text(String::new())),
                _ => None,
            },
            FieldKind::Integer { .. } => match value {
                Value::Number(_) => value.as_i64().map(|n| RawValue::Text(n.to_string())),
                Value::String(s) => Some(RawValue::Text(s.clone())),
                Value::Null => Some(RawValue::Text(String::new())),
                _ => None,
            },
            FieldKind::Boolean => match value {
                Value::Bool(b) => Some(RawValue::Bool(*b)),
                _ => None,
            },
            FieldKind::Choice { .. } => match value {
                Value::String(s) => Some(RawValue::Choice(Some(s.clone()))),
                Value::Null => Some(RawValue::Choice(None)),
                _ => None,
            },
        }
    }
}

/// An immutable declaration of one form field.
///
/// Built once (usually at schema declaration time) and shared read-only by
/// every form instance via `Arc`. Identity is the declaring schema plus the
/// field name.
#[derive(Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub disabled: bool,
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip)]
    pub validators: Vec<Arc<dyn Validator>>,
}

impl FieldSpec {
    /// Declare a field of the given kind. The label defaults to the name.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            help_text: String::new(),
            placeholder: None,
            required: true,
            disabled: false,
            kind,
            default: None,
            validators: Vec::new(),
        }
    }

    /// Declare a single-line text field.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text { multiline: false })
    }

    /// Declare a multi-line text field.
    pub fn text_area(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text { multiline: true })
    }

    /// Declare an integer field without bounds.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Integer {
                min: None,
                max: None,
            },
        )
    }

    /// Declare a boolean field. Booleans always hold a value, so required
    /// is off by default.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean).required(false)
    }

    /// Declare a choice field over the given options.
    pub fn choice(name: impl Into<String>, options: Vec<ChoiceOption>) -> Self {
        Self::new(name, FieldKind::Choice { options })
    }

    /// Set the display label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the help text shown alongside the control.
    pub fn help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = help_text.into();
        self
    }

    /// Set the placeholder shown in an empty control.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Mark the field required or optional.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Mark the field disabled. Disabled fields render but are skipped by
    /// validation.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the declared default value.
    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Set integer bounds. Ignored for non-integer kinds.
    pub fn range(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        if let FieldKind::Integer {
            min: ref mut lo,
            max: ref mut hi,
        } = self.kind
        {
            *lo = min;
            *hi = max;
        }
        self
    }

    /// Append a validator. Validators run in declaration order.
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Check the declaration itself. Called when a schema is built so that
    /// misuse fails fast, long before any instance exists.
    pub fn validate_declaration(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(FieldError::EmptyName);
        }
        if let FieldKind::Choice { options } = &self.kind {
            if options.is_empty() {
                return Err(FieldError::NoChoices {
                    name: self.name.clone(),
                });
            }
        }
        if let Some(default) = &self.default {
            if self.kind.to_internal(default).is_none() {
                return Err(FieldError::DefaultKindMismatch {
                    name: self.name.clone(),
                    kind: self.kind.as_str().to_string(),
                });
            }
        }
        Ok(())
    }

    /// The runtime value a fresh instance of this field starts with.
    pub fn initial_raw(&self) -> RawValue {
        self.kind.default_raw(self.default.as_ref())
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("required", &self.required)
            .field("disabled", &self.disabled)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("validators", &self.validators.len())
            .finish()
    }
}
