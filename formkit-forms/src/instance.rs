//! Form instances — one live, stateful use of a schema.
//!
//! Construction copies a fresh runtime state per field out of the schema's
//! declarations, so two instances of the same schema never share mutable
//! state. After construction the instance is mutated only through explicit
//! calls; it never reads back from the schema.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ulid::Ulid;

use formkit_fields::{FieldSpec, RawValue};

use crate::binding::DataMap;
use crate::schema::FormSchema;

/// Unique identifier for a form instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FormId(Ulid);

impl FormId {
    /// Create a new random form ID
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Parse a FormId from a string representation
    pub fn parse(s: &str) -> Result<Self, String> {
        Ulid::from_string(s)
            .map(Self)
            .map_err(|e| format!("Invalid form ID '{s}': {e}"))
    }
}

impl Default for FormId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FormId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-instance runtime state of one field.
///
/// The declaration is shared read-only; the value and error list are owned
/// by this instance alone.
#[derive(Debug, Clone)]
pub struct FieldState {
    spec: Arc<FieldSpec>,
    value: RawValue,
    last_errors: Vec<String>,
}

impl FieldState {
    fn fresh(spec: &Arc<FieldSpec>) -> Self {
        Self {
            spec: Arc::clone(spec),
            value: spec.initial_raw(),
            last_errors: Vec::new(),
        }
    }

    /// The field's declaration.
    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    pub(crate) fn spec_arc(&self) -> Arc<FieldSpec> {
        Arc::clone(&self.spec)
    }

    /// The current control-native value.
    pub fn value(&self) -> &RawValue {
        &self.value
    }

    pub(crate) fn set_value(&mut self, value: RawValue) {
        self.value = value;
    }

    /// Errors recorded by the most recent validation pass.
    pub fn last_errors(&self) -> &[String] {
        &self.last_errors
    }

    pub(crate) fn set_last_errors(&mut self, errors: Vec<String>) {
        self.last_errors = errors;
    }
}

/// One live use of a `FormSchema`: current values, effective field order,
/// an optional title, and an instance-scoped control-id counter.
#[derive(Debug)]
pub struct FormInstance {
    id: FormId,
    schema_name: String,
    title: Option<String>,
    fields: IndexMap<String, FieldState>,
    next_control: u64,
}

impl FormInstance {
    /// Start building an instance of a schema.
    pub fn of(schema: &FormSchema) -> InstanceBuilder {
        InstanceBuilder {
            schema: schema.clone(),
            title: None,
            field_order: None,
            initial_data: None,
        }
    }

    pub fn id(&self) -> FormId {
        self.id
    }

    /// Name of the schema this instance was built from.
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Field names in effective order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Field states in effective order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldState)> {
        self.fields
            .iter()
            .map(|(name, state)| (name.as_str(), state))
    }

    /// Look up one field's state.
    pub fn state(&self, name: &str) -> Option<&FieldState> {
        self.fields.get(name)
    }

    /// Raw control-native value accessor for the rendering layer.
    /// Unknown names answer `None`, never an error.
    pub fn raw_value(&self, name: &str) -> Option<&RawValue> {
        self.fields.get(name).map(FieldState::value)
    }

    /// Reflect a user edit into the instance. Returns false for unknown
    /// names, which are ignored by design.
    pub fn set_raw_value(&mut self, name: &str, value: RawValue) -> bool {
        match self.fields.get_mut(name) {
            Some(state) => {
                state.set_value(value);
                true
            }
            None => {
                debug!(field = %name, "ignoring raw value for unknown field");
                false
            }
        }
    }

    pub(crate) fn fields_mut(&mut self) -> &mut IndexMap<String, FieldState> {
        &mut self.fields
    }

    /// Mint the next control id from the instance-owned counter.
    pub(crate) fn next_control_id(&mut self) -> String {
        self.next_control += 1;
        format!("{}-{}", self.id, self.next_control)
    }
}

/// Builder returned by `FormInstance::of`. All configuration is optional.
pub struct InstanceBuilder {
    schema: FormSchema,
    title: Option<String>,
    field_order: Option<Vec<String>>,
    initial_data: Option<DataMap>,
}

impl InstanceBuilder {
    /// Set the title shown above the form.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Override the field order. Listed names move to the front in list
    /// order; unknown names are skipped; every remaining field follows in
    /// declared order. An override can reorder but never hide a field.
    pub fn field_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_order = Some(order.into_iter().map(Into::into).collect());
        self
    }

    /// Bind initial data once the fields are in place. Keys that are not
    /// fields of the schema are ignored.
    pub fn initial_data(mut self, data: DataMap) -> Self {
        self.initial_data = Some(data);
        self
    }

    /// Construct the instance: fresh per-field state, effective order,
    /// then initial data.
    pub fn build(self) -> FormInstance {
        let mut fields: IndexMap<String, FieldState> = self
            .schema
            .fields()
            .map(|(name, spec)| (name.to_string(), FieldState::fresh(spec)))
            .collect();

        if let Some(order) = &self.field_order {
            fields = apply_field_order(fields, order);
        }

        let mut instance = FormInstance {
            id: FormId::new(),
            schema_name: self.schema.name().to_string(),
            title: self.title,
            fields,
            next_control: 0,
        };

        if let Some(data) = &self.initial_data {
            instance.set_data(data);
        }

        debug!(
            form = %instance.id,
            schema = %instance.schema_name,
            fields = instance.fields.len(),
            "form instance built"
        );
        instance
    }
}

/// Rearrange fields according to an override list: listed names first in
/// list order, unknown names skipped, the rest appended in original order.
fn apply_field_order(
    mut fields: IndexMap<String, FieldState>,
    order: &[String],
) -> IndexMap<String, FieldState> {
    let mut reordered = IndexMap::with_capacity(fields.len());
    for name in order {
        if let Some(state) = fields.shift_remove(name) {
            reordered.insert(name.clone(), state);
        } else {
            debug!(field = %name, "ignoring unknown field in order override");
        }
    }
    reordered.extend(fields);
    reordered
}
