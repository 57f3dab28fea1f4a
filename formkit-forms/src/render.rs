//! The rendering-layer boundary.
//!
//! The core never draws anything. A renderer implements `ControlFactory`
//! to turn field declarations into whatever controls its toolkit uses, and
//! reflects edits back through the raw value accessors on `FormInstance`.

use serde::{Deserialize, Serialize};

use formkit_fields::FieldSpec;

use crate::instance::FormInstance;

/// Identifier minted for one control of one instance.
///
/// Ids are scoped to the instance (`<form-id>-<n>`), so two instances of
/// the same schema never collide and no process-wide counter exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlId(String);

impl ControlId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ControlId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Factory hook the rendering layer implements.
///
/// Invoked once per field per instance, in effective field order. The
/// rendering layer owns the resulting handles and their lifecycle; the
/// core keeps no reference to them.
pub trait ControlFactory {
    type Handle;

    fn create_control(&mut self, spec: &FieldSpec, id: &ControlId) -> Self::Handle;
}

impl FormInstance {
    /// Create one control per field through the factory, in effective
    /// field order, with ids minted from the instance-owned counter.
    pub fn build_controls<F: ControlFactory>(&mut self, factory: &mut F) -> Vec<F::Handle> {
        let specs: Vec<_> = self.fields().map(|(_, state)| state.spec_arc()).collect();
        let mut handles = Vec::with_capacity(specs.len());
        for spec in specs {
            let id = ControlId(self.next_control_id());
            handles.push(factory.create_control(&spec, &id));
        }
        handles
    }
}
