//! Form schemas — named, ordered, frozen collections of field declarations.
//!
//! A schema is declared once with `SchemaBuilder` and resolved into an
//! immutable template shared by every instance. Composition replaces the
//! kind of reflective class-attribute gathering found in dynamic-language
//! form libraries: `extends` merges base schemas explicitly, and field
//! declarations are only ever reachable through the resolved collection.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use formkit_fields::FieldSpec;

use crate::error::{SchemaError, SchemaResult};

/// A frozen, shareable form template.
///
/// Cloning is cheap (the field table lives behind an `Arc`); instances hold
/// their own runtime state and never read back from the schema after
/// construction.
#[derive(Debug, Clone)]
pub struct FormSchema {
    inner: Arc<SchemaInner>,
}

#[derive(Debug)]
struct SchemaInner {
    name: String,
    fields: IndexMap<String, Arc<FieldSpec>>,
}

impl FormSchema {
    /// Start declaring a schema.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// The schema's declared name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Number of resolved fields.
    pub fn len(&self) -> usize {
        self.inner.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.fields.is_empty()
    }

    /// Look up a field declaration by name.
    pub fn get(&self, name: &str) -> Option<&Arc<FieldSpec>> {
        self.inner.fields.get(name)
    }

    /// Field names in resolved declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.inner.fields.keys().map(String::as_str)
    }

    /// Field declarations in resolved declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Arc<FieldSpec>)> {
        self.inner
            .fields
            .iter()
            .map(|(name, spec)| (name.as_str(), spec))
    }
}

/// Builder for `FormSchema`.
///
/// Bases are merged base-most first, then the declaring schema's own fields.
/// A field redeclared by a closer schema replaces the inherited declaration
/// and takes the position of its new declaration order.
pub struct SchemaBuilder {
    name: String,
    bases: Vec<FormSchema>,
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Inherit all fields of a base schema. Call once per base, base-most
    /// (farthest ancestor) first.
    pub fn extends(mut self, base: &FormSchema) -> Self {
        self.bases.push(base.clone());
        self
    }

    /// Declare a field. Declaration order is preserved in the resolved
    /// schema.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Resolve the schema. Fails fast on declaration mistakes so nothing
    /// needs checking at instance-use time.
    pub fn build(self) -> SchemaResult<FormSchema> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyName);
        }

        let mut resolved: IndexMap<String, Arc<FieldSpec>> = IndexMap::new();
        for base in &self.bases {
            for (name, spec) in base.fields() {
                // Replacement relocates the field to the redeclaring
                // schema's position.
                resolved.shift_remove(name);
                resolved.insert(name.to_string(), Arc::clone(spec));
            }
        }

        let mut own_names: Vec<&str> = Vec::with_capacity(self.fields.len());
        for spec in &self.fields {
            spec.validate_declaration()
                .map_err(|source| SchemaError::InvalidField {
                    schema: self.name.clone(),
                    source,
                })?;
            if own_names.contains(&spec.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    schema: self.name.clone(),
                    name: spec.name.clone(),
                });
            }
            own_names.push(&spec.name);
        }
        for spec in self.fields {
            resolved.shift_remove(&spec.name);
            resolved.insert(spec.name.clone(), Arc::new(spec));
        }

        debug!(schema = %self.name, fields = resolved.len(), "schema resolved");
        Ok(FormSchema {
            inner: Arc::new(SchemaInner {
                name: self.name,
                fields: resolved,
            }),
        })
    }
}
