use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::registry::widget::FieldWidget;
use crate::store::path::expand_relative_path;
use crate::view::view_model::{FieldDescriptor, FieldIndex, FieldKind};

/// A field and the widget currently bound to it.
pub struct Registration {
    pub field: FieldDescriptor,
    pub widget: Box<dyn FieldWidget>,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("index", &self.field.index)
            .field("reference", &self.field.reference)
            .field("value", &self.widget.value())
            .finish()
    }
}

/// Registrations for one view instance, keyed by field index with a
/// reference fan-out index on the side.
///
/// Created fresh for every loaded view. The generation identifies that view
/// so results computed against an older one can be recognised and dropped.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    generation: u64,
    by_index: IndexMap<FieldIndex, Registration>,
    by_reference: IndexMap<String, IndexSet<FieldIndex>>,
}

impl ComponentRegistry {
    pub fn new(generation: u64) -> Self {
        ComponentRegistry {
            generation,
            ..Default::default()
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Bind `widget` to `field`, replacing any registration with the same
    /// index. A registration at the same reference that carries the same
    /// test id is the same logical field re-rendered and is replaced too.
    ///
    /// Returns the registrations that were replaced.
    pub fn register(
        &mut self,
        field: FieldDescriptor,
        widget: Box<dyn FieldWidget>,
    ) -> Vec<Registration> {
        let index = field.node();
        let reference = expand_relative_path(&field.reference).to_string();
        let mut replaced = Vec::new();

        if let Some(test_id) = field.test_id.as_deref() {
            let twins: Vec<FieldIndex> = self
                .indices_for(&reference)
                .filter(|&other| other != index)
                .filter(|other| {
                    self.by_index
                        .get(other)
                        .is_some_and(|r| r.field.test_id.as_deref() == Some(test_id))
                })
                .collect();
            for twin in twins {
                replaced.extend(self.unregister(twin));
            }
        }

        replaced.extend(self.unregister(index));

        self.by_reference
            .entry(reference)
            .or_default()
            .insert(index);
        self.by_index.insert(index, Registration { field, widget });

        replaced
    }

    pub fn unregister(&mut self, index: FieldIndex) -> Option<Registration> {
        let registration = self.by_index.shift_remove(&index)?;
        let reference = expand_relative_path(&registration.field.reference);
        if let Some(indices) = self.by_reference.get_mut(reference) {
            indices.shift_remove(&index);
            if indices.is_empty() {
                self.by_reference.shift_remove(reference);
            }
        }
        Some(registration)
    }

    pub fn get(&self, index: FieldIndex) -> Option<&Registration> {
        self.by_index.get(&index)
    }

    pub fn get_mut(&mut self, index: FieldIndex) -> Option<&mut Registration> {
        self.by_index.get_mut(&index)
    }

    pub fn field(&self, index: FieldIndex) -> Option<&FieldDescriptor> {
        self.get(index).map(|r| &r.field)
    }

    pub fn widget(&self, index: FieldIndex) -> Option<&dyn FieldWidget> {
        self.get(index).map(|r| r.widget.as_ref())
    }

    /// Indices registered at `reference`, in registration order.
    pub fn indices_for<'a>(&'a self, reference: &str) -> impl Iterator<Item = FieldIndex> + 'a {
        self.by_reference
            .get(expand_relative_path(reference))
            .into_iter()
            .flat_map(|indices| indices.iter().copied())
    }

    pub fn registrations_for<'a>(&'a self, reference: &str) -> impl Iterator<Item = &'a Registration> + 'a {
        self.indices_for(reference)
            .filter_map(move |index| self.by_index.get(&index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.by_index.values()
    }

    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    pub fn set_widget_value(&mut self, index: FieldIndex, value: &Value) -> bool {
        match self.by_index.get_mut(&index) {
            Some(registration) => {
                registration.widget.set_value(value);
                true
            }
            None => false,
        }
    }

    /// Push `value` into every widget bound to `reference`.
    pub fn set_reference_value(&mut self, reference: &str, value: &Value) -> usize {
        let indices: Vec<FieldIndex> = self.indices_for(reference).collect();
        indices
            .into_iter()
            .filter(|&index| self.set_widget_value(index, value))
            .count()
    }

    /// Show `message` on every widget bound to `reference`. Returns how many
    /// widgets reported it.
    pub fn report_validity(&mut self, reference: &str, message: &str) -> usize {
        let indices: Vec<FieldIndex> = self.indices_for(reference).collect();
        let mut reported = 0;
        for index in indices {
            if let Some(registration) = self.by_index.get_mut(&index) {
                registration.widget.set_custom_validity(message);
                registration.widget.report_validity();
                reported += 1;
            }
        }
        reported
    }

    /// Run built-in validity on every editable, validatable registration.
    /// Invalid widgets report themselves. Returns whether all passed.
    pub fn validate_all(&mut self) -> bool {
        let mut all_valid = true;
        for registration in self.by_index.values_mut() {
            if registration.field.read_only || !registration.field.kind().is_validatable() {
                continue;
            }
            registration.widget.set_custom_validity("");
            if !registration.widget.check_validity() {
                registration.widget.report_validity();
                all_valid = false;
            }
        }
        all_valid
    }

    fn first_field(&self, reference: &str) -> Option<&FieldDescriptor> {
        self.registrations_for(reference).next().map(|r| &r.field)
    }

    pub fn is_checkbox(&self, reference: &str) -> bool {
        self.first_field(reference)
            .is_some_and(|f| f.kind() == FieldKind::Checkbox)
    }

    pub fn is_date(&self, reference: &str) -> bool {
        self.first_field(reference).is_some_and(|f| f.is_date())
    }

    /// A reference is posted unless every field bound to it is read-only.
    pub fn is_posted(&self, reference: &str) -> bool {
        let mut registrations = self.registrations_for(reference).peekable();
        if registrations.peek().is_none() {
            return true;
        }
        registrations.any(|r| !r.field.read_only)
    }
}
