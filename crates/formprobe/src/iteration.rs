//! Per-field, per-behavior context handed to custom handlers.
//!
//! An [`Iteration`] is built once per field per behavior and discarded
//! afterwards. It bundles everything a handler needs: the field descriptor,
//! the pre-read attribute values, a selector builder scoped to the field
//! name, the browser handle (present during preview and fill, never during
//! compare) and the field's value display map if one was configured.

use std::fmt;

use serde_json::Value;

use crate::driver::BrowserDriver;
use crate::field::FieldDescriptor;
use crate::record::Record;
use crate::result::{FormProbeError, FormProbeResult};
use crate::selector::FieldSelector;
use crate::value::DisplayMap;

/// Ephemeral context for one field under one behavior.
pub struct Iteration<'a> {
    field: &'a FieldDescriptor,
    selector: FieldSelector,
    current_value: Value,
    // Deliberately unset when no new record takes part in the behavior, so
    // that a handler reading it by mistake fails loudly instead of seeing
    // a silent null.
    new_value: Option<Value>,
    page: Option<&'a mut dyn BrowserDriver>,
    display_map: Option<&'a DisplayMap>,
}

impl fmt::Debug for Iteration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iteration")
            .field("field", &self.field)
            .field("current_value", &self.current_value)
            .field("new_value", &self.new_value)
            .field("has_page", &self.page.is_some())
            .field("display_map", &self.display_map)
            .finish()
    }
}

impl<'a> Iteration<'a> {
    /// Build the context for one field, pre-reading the current value always
    /// and the new value only when a new record takes part
    #[must_use]
    pub fn new(
        field: &'a FieldDescriptor,
        current: &dyn Record,
        new: Option<&dyn Record>,
        page: Option<&'a mut dyn BrowserDriver>,
        display_map: Option<&'a DisplayMap>,
    ) -> Self {
        Self {
            selector: FieldSelector::new(field.name()),
            current_value: current.attribute(field.name()),
            new_value: new.map(|record| record.attribute(field.name())),
            field,
            page,
            display_map,
        }
    }

    /// Field name
    #[must_use]
    pub fn name(&self) -> &str {
        self.field.name()
    }

    /// Field descriptor
    #[must_use]
    pub fn field(&self) -> &FieldDescriptor {
        self.field
    }

    /// Selector builder scoped to this field's name
    #[must_use]
    pub fn selector(&self) -> &FieldSelector {
        &self.selector
    }

    /// The current record's value for this field
    #[must_use]
    pub fn current_value(&self) -> &Value {
        &self.current_value
    }

    /// The new record's value for this field.
    ///
    /// Errors when no new record takes part in the running behavior — that
    /// is a handler bug, not a null value.
    pub fn new_value(&self) -> FormProbeResult<&Value> {
        self.new_value
            .as_ref()
            .ok_or_else(|| FormProbeError::NewValueUnavailable {
                field: self.field.name().to_string(),
            })
    }

    /// Whether a new record takes part in the running behavior
    #[must_use]
    pub fn has_new_value(&self) -> bool {
        self.new_value.is_some()
    }

    /// The live browser handle.
    ///
    /// Errors during compare, which runs entirely against the two records.
    pub fn page(&mut self) -> FormProbeResult<&mut dyn BrowserDriver> {
        let field = self.field.name().to_string();
        match self.page.as_deref_mut() {
            Some(driver) => Ok(driver),
            None => Err(FormProbeError::BrowserUnavailable { field }),
        }
    }

    /// The value display map configured for this field, if any
    #[must_use]
    pub fn display_map(&self) -> Option<&DisplayMap> {
        self.display_map
    }
}
