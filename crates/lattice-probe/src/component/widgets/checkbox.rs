//! Checkbox component.
//!
//! A click toggles the checkbox; a simulated value write sets it directly.

use std::sync::atomic::{AtomicBool, Ordering};

use lattice_probe_core::{Object, ObjectId, Property, Signal};

use crate::component::{
    Component, ComponentBase, ComponentEvent, ValueChangeEvent, ValueField, Value,
    unsupported_event, value_mismatch,
};
use crate::error::HarnessResult;

/// A two-state checkbox with a caption.
///
/// # Signals
///
/// - `value_changed`: Emitted when the checked state changes
pub struct Checkbox {
    base: ComponentBase,
    caption: Property<String>,
    checked: Property<bool>,
    read_only: AtomicBool,

    /// Signal emitted when the checked state changes.
    pub value_changed: Signal<ValueChangeEvent<bool>>,
}

impl Checkbox {
    /// Create an unchecked checkbox with the specified caption.
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            base: ComponentBase::new::<Self>(),
            caption: Property::new(caption.into()),
            checked: Property::new(false),
            read_only: AtomicBool::new(false),
            value_changed: Signal::new(),
        }
    }

    /// Set the initial checked state without emitting `value_changed`.
    pub fn with_checked(self, checked: bool) -> Self {
        self.checked.set_silent(checked);
        self
    }

    /// Check if the checkbox is checked.
    pub fn is_checked(&self) -> bool {
        self.checked.get()
    }

    /// Set the checked state programmatically.
    pub fn set_checked(&self, checked: bool) {
        self.store(checked, false);
    }

    fn store(&self, checked: bool, from_client: bool) -> bool {
        match self.checked.replace(checked) {
            Some(old_value) => {
                self.value_changed.emit(ValueChangeEvent {
                    old_value,
                    value: checked,
                    from_client,
                });
                true
            }
            None => false,
        }
    }
}

impl Object for Checkbox {
    fn object_id(&self) -> ObjectId {
        self.base.id()
    }
}

impl Component for Checkbox {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn caption(&self) -> Option<String> {
        Some(self.caption.get())
    }

    fn as_value_field(&self) -> Option<&dyn ValueField> {
        Some(self)
    }

    fn handle_event(&self, event: &ComponentEvent) -> HarnessResult<()> {
        match event {
            ComponentEvent::Click(_) => {
                self.store(!self.is_checked(), true);
                Ok(())
            }
            ComponentEvent::ValueChange { value, from_client } => {
                self.assign(value.clone(), *from_client).map(|_| ())
            }
            _ => Err(unsupported_event(&self.base, event)),
        }
    }
}

impl ValueField for Checkbox {
    fn value(&self) -> Value {
        Value::Bool(self.checked.get())
    }

    fn is_read_only(&self) -> bool {
        self.read_only.load(Ordering::SeqCst)
    }

    fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn assign(&self, value: Value, from_client: bool) -> HarnessResult<bool> {
        match value {
            Value::Bool(checked) => Ok(self.store(checked, from_client)),
            other => Err(value_mismatch(&self.base, "boolean", &other)),
        }
    }

    fn notify_value_change(&self, from_client: bool) {
        let checked = self.checked.get();
        self.value_changed.emit(ValueChangeEvent {
            old_value: checked,
            value: checked,
            from_client,
        });
    }
}
