//! Single-line input fields.
//!
//! [`TextField`] holds text and [`IntegerField`] holds an optional integer.
//! Both are value fields: the harness can write them with a simulated user
//! edit, which respects the read-only flag, while the public setters here
//! are programmatic and always succeed.
//!
//! # Example
//!
//! ```no_run
//! use lattice_probe::component::widgets::TextField;
//!
//! let name = TextField::new("Name").with_placeholder("Your full name");
//! name.value_changed.connect(|event| {
//!     println!("{} -> {} (user: {})", event.old_value, event.value, event.from_client);
//! });
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use lattice_probe_core::{Object, ObjectId, Property, Signal};

use crate::component::{
    Component, ComponentBase, ValueChangeEvent, ValueField, Value, value_mismatch,
};
use crate::error::HarnessResult;

/// A text input with caption and placeholder.
///
/// # Signals
///
/// - `value_changed`: Emitted when the text changes
pub struct TextField {
    base: ComponentBase,
    caption: Property<String>,
    placeholder: Property<String>,
    value: Property<String>,
    read_only: AtomicBool,

    /// Signal emitted when the value changes.
    pub value_changed: Signal<ValueChangeEvent<String>>,
}

impl TextField {
    /// Create an empty text field with the specified caption.
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            base: ComponentBase::new::<Self>(),
            caption: Property::new(caption.into()),
            placeholder: Property::default(),
            value: Property::default(),
            read_only: AtomicBool::new(false),
            value_changed: Signal::new(),
        }
    }

    /// Set the placeholder using builder pattern.
    pub fn with_placeholder(self, placeholder: impl Into<String>) -> Self {
        self.placeholder.set(placeholder.into());
        self
    }

    /// Set the initial value without emitting `value_changed`.
    pub fn with_value(self, value: impl Into<String>) -> Self {
        self.value.set_silent(value.into());
        self
    }

    /// Set read-only using builder pattern.
    pub fn with_read_only(self, read_only: bool) -> Self {
        self.set_read_only(read_only);
        self
    }

    /// Get the current text.
    pub fn value(&self) -> String {
        self.value.get()
    }

    /// Set the text programmatically.
    ///
    /// Emits `value_changed` with `from_client == false` if the text changed.
    pub fn set_value(&self, value: impl Into<String>) {
        self.store(value.into(), false);
    }

    /// Set the placeholder.
    pub fn set_placeholder(&self, placeholder: impl Into<String>) {
        self.placeholder.set(placeholder.into());
    }

    fn store(&self, value: String, from_client: bool) -> bool {
        match self.value.replace(value.clone()) {
            Some(old_value) => {
                self.value_changed.emit(ValueChangeEvent {
                    old_value,
                    value,
                    from_client,
                });
                true
            }
            None => false,
        }
    }
}

impl Object for TextField {
    fn object_id(&self) -> ObjectId {
        self.base.id()
    }
}

impl Component for TextField {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn caption(&self) -> Option<String> {
        Some(self.caption.get())
    }

    fn placeholder(&self) -> Option<String> {
        Some(self.placeholder.get())
    }

    fn as_value_field(&self) -> Option<&dyn ValueField> {
        Some(self)
    }
}

impl ValueField for TextField {
    fn value(&self) -> Value {
        Value::Text(self.value.get())
    }

    fn is_read_only(&self) -> bool {
        self.read_only.load(Ordering::SeqCst)
    }

    fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn assign(&self, value: Value, from_client: bool) -> HarnessResult<bool> {
        let text = match value {
            Value::Text(text) => text,
            Value::None => String::new(),
            other => return Err(value_mismatch(&self.base, "text", &other)),
        };
        Ok(self.store(text, from_client))
    }

    fn notify_value_change(&self, from_client: bool) {
        let value = self.value.get();
        self.value_changed.emit(ValueChangeEvent {
            old_value: value.clone(),
            value,
            from_client,
        });
    }
}

/// An input holding an optional integer.
///
/// # Signals
///
/// - `value_changed`: Emitted when the value changes
pub struct IntegerField {
    base: ComponentBase,
    caption: Property<String>,
    placeholder: Property<String>,
    value: Property<Option<i64>>,
    read_only: AtomicBool,

    /// Signal emitted when the value changes.
    pub value_changed: Signal<ValueChangeEvent<Option<i64>>>,
}

impl IntegerField {
    /// Create an empty integer field with the specified caption.
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            base: ComponentBase::new::<Self>(),
            caption: Property::new(caption.into()),
            placeholder: Property::default(),
            value: Property::default(),
            read_only: AtomicBool::new(false),
            value_changed: Signal::new(),
        }
    }

    /// Set the placeholder using builder pattern.
    pub fn with_placeholder(self, placeholder: impl Into<String>) -> Self {
        self.placeholder.set(placeholder.into());
        self
    }

    /// Set the initial value without emitting `value_changed`.
    pub fn with_value(self, value: i64) -> Self {
        self.value.set_silent(Some(value));
        self
    }

    /// Set read-only using builder pattern.
    pub fn with_read_only(self, read_only: bool) -> Self {
        self.set_read_only(read_only);
        self
    }

    /// Get the current value.
    pub fn value(&self) -> Option<i64> {
        self.value.get()
    }

    /// Set the value programmatically.
    pub fn set_value(&self, value: Option<i64>) {
        self.store(value, false);
    }

    fn store(&self, value: Option<i64>, from_client: bool) -> bool {
        match self.value.replace(value) {
            Some(old_value) => {
                self.value_changed.emit(ValueChangeEvent {
                    old_value,
                    value,
                    from_client,
                });
                true
            }
            None => false,
        }
    }
}

impl Object for IntegerField {
    fn object_id(&self) -> ObjectId {
        self.base.id()
    }
}

impl Component for IntegerField {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn caption(&self) -> Option<String> {
        Some(self.caption.get())
    }

    fn placeholder(&self) -> Option<String> {
        Some(self.placeholder.get())
    }

    fn as_value_field(&self) -> Option<&dyn ValueField> {
        Some(self)
    }
}

impl ValueField for IntegerField {
    fn value(&self) -> Value {
        self.value.get().into()
    }

    fn is_read_only(&self) -> bool {
        self.read_only.load(Ordering::SeqCst)
    }

    fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn assign(&self, value: Value, from_client: bool) -> HarnessResult<bool> {
        let number = match value {
            Value::Int(n) => Some(n),
            Value::None => None,
            other => return Err(value_mismatch(&self.base, "integer", &other)),
        };
        Ok(self.store(number, from_client))
    }

    fn notify_value_change(&self, from_client: bool) {
        let value = self.value.get();
        self.value_changed.emit(ValueChangeEvent {
            old_value: value,
            value,
            from_client,
        });
    }
}
