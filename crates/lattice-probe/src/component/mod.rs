//! Component model.
//!
//! Every node of a UI tree that the harness can see is a [`Component`]: an
//! [`Object`] with a [`ComponentBase`] plus a set of optional capabilities
//! (caption, placeholder, text, value field, tabular view). The harness
//! asks for capabilities instead of branching on concrete types.
//!
//! Components are owned by their node: [`install`] wraps a component in an
//! `Arc` and attaches it to its registry node, and destroying the node drops
//! the component.
//!
//! # Example
//!
//! ```no_run
//! use lattice_probe::component::{ComponentExt, widgets::{Button, VerticalLayout}};
//!
//! # fn main() -> lattice_probe::HarnessResult<()> {
//! let layout = VerticalLayout::new();
//! let save = layout.add(Button::new("Save").with_id("save"))?;
//! save.clicked.connect(|_| println!("saved"));
//! # Ok(())
//! # }
//! ```

mod base;
pub mod events;
mod value;
pub mod widgets;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use lattice_probe_core::{Object, ObjectId, SharedObjectRegistry};

pub use base::ComponentBase;
pub(crate) use base::short_type_name;
pub use events::{
    ClickEvent, ComponentEvent, ItemClickEvent, KeyboardModifiers, MouseButton,
    RendererClickEvent, ValueChangeEvent,
};
pub use value::Value;
pub use widgets::TabularView;

use crate::error::{HarnessError, HarnessResult};

/// A node of the UI tree.
pub trait Component: Object {
    /// Get the component base.
    fn base(&self) -> &ComponentBase;

    /// The caption (label) shown for the component.
    fn caption(&self) -> Option<String> {
        None
    }

    /// The placeholder shown in an empty input.
    fn placeholder(&self) -> Option<String> {
        None
    }

    /// Text content of the component.
    fn text(&self) -> Option<String> {
        None
    }

    /// The value-holding capability, for inputs.
    fn as_value_field(&self) -> Option<&dyn ValueField> {
        None
    }

    /// The tabular capability, for grids.
    fn as_tabular(&self) -> Option<&dyn TabularView> {
        None
    }

    /// Whether the component's children are hidden from lookup.
    fn is_opaque(&self) -> bool {
        false
    }

    /// Deliver a native event into the component's listener chain.
    ///
    /// The default accepts value changes on value fields and rejects
    /// everything else.
    fn handle_event(&self, event: &ComponentEvent) -> HarnessResult<()> {
        match (event, self.as_value_field()) {
            (ComponentEvent::ValueChange { value, from_client }, Some(field)) => {
                field.assign(value.clone(), *from_client).map(|_| ())
            }
            _ => Err(unsupported_event(self.base(), event)),
        }
    }
}

impl fmt::Debug for dyn Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::harness::state::describe(self))
    }
}

/// The error for an event kind a component does not handle.
pub(crate) fn unsupported_event(base: &ComponentBase, event: &ComponentEvent) -> HarnessError {
    HarnessError::unsupported(format!("{} on {}", event.kind(), base.type_label()))
}

/// The error for a value of the wrong kind.
pub(crate) fn value_mismatch(base: &ComponentBase, expected: &'static str, got: &Value) -> HarnessError {
    HarnessError::ValueTypeMismatch {
        component: base.type_label(),
        expected,
        got: got.kind(),
    }
}

/// A component holding a user-editable value.
pub trait ValueField {
    /// The current value.
    fn value(&self) -> Value;

    /// Whether the user may not edit the value.
    fn is_read_only(&self) -> bool;

    /// Set the read-only flag.
    fn set_read_only(&self, read_only: bool);

    /// Assign a value without any interactability check.
    ///
    /// Emits the field's value-change signal when the value changed and
    /// returns whether it did. Rejects values of the wrong kind with
    /// [`HarnessError::ValueTypeMismatch`].
    fn assign(&self, value: Value, from_client: bool) -> HarnessResult<bool>;

    /// Emit the value-change signal with the current value as both old and new.
    fn notify_value_change(&self, from_client: bool);
}

/// Builder-style configuration shared by every component.
pub trait ComponentExt: Component + Sized {
    /// Set the test id using builder pattern.
    fn with_id(self, id: impl Into<String>) -> Self {
        self.base().set_test_id(id);
        self
    }

    /// Set the own visible flag using builder pattern.
    fn with_visible(self, visible: bool) -> Self {
        self.base().set_visible(visible);
        self
    }

    /// Set the own enabled flag using builder pattern.
    fn with_enabled(self, enabled: bool) -> Self {
        self.base().set_enabled(enabled);
        self
    }
}

impl<C: Component> ComponentExt for C {}

/// Wrap a component in an `Arc` and attach it to its registry node.
pub fn install<C: Component>(component: C) -> HarnessResult<Arc<C>> {
    let component = Arc::new(component);
    attach(component.clone())?;
    Ok(component)
}

/// Attach an already shared component to its registry node.
pub fn attach(component: Arc<dyn Component>) -> HarnessResult<()> {
    let id = component.object_id();
    let registry = component.base().registry()?;
    registry.attach_instance(id, Box::new(component))?;
    Ok(())
}

/// Resolve a node to the component attached to it.
pub fn resolve(registry: &SharedObjectRegistry, id: ObjectId) -> Option<Arc<dyn Component>> {
    registry.instance::<Arc<dyn Component>>(id).ok().flatten()
}

/// Downcast a shared component to its concrete type.
pub fn downcast<C: Component>(component: Arc<dyn Component>) -> Option<Arc<C>> {
    let any: Arc<dyn Any + Send + Sync> = component;
    any.downcast::<C>().ok()
}
