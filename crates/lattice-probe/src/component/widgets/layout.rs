//! Container components.
//!
//! Layouts only hold children; a hidden or disabled layout hides or
//! disables everything inside it.

use std::sync::Arc;

use lattice_probe_core::{Object, ObjectId, Property};

use crate::component::{Component, ComponentBase};
use crate::error::HarnessResult;

macro_rules! layout_component {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name {
            base: ComponentBase,
            caption: Property<Option<String>>,
        }

        impl $name {
            /// Create an empty layout.
            pub fn new() -> Self {
                Self {
                    base: ComponentBase::new::<Self>(),
                    caption: Property::new(None),
                }
            }

            /// Set the caption using builder pattern.
            pub fn with_caption(self, caption: impl Into<String>) -> Self {
                self.caption.set(Some(caption.into()));
                self
            }

            /// Install a component and append it as the last child.
            pub fn add<C: Component>(&self, child: C) -> HarnessResult<Arc<C>> {
                self.base.add_child(child)
            }

            /// Move an existing component into this layout, as the last child.
            pub fn add_existing(&self, child: &dyn Component) -> HarnessResult<()> {
                self.base.adopt(child)
            }

            /// Detach a child from this layout.
            pub fn remove(&self, child: &dyn Component) -> HarnessResult<()> {
                self.base.remove_child(child)
            }

            /// Destroy all children.
            pub fn remove_all(&self) -> HarnessResult<()> {
                self.base.remove_all_children()
            }

            /// Number of direct children.
            pub fn component_count(&self) -> usize {
                self.base.children_ids().len()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Object for $name {
            fn object_id(&self) -> ObjectId {
                self.base.id()
            }
        }

        impl Component for $name {
            fn base(&self) -> &ComponentBase {
                &self.base
            }

            fn caption(&self) -> Option<String> {
                self.caption.get()
            }
        }
    };
}

layout_component!(
    /// A container stacking its children vertically.
    VerticalLayout
);

layout_component!(
    /// A container placing its children side by side.
    HorizontalLayout
);
