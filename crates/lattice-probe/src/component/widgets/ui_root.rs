//! The root of a UI.

use std::sync::Arc;

use lattice_probe_core::{Object, ObjectId};

use crate::component::{Component, ComponentBase, attach};
use crate::error::HarnessResult;

/// The top of a component tree.
///
/// Holds the view of the current route as its only child. Replacing the
/// content destroys the previous view.
pub struct UiRoot {
    base: ComponentBase,
}

impl UiRoot {
    /// Create an empty root.
    pub fn new() -> Self {
        Self {
            base: ComponentBase::new::<Self>(),
        }
    }

    /// The current view, if any.
    pub fn content(&self) -> Option<Arc<dyn Component>> {
        self.base.children().into_iter().next()
    }

    /// Replace the current view.
    ///
    /// The view is attached to its registry node if it was not already.
    pub fn set_content(&self, view: Arc<dyn Component>) -> HarnessResult<()> {
        let registry = self.base.registry()?;
        if crate::component::resolve(&registry, view.object_id()).is_none() {
            attach(view.clone())?;
        }
        for child in self.base.children_ids() {
            if child != view.object_id() {
                registry.destroy(child)?;
            }
        }
        self.base.adopt(view.as_ref())
    }

    /// Destroy the current view.
    pub fn clear(&self) -> HarnessResult<()> {
        self.base.remove_all_children()
    }
}

impl Default for UiRoot {
    fn default() -> Self {
        Self::new()
    }
}

impl Object for UiRoot {
    fn object_id(&self) -> ObjectId {
        self.base.id()
    }
}

impl Component for UiRoot {
    fn base(&self) -> &ComponentBase {
        &self.base
    }
}
