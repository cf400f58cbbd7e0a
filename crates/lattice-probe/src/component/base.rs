//! Component base implementation.
//!
//! [`ComponentBase`] is the common part of every component: it ties the
//! component to its node in the thread registry and exposes the node's own
//! visible/enabled flags, test id and tree links.

use std::sync::Arc;

use lattice_probe_core::logging::targets;
use lattice_probe_core::{
    ComponentState, Object, ObjectBase, ObjectId, SharedObjectRegistry, Signal,
};

use super::{Component, install, resolve};
use crate::error::HarnessResult;

/// The base implementation for all components.
///
/// Components include this as a field and return it from
/// [`Component::base`]. The visible and enabled flags are stored in the
/// registry, not here, so that ancestor state can be folded by id.
///
/// # Example
///
/// ```no_run
/// use lattice_probe::component::{Component, ComponentBase};
/// use lattice_probe::prelude::{Object, ObjectId};
///
/// struct Badge {
///     base: ComponentBase,
/// }
///
/// impl Object for Badge {
///     fn object_id(&self) -> ObjectId { self.base.id() }
/// }
///
/// impl Component for Badge {
///     fn base(&self) -> &ComponentBase { &self.base }
/// }
///
/// let badge = Badge { base: ComponentBase::new::<Badge>() };
/// # let _ = badge;
/// ```
pub struct ComponentBase {
    object_base: ObjectBase,

    /// Signal emitted when the own visible flag changes.
    pub visible_changed: Signal<bool>,

    /// Signal emitted when the own enabled flag changes.
    pub enabled_changed: Signal<bool>,
}

impl ComponentBase {
    /// Create a new component base registered in the thread registry.
    ///
    /// # Panics
    ///
    /// Panics if no registry is bound to the current thread. Set up a
    /// [`TestEnvironment`](crate::TestEnvironment) first.
    pub fn new<T: Object + 'static>() -> Self {
        let object_base = ObjectBase::new::<T>();
        if let Ok(registry) = object_base.registry() {
            if let Err(error) =
                registry.init_component_state(object_base.id(), ComponentState::default())
            {
                tracing::trace!(target: targets::OBJECT, %error, "component state not initialized");
            }
        }
        Self {
            object_base,
            visible_changed: Signal::new(),
            enabled_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Object System Delegation
    // =========================================================================

    /// Get the component's object ID.
    #[inline]
    pub fn id(&self) -> ObjectId {
        self.object_base.id()
    }

    /// Get the registry this component lives in.
    pub fn registry(&self) -> HarnessResult<Arc<SharedObjectRegistry>> {
        Ok(self.object_base.registry()?)
    }

    /// Get the test id (the node name), if one was set.
    pub fn test_id(&self) -> Option<String> {
        let name = self.object_base.name();
        (!name.is_empty()).then_some(name)
    }

    /// Set the test id.
    pub fn set_test_id(&self, id: impl Into<String>) {
        self.object_base.set_name(id);
    }

    /// Short type name of the component, without module path or generics.
    pub fn type_label(&self) -> String {
        self.registry()
            .and_then(|r| Ok(r.type_name(self.id())?))
            .map(short_type_name)
            .unwrap_or_else(|_| "Component".to_string())
    }

    // =========================================================================
    // Own State
    // =========================================================================

    fn state(&self) -> ComponentState {
        self.registry()
            .ok()
            .and_then(|r| r.component_state(self.id()).ok().flatten())
            .unwrap_or_default()
    }

    /// Whether the component itself is visible, ignoring ancestors.
    pub fn is_visible(&self) -> bool {
        self.state().visible
    }

    /// Set the own visible flag.
    ///
    /// Emits `visible_changed` if the flag actually changed.
    pub fn set_visible(&self, visible: bool) {
        if self.is_visible() == visible {
            return;
        }
        if let Ok(registry) = self.registry() {
            if registry.set_visible(self.id(), visible).is_ok() {
                self.visible_changed.emit(visible);
            }
        }
    }

    /// Whether the component itself is enabled, ignoring ancestors.
    pub fn is_enabled(&self) -> bool {
        self.state().enabled
    }

    /// Set the own enabled flag.
    ///
    /// Emits `enabled_changed` if the flag actually changed.
    pub fn set_enabled(&self, enabled: bool) {
        if self.is_enabled() == enabled {
            return;
        }
        if let Ok(registry) = self.registry() {
            if registry.set_enabled(self.id(), enabled).is_ok() {
                self.enabled_changed.emit(enabled);
            }
        }
    }

    // =========================================================================
    // Tree
    // =========================================================================

    /// Get the parent's object ID.
    pub fn parent_id(&self) -> Option<ObjectId> {
        self.object_base.parent()
    }

    /// Get the parent component, if the parent node has one attached.
    pub fn parent(&self) -> Option<Arc<dyn Component>> {
        let registry = self.registry().ok()?;
        resolve(&registry, self.parent_id()?)
    }

    /// Get the IDs of child nodes, in insertion order.
    pub fn children_ids(&self) -> Vec<ObjectId> {
        self.object_base.children()
    }

    /// Get the child components, in insertion order.
    pub fn children(&self) -> Vec<Arc<dyn Component>> {
        let Ok(registry) = self.registry() else {
            return Vec::new();
        };
        self.children_ids()
            .into_iter()
            .filter_map(|id| resolve(&registry, id))
            .collect()
    }

    /// Install a new component and append it as the last child.
    pub fn add_child<C: Component>(&self, child: C) -> HarnessResult<Arc<C>> {
        let child = install(child)?;
        child.base().object_base.set_parent(Some(self.id()))?;
        Ok(child)
    }

    /// Move an existing component under this one, as the last child.
    pub fn adopt(&self, child: &dyn Component) -> HarnessResult<()> {
        child.base().object_base.set_parent(Some(self.id()))?;
        Ok(())
    }

    /// Detach a child, leaving it as a root node.
    pub fn remove_child(&self, child: &dyn Component) -> HarnessResult<()> {
        if child.base().parent_id() == Some(self.id()) {
            child.base().object_base.set_parent(None)?;
        }
        Ok(())
    }

    /// Destroy every child node and its subtree.
    pub fn remove_all_children(&self) -> HarnessResult<()> {
        let registry = self.registry()?;
        for child in self.children_ids() {
            registry.destroy(child)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for ComponentBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentBase")
            .field("id", &self.id())
            .field("test_id", &self.test_id())
            .finish()
    }
}

/// Strip the module path and generic arguments from a type name.
pub(crate) fn short_type_name(type_name: &str) -> String {
    let without_generics = type_name.split('<').next().unwrap_or(type_name);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
        .to_string()
}
