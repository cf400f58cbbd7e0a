//! Object model for lattice-probe.
//!
//! Provides the node tree every component lives in:
//! - Unique object identifiers via arena-based storage
//! - Parent-child relationships with cascade destroy
//! - Own visible/enabled state per node, folded over ancestors on demand
//! - A type-erased instance slot, so a node can be resolved back to the
//!   component that owns it
//! - A registry bound to the current thread, so each test thread works on its
//!   own tree
//!
//! # Key Types
//!
//! - [`Object`] - Base trait that all objects implement
//! - [`ObjectBase`] - Helper struct for implementing [`Object`]
//! - [`ObjectId`] - Unique stable identifier for each object
//! - [`ObjectRegistry`] - Arena managing all objects of one tree
//! - [`SharedObjectRegistry`] - Lock-protected wrapper around [`ObjectRegistry`]
//!
//! # Thread Binding
//!
//! Objects register themselves into the registry bound to the calling thread
//! (see [`bind_thread_registry`]). Nothing is global: two test threads never
//! observe each other's objects.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for an object in the registry.
    ///
    /// `ObjectId`s are stable handles that remain valid even as the object tree changes.
    /// They become invalid when the object is destroyed.
    pub struct ObjectId;
}

/// Errors that can occur during object operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectError {
    /// The object ID is invalid or has been destroyed.
    InvalidObjectId,
    /// Attempted to set an object as its own parent/ancestor.
    CircularParentage,
    /// No object registry is bound to the current thread.
    RegistryNotInitialized,
    /// A registry is already bound to the current thread.
    RegistryAlreadyBound,
}

impl fmt::Display for ObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidObjectId => write!(f, "Invalid or destroyed object ID"),
            Self::CircularParentage => {
                write!(f, "Cannot set an object as its own parent or ancestor")
            }
            Self::RegistryNotInitialized => {
                write!(f, "No object registry is bound to the current thread")
            }
            Self::RegistryAlreadyBound => {
                write!(f, "An object registry is already bound to the current thread")
            }
        }
    }
}

impl std::error::Error for ObjectError {}

/// Result type for object operations.
pub type ObjectResult<T> = std::result::Result<T, ObjectError>;

/// Own state of a component node, not considering ancestors.
///
/// Stored in the registry rather than in the component so that ancestor
/// state can be queried by [`ObjectId`] alone. Objects registered without a
/// state have no visible/enabled concept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComponentState {
    /// Whether the component is visible (its own flag).
    pub visible: bool,
    /// Whether the component is enabled (its own flag).
    pub enabled: bool,
}

impl Default for ComponentState {
    fn default() -> Self {
        Self {
            visible: true,
            enabled: true,
        }
    }
}

/// A type-erased instance handle attached to a node.
pub type Instance = Box<dyn Any + Send + Sync>;

/// Internal data stored in the registry for each object.
struct ObjectData {
    /// Human-readable name for debugging and lookup.
    name: String,
    /// The type ID of the concrete Object implementation.
    type_id: TypeId,
    /// The type name for debugging.
    type_name: &'static str,
    /// Parent object (if any).
    parent: Option<ObjectId>,
    /// Child objects, in insertion order.
    children: Vec<ObjectId>,
    /// Own component state (None for objects without the concept).
    state: Option<ComponentState>,
    /// Handle to the owning instance, if one was attached.
    instance: Option<Instance>,
}

impl ObjectData {
    fn new(type_id: TypeId, type_name: &'static str) -> Self {
        Self {
            name: String::new(),
            type_id,
            type_name,
            parent: None,
            children: Vec::new(),
            state: None,
            instance: None,
        }
    }
}

/// The registry that manages all objects of one tree and their relationships.
///
/// Uses arena-based storage via SlotMap for stable object IDs and efficient
/// parent-child relationship management.
pub struct ObjectRegistry {
    objects: SlotMap<ObjectId, ObjectData>,
}

impl ObjectRegistry {
    /// Create a new empty object registry.
    pub fn new() -> Self {
        Self {
            objects: SlotMap::with_key(),
        }
    }

    /// Register a new object and return its ID.
    pub fn register<T: Object + 'static>(&mut self) -> ObjectId {
        let data = ObjectData::new(TypeId::of::<T>(), std::any::type_name::<T>());
        let id = self.objects.insert(data);
        tracing::trace!(target: targets::OBJECT, ?id, type_name = std::any::type_name::<T>(), "registered object");
        id
    }

    /// Remove an object and all its descendants from the registry.
    ///
    /// Returns the instance handles that were attached to the removed nodes.
    /// Callers holding a lock should drop them only after releasing it, since
    /// dropping an instance may re-enter the registry.
    #[tracing::instrument(skip(self), target = "lattice_probe_core::object", level = "trace")]
    pub fn destroy(&mut self, id: ObjectId) -> ObjectResult<Vec<Instance>> {
        let descendants = self.collect_descendants(id)?;
        tracing::trace!(target: targets::OBJECT, ?id, descendant_count = descendants.len(), "destroying object tree");

        if let Some(parent_id) = self.objects.get(id).and_then(|d| d.parent) {
            if let Some(parent_data) = self.objects.get_mut(parent_id) {
                parent_data.children.retain(|&child| child != id);
            }
        }

        let mut detached = Vec::new();
        for child_id in descendants.into_iter().chain(std::iter::once(id)) {
            if let Some(instance) = self.objects.remove(child_id).and_then(|d| d.instance) {
                detached.push(instance);
            }
        }
        Ok(detached)
    }

    /// Collect all descendant IDs, children before parents.
    fn collect_descendants(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        let mut result = Vec::new();
        self.collect_descendants_recursive(id, &mut result)?;
        Ok(result)
    }

    fn collect_descendants_recursive(
        &self,
        id: ObjectId,
        result: &mut Vec<ObjectId>,
    ) -> ObjectResult<()> {
        let data = self.objects.get(id).ok_or(ObjectError::InvalidObjectId)?;
        for &child_id in &data.children {
            self.collect_descendants_recursive(child_id, result)?;
            result.push(child_id);
        }
        Ok(())
    }

    /// Remove every object, returning all attached instance handles.
    pub fn drain(&mut self) -> Vec<Instance> {
        let detached = self
            .objects
            .drain()
            .filter_map(|(_, data)| data.instance)
            .collect::<Vec<_>>();
        tracing::trace!(target: targets::OBJECT, instance_count = detached.len(), "drained registry");
        detached
    }

    /// Check if an object exists in the registry.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Set the parent of an object.
    ///
    /// This handles removing from the old parent and appending to the new parent.
    /// Passing `None` makes the object a root object.
    pub fn set_parent(&mut self, id: ObjectId, new_parent: Option<ObjectId>) -> ObjectResult<()> {
        if !self.objects.contains_key(id) {
            return Err(ObjectError::InvalidObjectId);
        }

        if let Some(parent_id) = new_parent {
            if !self.objects.contains_key(parent_id) {
                return Err(ObjectError::InvalidObjectId);
            }
            if self.is_ancestor_of(id, parent_id) {
                return Err(ObjectError::CircularParentage);
            }
        }

        let old_parent = self.objects.get(id).and_then(|d| d.parent);
        if let Some(old_parent_id) = old_parent {
            if let Some(parent_data) = self.objects.get_mut(old_parent_id) {
                parent_data.children.retain(|&child| child != id);
            }
        }

        if let Some(data) = self.objects.get_mut(id) {
            data.parent = new_parent;
        }

        if let Some(parent_id) = new_parent {
            if let Some(parent_data) = self.objects.get_mut(parent_id) {
                parent_data.children.push(id);
            }
        }

        tracing::trace!(target: targets::OBJECT, ?id, ?new_parent, "reparented object");
        Ok(())
    }

    /// Check if `potential_ancestor` is `id` or one of its ancestors.
    fn is_ancestor_of(&self, potential_ancestor: ObjectId, id: ObjectId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == potential_ancestor {
                return true;
            }
            current = self.objects.get(current_id).and_then(|d| d.parent);
        }
        false
    }

    /// Get the parent of an object.
    pub fn parent(&self, id: ObjectId) -> ObjectResult<Option<ObjectId>> {
        self.objects
            .get(id)
            .map(|d| d.parent)
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Get the children of an object.
    pub fn children(&self, id: ObjectId) -> ObjectResult<&[ObjectId]> {
        self.objects
            .get(id)
            .map(|d| d.children.as_slice())
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Get the object's name.
    pub fn object_name(&self, id: ObjectId) -> ObjectResult<&str> {
        self.objects
            .get(id)
            .map(|d| d.name.as_str())
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Set the object's name.
    pub fn set_object_name(&mut self, id: ObjectId, name: String) -> ObjectResult<()> {
        self.objects
            .get_mut(id)
            .map(|d| d.name = name)
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Get the type ID of an object.
    pub fn type_id(&self, id: ObjectId) -> ObjectResult<TypeId> {
        self.objects
            .get(id)
            .map(|d| d.type_id)
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Get the type name of an object.
    pub fn type_name(&self, id: ObjectId) -> ObjectResult<&'static str> {
        self.objects
            .get(id)
            .map(|d| d.type_name)
            .ok_or(ObjectError::InvalidObjectId)
    }

    // =========================================================================
    // Component State
    // =========================================================================

    /// Initialize the component state of an object.
    pub fn init_component_state(&mut self, id: ObjectId, state: ComponentState) -> ObjectResult<()> {
        let data = self.objects.get_mut(id).ok_or(ObjectError::InvalidObjectId)?;
        data.state = Some(state);
        Ok(())
    }

    /// Get the own component state of an object.
    ///
    /// Returns `None` if the object has no visible/enabled concept.
    pub fn component_state(&self, id: ObjectId) -> ObjectResult<Option<ComponentState>> {
        let data = self.objects.get(id).ok_or(ObjectError::InvalidObjectId)?;
        Ok(data.state)
    }

    /// Set the own visible flag.
    pub fn set_visible(&mut self, id: ObjectId, visible: bool) -> ObjectResult<()> {
        let data = self.objects.get_mut(id).ok_or(ObjectError::InvalidObjectId)?;
        data.state.get_or_insert_with(ComponentState::default).visible = visible;
        Ok(())
    }

    /// Set the own enabled flag.
    pub fn set_enabled(&mut self, id: ObjectId, enabled: bool) -> ObjectResult<()> {
        let data = self.objects.get_mut(id).ok_or(ObjectError::InvalidObjectId)?;
        data.state.get_or_insert_with(ComponentState::default).enabled = enabled;
        Ok(())
    }

    /// Check if an object is effectively visible (itself and all ancestors are visible).
    ///
    /// Nodes without a component state, the object itself included, count as visible.
    pub fn is_effectively_visible(&self, id: ObjectId) -> ObjectResult<bool> {
        self.fold_state(id, |state| state.visible)
    }

    /// Check if an object is effectively enabled (itself and all ancestors are enabled).
    ///
    /// Nodes without a component state, the object itself included, count as enabled.
    pub fn is_effectively_enabled(&self, id: ObjectId) -> ObjectResult<bool> {
        self.fold_state(id, |state| state.enabled)
    }

    fn fold_state(&self, id: ObjectId, flag: impl Fn(&ComponentState) -> bool) -> ObjectResult<bool> {
        if !self.objects.contains_key(id) {
            return Err(ObjectError::InvalidObjectId);
        }

        let mut current = Some(id);
        while let Some(current_id) = current {
            let Some(data) = self.objects.get(current_id) else {
                break;
            };
            if data.state.as_ref().is_some_and(|s| !flag(s)) {
                return Ok(false);
            }
            current = data.parent;
        }

        Ok(true)
    }

    // =========================================================================
    // Instances
    // =========================================================================

    /// Attach a type-erased instance handle to an object.
    ///
    /// Returns the previously attached handle, if any. As with
    /// [`destroy`](Self::destroy), drop it outside of any registry lock.
    pub fn attach_instance(
        &mut self,
        id: ObjectId,
        instance: Instance,
    ) -> ObjectResult<Option<Instance>> {
        let data = self.objects.get_mut(id).ok_or(ObjectError::InvalidObjectId)?;
        Ok(data.instance.replace(instance))
    }

    /// Get a clone of the instance handle attached to an object.
    ///
    /// Returns `None` when nothing is attached or the handle is not a `T`.
    pub fn instance<T: Any + Clone>(&self, id: ObjectId) -> ObjectResult<Option<T>> {
        let data = self.objects.get(id).ok_or(ObjectError::InvalidObjectId)?;
        Ok(data
            .instance
            .as_ref()
            .and_then(|i| i.downcast_ref::<T>())
            .cloned())
    }

    /// Get the number of registered objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Iterate over all root objects (objects with no parent).
    pub fn root_objects(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects
            .iter()
            .filter(|(_, data)| data.parent.is_none())
            .map(|(id, _)| id)
    }

    // =========================================================================
    // Tree Traversal
    // =========================================================================

    /// Get all ancestors of an object from immediate parent to root.
    pub fn ancestors(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        if !self.objects.contains_key(id) {
            return Err(ObjectError::InvalidObjectId);
        }

        let mut result = Vec::new();
        let mut current = self.objects.get(id).and_then(|d| d.parent);

        while let Some(current_id) = current {
            result.push(current_id);
            current = self.objects.get(current_id).and_then(|d| d.parent);
        }

        Ok(result)
    }

}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A lock-protected wrapper around [`ObjectRegistry`].
///
/// Instance handles removed from the registry are always dropped after the
/// write lock is released.
pub struct SharedObjectRegistry {
    inner: RwLock<ObjectRegistry>,
}

impl SharedObjectRegistry {
    /// Create a new shared object registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(ObjectRegistry::new()),
        }
    }

    /// Register a new object.
    pub fn register<T: Object + 'static>(&self) -> ObjectId {
        self.inner.write().register::<T>()
    }

    /// Destroy an object and its descendants.
    pub fn destroy(&self, id: ObjectId) -> ObjectResult<()> {
        let detached = self.inner.write().destroy(id)?;
        drop(detached);
        Ok(())
    }

    /// Remove every object from the registry.
    pub fn clear(&self) {
        let detached = self.inner.write().drain();
        drop(detached);
    }

    /// Check if an object exists.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.inner.read().contains(id)
    }

    /// Set the parent of an object.
    pub fn set_parent(&self, id: ObjectId, parent: Option<ObjectId>) -> ObjectResult<()> {
        self.inner.write().set_parent(id, parent)
    }

    /// Get the parent of an object.
    pub fn parent(&self, id: ObjectId) -> ObjectResult<Option<ObjectId>> {
        self.inner.read().parent(id)
    }

    /// Get the children of an object (returns owned Vec for thread safety).
    pub fn children(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        self.inner.read().children(id).map(|c| c.to_vec())
    }

    /// Get the object's name.
    pub fn object_name(&self, id: ObjectId) -> ObjectResult<String> {
        self.inner.read().object_name(id).map(|s| s.to_string())
    }

    /// Set the object's name.
    pub fn set_object_name(&self, id: ObjectId, name: String) -> ObjectResult<()> {
        self.inner.write().set_object_name(id, name)
    }

    /// Get the type name of an object.
    pub fn type_name(&self, id: ObjectId) -> ObjectResult<&'static str> {
        self.inner.read().type_name(id)
    }

    /// Initialize the component state of an object.
    pub fn init_component_state(&self, id: ObjectId, state: ComponentState) -> ObjectResult<()> {
        self.inner.write().init_component_state(id, state)
    }

    /// Get the own component state of an object.
    pub fn component_state(&self, id: ObjectId) -> ObjectResult<Option<ComponentState>> {
        self.inner.read().component_state(id)
    }

    /// Set the own visible flag.
    pub fn set_visible(&self, id: ObjectId, visible: bool) -> ObjectResult<()> {
        self.inner.write().set_visible(id, visible)
    }

    /// Set the own enabled flag.
    pub fn set_enabled(&self, id: ObjectId, enabled: bool) -> ObjectResult<()> {
        self.inner.write().set_enabled(id, enabled)
    }

    /// Check if an object is effectively visible.
    pub fn is_effectively_visible(&self, id: ObjectId) -> ObjectResult<bool> {
        self.inner.read().is_effectively_visible(id)
    }

    /// Check if an object is effectively enabled.
    pub fn is_effectively_enabled(&self, id: ObjectId) -> ObjectResult<bool> {
        self.inner.read().is_effectively_enabled(id)
    }

    /// Attach a type-erased instance handle to an object.
    pub fn attach_instance(&self, id: ObjectId, instance: Instance) -> ObjectResult<()> {
        let previous = self.inner.write().attach_instance(id, instance)?;
        drop(previous);
        Ok(())
    }

    /// Get a clone of the instance handle attached to an object.
    pub fn instance<T: Any + Clone>(&self, id: ObjectId) -> ObjectResult<Option<T>> {
        self.inner.read().instance::<T>(id)
    }

    /// Get the number of registered objects.
    pub fn object_count(&self) -> usize {
        self.inner.read().object_count()
    }

    /// Get all ancestors of an object from immediate parent to root.
    pub fn ancestors(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        self.inner.read().ancestors(id)
    }
}

impl Default for SharedObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static THREAD_REGISTRY: RefCell<Option<Arc<SharedObjectRegistry>>> = const { RefCell::new(None) };
}

/// Bind a registry to the current thread.
///
/// Fails with [`ObjectError::RegistryAlreadyBound`] if one is already bound.
pub fn bind_thread_registry(registry: Arc<SharedObjectRegistry>) -> ObjectResult<()> {
    THREAD_REGISTRY.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_some() {
            return Err(ObjectError::RegistryAlreadyBound);
        }
        *slot = Some(registry);
        tracing::debug!(target: targets::OBJECT, "bound object registry to thread");
        Ok(())
    })
}

/// Unbind the registry from the current thread, returning it.
pub fn unbind_thread_registry() -> Option<Arc<SharedObjectRegistry>> {
    let registry = THREAD_REGISTRY.with(|slot| slot.borrow_mut().take());
    if registry.is_some() {
        tracing::debug!(target: targets::OBJECT, "unbound object registry from thread");
    }
    registry
}

/// Get the registry bound to the current thread.
pub fn current_registry() -> ObjectResult<Arc<SharedObjectRegistry>> {
    THREAD_REGISTRY
        .with(|slot| slot.borrow().clone())
        .ok_or(ObjectError::RegistryNotInitialized)
}

/// The base trait that all objects must implement.
pub trait Object: Any + Send + Sync {
    /// Get this object's unique identifier.
    fn object_id(&self) -> ObjectId;
}

/// Helper for implementing the [`Object`] trait.
///
/// Include this as a field in your object types. On construction it registers
/// the object in the registry bound to the current thread; on drop it removes
/// the object again if that registry is still alive.
pub struct ObjectBase {
    id: ObjectId,
    registry: Weak<SharedObjectRegistry>,
}

impl ObjectBase {
    /// Create a new ObjectBase, registering the object in the thread registry.
    ///
    /// # Panics
    ///
    /// Panics if no registry is bound to the current thread.
    pub fn new<T: Object + 'static>() -> Self {
        Self::try_new::<T>().expect("Object registry not bound to this thread")
    }

    /// Create a new ObjectBase, failing if no registry is bound to the current thread.
    pub fn try_new<T: Object + 'static>() -> ObjectResult<Self> {
        let registry = current_registry()?;
        let id = registry.register::<T>();
        Ok(Self {
            id,
            registry: Arc::downgrade(&registry),
        })
    }

    /// Get the object's ID.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Get the registry this object lives in.
    pub fn registry(&self) -> ObjectResult<Arc<SharedObjectRegistry>> {
        self.registry
            .upgrade()
            .ok_or(ObjectError::RegistryNotInitialized)
    }

    /// Get the object's name from the registry.
    pub fn name(&self) -> String {
        self.registry()
            .and_then(|r| r.object_name(self.id))
            .unwrap_or_default()
    }

    /// Set the object's name in the registry.
    pub fn set_name(&self, name: impl Into<String>) {
        if let Ok(registry) = self.registry() {
            let _ = registry.set_object_name(self.id, name.into());
        }
    }

    /// Get the parent object ID.
    pub fn parent(&self) -> Option<ObjectId> {
        self.registry()
            .and_then(|r| r.parent(self.id))
            .ok()
            .flatten()
    }

    /// Set the parent object.
    pub fn set_parent(&self, parent: Option<ObjectId>) -> ObjectResult<()> {
        self.registry()?.set_parent(self.id, parent)
    }

    /// Get child object IDs.
    pub fn children(&self) -> Vec<ObjectId> {
        self.registry()
            .and_then(|r| r.children(self.id))
            .unwrap_or_default()
    }

    /// Get all ancestors from immediate parent to root.
    pub fn ancestors(&self) -> Vec<ObjectId> {
        self.registry()
            .and_then(|r| r.ancestors(self.id))
            .unwrap_or_default()
    }
}

impl Drop for ObjectBase {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if registry.contains(self.id) {
                let _ = registry.destroy(self.id);
            }
        }
    }
}

impl fmt::Debug for ObjectBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectBase").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        base: ObjectBase,
    }

    impl Object for Item {
        fn object_id(&self) -> ObjectId {
            self.base.id()
        }
    }

    struct Bound;

    impl Bound {
        fn new() -> Self {
            let _ = unbind_thread_registry();
            bind_thread_registry(Arc::new(SharedObjectRegistry::new())).unwrap();
            Self
        }
    }

    impl Drop for Bound {
        fn drop(&mut self) {
            let _ = unbind_thread_registry();
        }
    }

    fn node(registry: &mut ObjectRegistry, state: Option<ComponentState>) -> ObjectId {
        let id = registry.register::<Item>();
        if let Some(state) = state {
            registry.init_component_state(id, state).unwrap();
        }
        id
    }

    #[test]
    fn test_parent_child_links() {
        let mut registry = ObjectRegistry::new();
        let root = node(&mut registry, None);
        let a = node(&mut registry, None);
        let b = node(&mut registry, None);

        registry.set_parent(a, Some(root)).unwrap();
        registry.set_parent(b, Some(root)).unwrap();

        assert_eq!(registry.children(root).unwrap(), &[a, b]);
        assert_eq!(registry.parent(a).unwrap(), Some(root));
        assert_eq!(registry.root_objects().collect::<Vec<_>>(), vec![root]);
    }

    #[test]
    fn test_circular_parentage_rejected() {
        let mut registry = ObjectRegistry::new();
        let root = node(&mut registry, None);
        let child = node(&mut registry, None);
        registry.set_parent(child, Some(root)).unwrap();

        assert_eq!(
            registry.set_parent(root, Some(child)),
            Err(ObjectError::CircularParentage)
        );
        assert_eq!(
            registry.set_parent(root, Some(root)),
            Err(ObjectError::CircularParentage)
        );
    }

    #[test]
    fn test_reparent_moves_child() {
        let mut registry = ObjectRegistry::new();
        let first = node(&mut registry, None);
        let second = node(&mut registry, None);
        let child = node(&mut registry, None);

        registry.set_parent(child, Some(first)).unwrap();
        registry.set_parent(child, Some(second)).unwrap();

        assert!(registry.children(first).unwrap().is_empty());
        assert_eq!(registry.children(second).unwrap(), &[child]);
    }

    #[test]
    fn test_effective_state_folds_over_ancestors() {
        let mut registry = ObjectRegistry::new();
        let root = node(&mut registry, Some(ComponentState::default()));
        let middle = node(&mut registry, Some(ComponentState::default()));
        let leaf = node(&mut registry, Some(ComponentState::default()));
        registry.set_parent(middle, Some(root)).unwrap();
        registry.set_parent(leaf, Some(middle)).unwrap();

        assert!(registry.is_effectively_visible(leaf).unwrap());

        registry.set_visible(root, false).unwrap();
        assert!(!registry.is_effectively_visible(leaf).unwrap());
        assert!(registry.is_effectively_enabled(leaf).unwrap());

        registry.set_visible(root, true).unwrap();
        registry.set_enabled(middle, false).unwrap();
        assert!(registry.is_effectively_visible(leaf).unwrap());
        assert!(!registry.is_effectively_enabled(leaf).unwrap());
        assert!(registry.is_effectively_enabled(root).unwrap());
    }

    #[test]
    fn test_stateless_nodes_count_as_visible_and_enabled() {
        let mut registry = ObjectRegistry::new();
        let root = node(&mut registry, Some(ComponentState::default()));
        let plain = node(&mut registry, None);
        let leaf = node(&mut registry, Some(ComponentState::default()));
        registry.set_parent(plain, Some(root)).unwrap();
        registry.set_parent(leaf, Some(plain)).unwrap();

        assert!(registry.is_effectively_visible(plain).unwrap());
        assert!(registry.is_effectively_enabled(plain).unwrap());
        assert!(registry.is_effectively_visible(leaf).unwrap());

        registry.set_enabled(root, false).unwrap();
        assert!(!registry.is_effectively_enabled(plain).unwrap());
        assert!(!registry.is_effectively_enabled(leaf).unwrap());
        assert_eq!(
            registry.is_effectively_visible(ObjectId::default()),
            Err(ObjectError::InvalidObjectId)
        );
    }

    #[test]
    fn test_destroy_cascades_and_returns_instances() {
        let mut registry = ObjectRegistry::new();
        let root = node(&mut registry, None);
        let child = node(&mut registry, None);
        registry.set_parent(child, Some(root)).unwrap();
        registry
            .attach_instance(child, Box::new(Arc::new(7_u32)))
            .unwrap();

        let detached = registry.destroy(root).unwrap();

        assert_eq!(detached.len(), 1);
        assert!(!registry.contains(root));
        assert!(!registry.contains(child));
    }

    #[test]
    fn test_instance_downcast() {
        let mut registry = ObjectRegistry::new();
        let id = node(&mut registry, None);
        registry
            .attach_instance(id, Box::new(Arc::new(String::from("payload"))))
            .unwrap();

        let payload = registry.instance::<Arc<String>>(id).unwrap();
        assert_eq!(payload.as_deref().map(String::as_str), Some("payload"));
        assert!(registry.instance::<Arc<u32>>(id).unwrap().is_none());
    }

    #[test]
    fn test_ancestors_run_from_parent_to_root() {
        let mut registry = ObjectRegistry::new();
        let root = node(&mut registry, None);
        let a = node(&mut registry, None);
        let b = node(&mut registry, None);
        let a1 = node(&mut registry, None);
        registry.set_parent(a, Some(root)).unwrap();
        registry.set_parent(b, Some(root)).unwrap();
        registry.set_parent(a1, Some(a)).unwrap();

        assert_eq!(registry.ancestors(a1).unwrap(), vec![a, root]);
    }

    #[test]
    fn test_object_base_requires_thread_registry() {
        let _ = unbind_thread_registry();
        assert_eq!(
            ObjectBase::try_new::<Item>().err(),
            Some(ObjectError::RegistryNotInitialized)
        );
    }

    #[test]
    fn test_object_base_registers_and_unregisters() {
        let _bound = Bound::new();
        let registry = current_registry().unwrap();

        let probe = Item {
            base: ObjectBase::new::<Item>(),
        };
        probe.base.set_name("probe");
        let id = probe.object_id();
        assert!(registry.contains(id));
        assert_eq!(probe.base.name(), "probe");

        drop(probe);
        assert!(!registry.contains(id));
    }

    #[test]
    fn test_double_bind_rejected() {
        let _bound = Bound::new();
        assert_eq!(
            bind_thread_registry(Arc::new(SharedObjectRegistry::new())),
            Err(ObjectError::RegistryAlreadyBound)
        );
    }
}
