//! Core systems for lattice-probe.
//!
//! This crate provides the substrate the testing harness manipulates:
//!
//! - **Object Model**: Arena registry of nodes with parent-child links, own
//!   visible/enabled state and attached instance handles
//! - **Thread Binding**: One registry per test thread, no global state
//! - **Signal/Slot System**: Synchronous, ordered listener chains
//! - **Property System**: Values with change detection
//! - **Logging**: `tracing` targets and object tree visualization
//!
//! # Signal/Slot Example
//!
//! ```
//! use lattice_probe_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Object Example
//!
//! ```
//! use std::sync::Arc;
//! use lattice_probe_core::{
//!     bind_thread_registry, unbind_thread_registry, Object, ObjectBase, ObjectId,
//!     SharedObjectRegistry,
//! };
//!
//! struct Panel {
//!     base: ObjectBase,
//! }
//!
//! impl Object for Panel {
//!     fn object_id(&self) -> ObjectId {
//!         self.base.id()
//!     }
//! }
//!
//! bind_thread_registry(Arc::new(SharedObjectRegistry::new())).unwrap();
//! let root = Panel { base: ObjectBase::new::<Panel>() };
//! let child = Panel { base: ObjectBase::new::<Panel>() };
//! child.base.set_parent(Some(root.object_id())).unwrap();
//! assert_eq!(root.base.children(), vec![child.object_id()]);
//! unbind_thread_registry();
//! ```

pub mod logging;
pub mod object;
pub mod property;
pub mod signal;

pub use logging::{ObjectTreeDebug, TreeFormatOptions};
pub use object::{
    ComponentState, Instance, Object, ObjectBase, ObjectError, ObjectId, ObjectRegistry,
    ObjectResult, SharedObjectRegistry, bind_thread_registry, current_registry,
    unbind_thread_registry,
};
pub use property::Property;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
