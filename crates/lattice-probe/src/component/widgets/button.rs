//! Button component.
//!
//! # Example
//!
//! ```no_run
//! use lattice_probe::component::widgets::Button;
//!
//! let button = Button::new("Save");
//! button.clicked.connect(|event| {
//!     println!("clicked with {:?}", event.modifiers);
//! });
//! ```

use lattice_probe_core::{Object, ObjectId, Property, Signal};

use crate::component::{ClickEvent, Component, ComponentBase, ComponentEvent, unsupported_event};
use crate::error::HarnessResult;

/// A clickable button with a caption.
///
/// # Signals
///
/// - `clicked`: Emitted for every click, single or double
pub struct Button {
    base: ComponentBase,
    caption: Property<String>,

    /// Signal emitted when the button is clicked.
    pub clicked: Signal<ClickEvent>,
}

impl Button {
    /// Create a new button with the specified caption.
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            base: ComponentBase::new::<Self>(),
            caption: Property::new(caption.into()),
            clicked: Signal::new(),
        }
    }

    /// Set the caption.
    pub fn set_caption(&self, caption: impl Into<String>) {
        self.caption.set(caption.into());
    }
}

impl Object for Button {
    fn object_id(&self) -> ObjectId {
        self.base.id()
    }
}

impl Component for Button {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn caption(&self) -> Option<String> {
        Some(self.caption.get())
    }

    fn handle_event(&self, event: &ComponentEvent) -> HarnessResult<()> {
        match event {
            ComponentEvent::Click(click) => {
                self.clicked.emit(*click);
                Ok(())
            }
            _ => Err(unsupported_event(&self.base, event)),
        }
    }
}
