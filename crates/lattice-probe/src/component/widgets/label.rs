//! Label and raw HTML components.

use lattice_probe_core::{Object, ObjectId, Property};

use crate::component::{Component, ComponentBase};

/// A component that displays text.
pub struct Label {
    base: ComponentBase,
    text: Property<String>,
}

impl Label {
    /// Create a label with the specified text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            base: ComponentBase::new::<Self>(),
            text: Property::new(text.into()),
        }
    }

    /// Set the text.
    pub fn set_text(&self, text: impl Into<String>) {
        self.text.set(text.into());
    }
}

impl Object for Label {
    fn object_id(&self) -> ObjectId {
        self.base.id()
    }
}

impl Component for Label {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn text(&self) -> Option<String> {
        Some(self.text.get())
    }
}

/// A block of raw HTML.
///
/// The markup is not parsed into components, so the block is opaque to
/// lookups: nothing below it is ever found, even components attached to it
/// as children.
pub struct Html {
    base: ComponentBase,
    content: Property<String>,
}

impl Html {
    /// Create a block with the specified markup.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            base: ComponentBase::new::<Self>(),
            content: Property::new(content.into()),
        }
    }

    /// The raw markup.
    pub fn content(&self) -> String {
        self.content.get()
    }
}

impl Object for Html {
    fn object_id(&self) -> ObjectId {
        self.base.id()
    }
}

impl Component for Html {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn text(&self) -> Option<String> {
        Some(self.content.get())
    }

    fn is_opaque(&self) -> bool {
        true
    }
}
