//! Native component events.
//!
//! Components react to [`ComponentEvent`]s delivered by the dispatcher and
//! re-emit them to their listeners as the typed event structs defined here.
//! Every event records whether it originated from a (simulated) user via
//! `from_client`; programmatic changes carry `false`.

use super::Value;

/// Keyboard modifier state for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held (Cmd on macOS).
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta/Super key is held.
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        control: true,
        ..Self::NONE
    };

    /// Alt modifier only.
    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };

    /// Meta modifier only.
    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    /// Primary button (usually left).
    #[default]
    Left,
    /// Secondary button (usually right).
    Right,
    /// Middle button (scroll wheel click).
    Middle,
}

/// A click on a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    pub button: MouseButton,
    pub modifiers: KeyboardModifiers,
    /// 1 for a single click, 2 for a double click.
    pub click_count: u32,
    pub from_client: bool,
}

impl ClickEvent {
    /// Check if this is a double click.
    pub fn is_double_click(&self) -> bool {
        self.click_count == 2
    }
}

/// A change of a field's value.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChangeEvent<V> {
    pub old_value: V,
    pub value: V,
    pub from_client: bool,
}

/// A click on a grid row.
#[derive(Debug, Clone)]
pub struct ItemClickEvent<T> {
    /// The clicked row item.
    pub item: T,
    /// Row index in the grid's current order.
    pub row: usize,
    /// Key of the clicked column, if known.
    pub column: Option<String>,
    pub button: MouseButton,
    pub modifiers: KeyboardModifiers,
    pub click_count: u32,
    pub from_client: bool,
}

/// A click on a button rendered inside a grid cell.
#[derive(Debug, Clone)]
pub struct RendererClickEvent<T> {
    /// The row item the button was rendered for.
    pub item: T,
    pub row: usize,
    /// Key of the column owning the renderer.
    pub column: String,
}

/// The event delivered into a component's listener chain.
///
/// Components translate these into their typed events; a component that does
/// not understand an event kind rejects it with
/// [`HarnessError::Unsupported`](crate::HarnessError::Unsupported).
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentEvent {
    /// A click on the component.
    Click(ClickEvent),
    /// A raw assignment of a new value.
    ValueChange { value: Value, from_client: bool },
    /// A click on a grid row.
    ItemClick {
        row: usize,
        column: Option<String>,
        button: MouseButton,
        modifiers: KeyboardModifiers,
        click_count: u32,
    },
    /// A click on a renderer-produced button in a grid cell.
    RendererClick { row: usize, column: String },
}

impl ComponentEvent {
    /// Short name of the event kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            ComponentEvent::Click(_) => "click",
            ComponentEvent::ValueChange { .. } => "value change",
            ComponentEvent::ItemClick { .. } => "item click",
            ComponentEvent::RendererClick { .. } => "renderer click",
        }
    }
}
