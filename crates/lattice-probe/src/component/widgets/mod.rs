//! Built-in components.

mod button;
mod checkbox;
mod grid;
mod label;
mod layout;
mod text_field;
mod ui_root;

pub use button::Button;
pub use checkbox::Checkbox;
pub use grid::{CellRenderer, Column, ColumnInfo, Grid, RendererKind, TabularView};
pub use label::{Html, Label};
pub use layout::{HorizontalLayout, VerticalLayout};
pub use text_field::{IntegerField, TextField};
pub use ui_root::UiRoot;

static_assertions::assert_impl_all!(Grid<String>: crate::component::Component, TabularView, Send, Sync);
static_assertions::assert_impl_all!(UiRoot: crate::component::Component, Send, Sync);
