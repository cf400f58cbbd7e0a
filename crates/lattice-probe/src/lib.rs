//! Headless testing harness for UI component trees.
//!
//! Tests build or navigate to a real component tree and drive it the way a
//! user would, without a browser or a server round trip:
//!
//! - **Environment**: a per-thread mock UI with routes and a session
//! - **Lookup**: find components by type, id, caption, text or value
//! - **Interactions**: clicks, value changes and grid clicks, refused for
//!   hidden, disabled or read-only components
//! - **Grids**: data providers, multi-key sorting and bit-exact text dumps
//!
//! # Example
//!
//! ```no_run
//! use lattice_probe::prelude::*;
//!
//! #[derive(Clone)]
//! struct Order {
//!     id: u32,
//!     total: f64,
//! }
//!
//! # fn login_view() -> VerticalLayout { VerticalLayout::new() }
//! # fn main() -> HarnessResult<()> {
//! let _env = TestEnvironment::set_up(Routes::new().route("", |_| login_view()))?;
//! navigate("")?;
//!
//! ui_find1_as::<TextField>(&SearchSpec::new().caption("User"))?.user_set_value("ada")?;
//! ui_find1(&SearchSpec::of::<Button>().caption("Log in"))?.user_click()?;
//!
//! let grid = ui_find1_as::<Grid<Order>>(&SearchSpec::new())?;
//! assert_eq!(dump(grid.as_ref(), 0..2)?, "--[Id]-[Total]--\n0: 1, 9.90\n1: 2, 4.50\n--and 3 more\n");
//! # Ok(())
//! # }
//! ```

pub mod component;
pub mod config;
pub mod data;
pub mod harness;

mod error;

pub use error::{HarnessError, HarnessResult, NotInteractableReason};
pub use harness::env::TestEnvironment;

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::component::widgets::{
        Button, CellRenderer, Checkbox, Column, Grid, HorizontalLayout, Html, IntegerField, Label,
        TextField, UiRoot, VerticalLayout,
    };
    pub use crate::component::{
        Component, ComponentBase, ComponentEvent, ComponentExt, KeyboardModifiers, MouseButton,
        TabularView, Value, ValueField,
    };
    pub use crate::config::HarnessConfig;
    pub use crate::data::{
        DataProvider, ListDataProvider, PagedDataProvider, Projector, SortDirection,
    };
    pub use crate::error::{HarnessError, HarnessResult, NotInteractableReason};
    pub use crate::harness::{
        EnvironmentGuard, NavigationErrorKind, Routes, SearchSpec, Simulate, TestEnvironment,
        click_item, click_renderer, current_view, double_click_item, dump, dump_default,
        expect_rows, find, find1, find1_as, find_as, get_component_at, navigate, session,
        sort_by_key, ui_expect_none, ui_expect_one, ui_find, ui_find1, ui_find1_as, ui_find_as,
        ui_root,
    };
    pub use lattice_probe_core::{Object, ObjectId};
    pub use regex::Regex;
}
