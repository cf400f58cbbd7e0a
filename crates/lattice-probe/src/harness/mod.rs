//! The testing harness.
//!
//! - [`state`]: effective visibility and enabled state
//! - [`guard`]: interactability checks run before every simulated action
//! - [`dispatch`]: simulated user interactions
//! - [`locator`]: component lookup
//! - [`grid`]: grid dumps and grid interactions
//! - [`routes`] and [`env`]: the mock environment tests run in

pub mod dispatch;
pub mod env;
pub mod grid;
pub mod guard;
pub mod locator;
pub mod routes;
pub mod state;

pub use dispatch::{
    Interaction, InteractionRequest, Simulate, click, click_with, dispatch, double_click,
    fire_event, fire_value_change, set_value, simulate,
};
pub use env::{
    EnvironmentGuard, MockSession, TestEnvironment, TestEnvironmentBuilder, current_location,
    current_view, navigate, session, ui_root,
};
pub use grid::{
    click_item, click_item_with, click_renderer, double_click_item, dump, dump_default,
    expect_rows, formatted_row, get_component_at, sort_by_key, tabular,
};
pub use guard::{assert_editable, assert_not_editable, blocking_reason, is_editable};
pub use locator::{
    SearchSpec, expect_count, expect_none, expect_one, find, find1, find1_as, find_as,
    find_matching, tree_dump, ui_expect_count, ui_expect_none, ui_expect_one, ui_find, ui_find1,
    ui_find1_as, ui_find_as,
};
pub use routes::{
    NavigationError, NavigationErrorKind, ResolvedRoute, RouteParameters, Routes, ViewRegistry,
};
pub use state::{describe, is_effectively_enabled, is_effectively_visible, path};
