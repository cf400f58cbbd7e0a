//! Grid dumps and grid interactions.
//!
//! [`dump`] renders a deterministic text snapshot of a tabular component:
//!
//! ```text
//! --[Name]^-[Age]--
//! 0: Alice, 31
//! 1: Bob, 27
//! --and 5 more
//! ```
//!
//! The header lists the visible columns with a `^` (ascending) or `v`
//! (descending) marker on sorted ones. Row lines carry the absolute row
//! index. The footer counts the rows left out and is omitted when the dump
//! covers the whole table.

use std::fmt::Write as _;
use std::ops::Range;
use std::sync::Arc;

use lattice_probe_core::logging::targets;

use crate::component::{Component, KeyboardModifiers, MouseButton, TabularView};
use crate::component::widgets::RendererKind;
use crate::data::SortDirection;
use crate::error::{HarnessError, HarnessResult};
use crate::harness::dispatch::{self, Interaction, InteractionRequest, simulate};
use crate::harness::env;
use crate::harness::state::describe;

/// Render the rows of `rows` that exist, with header and footer.
///
/// The range is clamped to `[0, row_count)`; the header is rendered even for
/// an empty range. Fails with [`HarnessError::Unsupported`] for a table whose
/// size is unknown.
pub fn dump(table: &dyn TabularView, rows: Range<usize>) -> HarnessResult<String> {
    let size = table.row_count()?;
    let start = rows.start.min(size);
    let end = rows.end.min(size).max(start);

    let mut output = String::from("--");
    let header: Vec<String> = table
        .columns()
        .iter()
        .filter(|column| column.visible)
        .map(|column| match column.sort {
            Some(direction) => format!("[{}]{}", column.label(), direction.marker()),
            None => format!("[{}]", column.label()),
        })
        .collect();
    output.push_str(&header.join("-"));
    output.push_str("--\n");

    let rendered = table.render_rows(start..end)?;
    for (offset, cells) in rendered.iter().enumerate() {
        let _ = writeln!(output, "{}: {}", start + offset, cells.join(", "));
    }

    let more = size - rendered.len();
    if more > 0 {
        let _ = writeln!(output, "--and {more} more");
    }

    tracing::trace!(target: targets::DATA, size, start, end, "dumped table");
    Ok(output)
}

/// [`dump`] of the first `[dump] default_rows` rows.
pub fn dump_default(table: &dyn TabularView) -> HarnessResult<String> {
    dump(table, 0..env::config().dump.default_rows)
}

/// The tabular capability of a component.
pub fn tabular(component: &dyn Component) -> HarnessResult<&dyn TabularView> {
    component.as_tabular().ok_or_else(|| {
        HarnessError::unsupported(format!("{} is not tabular", describe(component)))
    })
}

/// The component a component renderer produced for a cell.
///
/// Fails with [`HarnessError::NoComponentInCell`] when the column renders
/// text or buttons, and with [`HarnessError::NoSuchColumn`] for an unknown
/// column.
pub fn get_component_at(
    table: &dyn TabularView,
    row: usize,
    column: &str,
) -> HarnessResult<Arc<dyn Component>> {
    table.component_at(row, column)
}

/// The formatted cells of one row.
///
/// Past the end of a table of unknown size, the error reports the number
/// of rows found by scanning.
pub fn formatted_row(table: &dyn TabularView, row: usize) -> HarnessResult<Vec<String>> {
    let mut rendered = table.render_rows(row..row.saturating_add(1))?;
    if rendered.is_empty() {
        let actual = match table.row_count() {
            Ok(count) => count,
            Err(HarnessError::Unsupported { .. }) => table.count_rows_up_to(row)?,
            Err(error) => return Err(error),
        };
        return Err(HarnessError::IndexOutOfRange {
            requested: row,
            actual,
        });
    }
    Ok(rendered.remove(0))
}

/// Fail unless the table has exactly `expected` rows.
pub fn expect_rows(table: &dyn TabularView, expected: usize) -> HarnessResult<()> {
    let actual = table.row_count()?;
    if actual != expected {
        return Err(HarnessError::RowCountMismatch {
            expected,
            actual,
            dump: dump(table, 0..env::config().dump.default_rows)?,
        });
    }
    Ok(())
}

/// Sort by a single column.
pub fn sort_by_key(
    table: &dyn TabularView,
    column: &str,
    direction: SortDirection,
) -> HarnessResult<()> {
    table.sort_by(vec![(column.to_string(), direction)])
}

/// Click a row like a user would.
pub fn click_item(component: &dyn Component, row: usize) -> HarnessResult<()> {
    click_item_with(component, row, None, MouseButton::Left, KeyboardModifiers::NONE)
}

/// Click a row, optionally in a specific column, with a given button and
/// modifier keys.
pub fn click_item_with(
    component: &dyn Component,
    row: usize,
    column: Option<&str>,
    button: MouseButton,
    modifiers: KeyboardModifiers,
) -> HarnessResult<()> {
    item_click(component, row, column, button, modifiers, 1)
}

/// Double-click a row. Listeners of single clicks see the event too.
pub fn double_click_item(component: &dyn Component, row: usize) -> HarnessResult<()> {
    item_click(component, row, None, MouseButton::Left, KeyboardModifiers::NONE, 2)
}

fn item_click(
    component: &dyn Component,
    row: usize,
    column: Option<&str>,
    button: MouseButton,
    modifiers: KeyboardModifiers,
    click_count: u32,
) -> HarnessResult<()> {
    tabular(component)?;
    simulate(InteractionRequest::new(
        component,
        Interaction::ItemClick {
            row,
            column: column.map(str::to_string),
            button,
            modifiers,
            click_count,
        },
    ))
}

/// Click whatever a column rendered into a cell.
///
/// A button column emits its click signal; a component column clicks the
/// produced component, which must itself be interactable. Text columns
/// cannot be clicked this way.
pub fn click_renderer(component: &dyn Component, row: usize, column: &str) -> HarnessResult<()> {
    let table = tabular(component)?;
    let columns = table.columns();
    let Some(info) = columns.iter().find(|info| info.key == column) else {
        return Err(HarnessError::NoSuchColumn {
            key: column.to_string(),
            available: columns.iter().map(|info| info.key.clone()).collect(),
        });
    };

    match info.renderer {
        RendererKind::Button => simulate(InteractionRequest::new(
            component,
            Interaction::RendererClick {
                row,
                column: column.to_string(),
            },
        )),
        RendererKind::Component => {
            let cell = table.component_at(row, column)?;
            dispatch::click(cell.as_ref())
        }
        RendererKind::Text => Err(HarnessError::unsupported(format!(
            "renderer click on text column '{column}'"
        ))),
    }
}
