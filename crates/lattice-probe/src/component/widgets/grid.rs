//! Data-bound grid component.
//!
//! A [`Grid`] shows the items of a [`DataProvider`] as rows and its
//! [`Column`]s as cells. Each column renders its cells in one of three ways:
//!
//! - **text**: a formatter from row item to string
//! - **button**: a clickable button whose label is derived from the item
//! - **component**: a factory producing a full component per cell
//!
//! Component cells are materialized lazily, registered as children of the
//! grid and cached per `(row, column)` until the sort, the filter or the data
//! changes.
//!
//! Grids are opaque to the component locator: their children are cell
//! components, reached through [`TabularView::component_at`] instead.
//!
//! # Example
//!
//! ```no_run
//! use lattice_probe::component::widgets::{Column, Grid};
//!
//! #[derive(Clone)]
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! let people = vec![Person { name: "Ada".into(), age: 36 }];
//! let grid = Grid::new()
//!     .with_column(Column::text("name", "Name", |p: &Person| p.name.clone()).sortable_by(|p| p.name.clone()))
//!     .with_column(Column::text("age", "Age", |p: &Person| p.age.to_string()).sortable_by(|p| p.age))
//!     .with_items(people);
//! # let _ = grid;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use lattice_probe_core::logging::targets;
use lattice_probe_core::{Object, ObjectId, Property, Signal};
use parking_lot::{Mutex, RwLock};

use crate::component::{
    Component, ComponentBase, ComponentEvent, ItemClickEvent, RendererClickEvent, attach,
    unsupported_event,
};
use crate::data::{
    CompareFn, DataProvider, FilterFn, ListDataProvider, Projector, SortDirection, SortKey,
};
use crate::error::{HarnessError, HarnessResult};

type FormatFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
type FactoryFn<T> = Arc<dyn Fn(&T) -> Arc<dyn Component> + Send + Sync>;

/// How a column renders its cells.
pub enum CellRenderer<T> {
    /// Plain text.
    Text(FormatFn<T>),
    /// A clickable button.
    Button {
        label: FormatFn<T>,
        clicked: Arc<Signal<RendererClickEvent<T>>>,
    },
    /// A component per cell.
    Component(FactoryFn<T>),
}

impl<T> Clone for CellRenderer<T> {
    fn clone(&self) -> Self {
        match self {
            CellRenderer::Text(format) => CellRenderer::Text(format.clone()),
            CellRenderer::Button { label, clicked } => CellRenderer::Button {
                label: label.clone(),
                clicked: clicked.clone(),
            },
            CellRenderer::Component(factory) => CellRenderer::Component(factory.clone()),
        }
    }
}

impl<T> CellRenderer<T> {
    /// The kind of renderer, without its callbacks.
    pub fn kind(&self) -> RendererKind {
        match self {
            CellRenderer::Text(_) => RendererKind::Text,
            CellRenderer::Button { .. } => RendererKind::Button,
            CellRenderer::Component(_) => RendererKind::Component,
        }
    }
}

/// The kind of a column renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    Text,
    Button,
    Component,
}

/// A column of a [`Grid`].
pub struct Column<T> {
    key: String,
    header: String,
    visible: bool,
    comparator: Option<CompareFn<T>>,
    renderer: CellRenderer<T>,
}

impl<T: 'static> Column<T> {
    /// Create a text column.
    pub fn text<F>(key: impl Into<String>, header: impl Into<String>, format: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self::with_renderer(key, header, CellRenderer::Text(Arc::new(format)))
    }

    /// Create a column of buttons labelled by `label`.
    ///
    /// Connect to the clicks with [`Column::on_click`] or
    /// [`Grid::renderer_clicked`].
    pub fn button<F>(key: impl Into<String>, header: impl Into<String>, label: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self::with_renderer(
            key,
            header,
            CellRenderer::Button {
                label: Arc::new(label),
                clicked: Arc::new(Signal::new()),
            },
        )
    }

    /// Create a column producing one component per cell.
    pub fn component<C, F>(key: impl Into<String>, header: impl Into<String>, make: F) -> Self
    where
        C: Component,
        F: Fn(&T) -> C + Send + Sync + 'static,
    {
        let factory: FactoryFn<T> =
            Arc::new(move |item: &T| -> Arc<dyn Component> { Arc::new(make(item)) });
        Self::with_renderer(key, header, CellRenderer::Component(factory))
    }

    /// Create a column with an explicit renderer.
    pub fn with_renderer(
        key: impl Into<String>,
        header: impl Into<String>,
        renderer: CellRenderer<T>,
    ) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            visible: true,
            comparator: None,
            renderer,
        }
    }

    /// Make the column sortable by the natural ordering of an extracted key.
    pub fn sortable_by<K, F>(mut self, key: F) -> Self
    where
        K: Ord + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.comparator = Some(Arc::new(move |a: &T, b: &T| key(a).cmp(&key(b))));
        self
    }

    /// Make the column sortable with a custom comparator.
    pub fn with_comparator(mut self, comparator: CompareFn<T>) -> Self {
        self.comparator = Some(comparator);
        self
    }

    /// Set visibility using builder pattern.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Connect a handler to a button column. Does nothing for other columns.
    pub fn on_click<F>(self, handler: F) -> Self
    where
        F: Fn(&RendererClickEvent<T>) + Send + Sync + 'static,
    {
        if let CellRenderer::Button { clicked, .. } = &self.renderer {
            clicked.connect(handler);
        }
        self
    }

    /// The column key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The header label as configured (may be empty).
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Whether the column is visible.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the column can be sorted.
    pub fn is_sortable(&self) -> bool {
        self.comparator.is_some()
    }

    /// The renderer.
    pub fn renderer(&self) -> &CellRenderer<T> {
        &self.renderer
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("visible", &self.visible)
            .field("sortable", &self.comparator.is_some())
            .finish()
    }
}

/// Column metadata exposed through [`TabularView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub key: String,
    pub header: String,
    pub visible: bool,
    /// Sort direction, if the column takes part in the current sort.
    pub sort: Option<SortDirection>,
    pub renderer: RendererKind,
}

impl ColumnInfo {
    /// The label shown in the header: the header text, or the key when the
    /// header is empty.
    pub fn label(&self) -> &str {
        if self.header.is_empty() {
            &self.key
        } else {
            &self.header
        }
    }
}

/// Type-independent view of a tabular component.
///
/// This is what the dump engine and the grid helpers work against.
pub trait TabularView {
    /// All columns in display order, hidden ones included.
    fn columns(&self) -> Vec<ColumnInfo>;

    /// Number of rows after filtering.
    fn row_count(&self) -> HarnessResult<usize>;

    /// Number of rows below `limit`, also for a table of unknown size.
    fn count_rows_up_to(&self, limit: usize) -> HarnessResult<usize>;

    /// Formatted cells of the visible columns for the rows in `rows`,
    /// clamped to the available rows.
    fn render_rows(&self, rows: Range<usize>) -> HarnessResult<Vec<Vec<String>>>;

    /// The component a component renderer produced for a cell.
    fn component_at(&self, row: usize, column: &str) -> HarnessResult<Arc<dyn Component>>;

    /// Replace the sort orders, most significant first.
    fn sort_by(&self, orders: Vec<(String, SortDirection)>) -> HarnessResult<()>;
}

/// A data-bound grid.
///
/// # Signals
///
/// - `item_click`: Emitted for every row click, single or double
/// - `item_double_click`: Emitted additionally for double clicks
/// - `sort_changed`: Emitted with the new sort orders
pub struct Grid<T> {
    base: ComponentBase,
    caption: Property<Option<String>>,
    columns: RwLock<Vec<Column<T>>>,
    provider: RwLock<Arc<dyn DataProvider<T>>>,
    filter: RwLock<Option<FilterFn<T>>>,
    sort_orders: RwLock<Vec<(String, SortDirection)>>,
    cells: Mutex<HashMap<(usize, String), Arc<dyn Component>>>,

    /// Signal emitted when a row is clicked.
    pub item_click: Signal<ItemClickEvent<T>>,

    /// Signal emitted when a row is double clicked.
    pub item_double_click: Signal<ItemClickEvent<T>>,

    /// Signal emitted when the sort orders change.
    pub sort_changed: Signal<Vec<(String, SortDirection)>>,
}

impl<T: Clone + Send + Sync + 'static> Grid<T> {
    /// Create a grid with no columns and no items.
    pub fn new() -> Self {
        Self {
            base: ComponentBase::new::<Self>(),
            caption: Property::new(None),
            columns: RwLock::new(Vec::new()),
            provider: RwLock::new(Arc::new(ListDataProvider::new(Vec::new()))),
            filter: RwLock::new(None),
            sort_orders: RwLock::new(Vec::new()),
            cells: Mutex::new(HashMap::new()),
            item_click: Signal::new(),
            item_double_click: Signal::new(),
            sort_changed: Signal::new(),
        }
    }

    /// Set the caption using builder pattern.
    pub fn with_caption(self, caption: impl Into<String>) -> Self {
        self.caption.set(Some(caption.into()));
        self
    }

    /// Append a column using builder pattern.
    pub fn with_column(self, column: Column<T>) -> Self {
        self.add_column(column);
        self
    }

    /// Show the given items using builder pattern.
    pub fn with_items(self, items: Vec<T>) -> Self {
        self.set_items(items);
        self
    }

    /// Use the given provider using builder pattern.
    pub fn with_provider(self, provider: Arc<dyn DataProvider<T>>) -> Self {
        self.set_provider(provider);
        self
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Append a column. A column with the same key is replaced.
    ///
    /// Replacing a column drops the cell components built by the old one.
    pub fn add_column(&self, column: Column<T>) {
        let replaced = {
            let mut columns = self.columns.write();
            match columns.iter_mut().find(|c| c.key == column.key) {
                Some(existing) => {
                    *existing = column;
                    true
                }
                None => {
                    columns.push(column);
                    false
                }
            }
        };
        if replaced {
            self.refresh();
        }
    }

    /// Keys of all columns, in display order.
    pub fn column_keys(&self) -> Vec<String> {
        self.columns.read().iter().map(|c| c.key.clone()).collect()
    }

    /// Show or hide a column.
    pub fn set_column_visible(&self, key: &str, visible: bool) -> HarnessResult<()> {
        let mut columns = self.columns.write();
        let Some(index) = columns.iter().position(|c| c.key == key) else {
            return Err(no_such_column(key, self.column_keys_locked(&columns)));
        };
        columns[index].visible = visible;
        Ok(())
    }

    /// The click signal of a button column.
    pub fn renderer_clicked(&self, key: &str) -> HarnessResult<Arc<Signal<RendererClickEvent<T>>>> {
        let columns = self.columns.read();
        let column = self.find_column(&columns, key)?;
        match &column.renderer {
            CellRenderer::Button { clicked, .. } => Ok(clicked.clone()),
            _ => Err(HarnessError::unsupported(format!(
                "column '{key}' does not render buttons"
            ))),
        }
    }

    fn find_column<'c>(&self, columns: &'c [Column<T>], key: &str) -> HarnessResult<&'c Column<T>> {
        columns
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| no_such_column(key, self.column_keys_locked(columns)))
    }

    fn column_keys_locked(&self, columns: &[Column<T>]) -> Vec<String> {
        columns.iter().map(|c| c.key.clone()).collect()
    }

    // =========================================================================
    // Data
    // =========================================================================

    /// Show the given items, replacing the provider with an in-memory one.
    pub fn set_items(&self, items: Vec<T>) {
        self.set_provider(Arc::new(ListDataProvider::new(items)));
    }

    /// Replace the data provider.
    pub fn set_provider(&self, provider: Arc<dyn DataProvider<T>>) {
        *self.provider.write() = provider;
        self.refresh();
    }

    /// The data provider.
    pub fn provider(&self) -> Arc<dyn DataProvider<T>> {
        self.provider.read().clone()
    }

    /// Set a grid-level filter on top of the provider.
    pub fn set_filter<F>(&self, filter: F)
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        *self.filter.write() = Some(Arc::new(filter));
        self.refresh();
    }

    /// Remove the grid-level filter.
    pub fn clear_filter(&self) {
        *self.filter.write() = None;
        self.refresh();
    }

    /// Drop all materialized cell components.
    ///
    /// Call this after the provider's data changed.
    pub fn refresh(&self) {
        let cells = std::mem::take(&mut *self.cells.lock());
        if cells.is_empty() {
            return;
        }
        if let Ok(registry) = self.base.registry() {
            for component in cells.values() {
                if let Err(error) = registry.destroy(component.object_id()) {
                    tracing::trace!(target: targets::DATA, %error, "cell component already gone");
                }
            }
        }
        tracing::trace!(target: targets::DATA, cell_count = cells.len(), "dropped cell components");
    }

    /// Number of rows after filtering.
    pub fn row_count(&self) -> HarnessResult<usize> {
        self.with_projector(|projector| projector.size())?
    }

    /// The row item at `row`, in the current order.
    pub fn get_row(&self, row: usize) -> HarnessResult<T> {
        self.with_projector(|projector| projector.get(row))?
    }

    /// All row items, in the current order.
    pub fn rows(&self) -> HarnessResult<Vec<T>> {
        self.with_projector(|projector| projector.find_all())?
    }

    fn with_projector<R>(&self, f: impl FnOnce(&Projector<'_, T>) -> R) -> HarnessResult<R> {
        let provider = self.provider();
        let filter = self.filter.read().clone();
        let sort = self.sort_keys()?;
        let projector = Projector::new(provider.as_ref())
            .with_filter(filter)
            .with_sort(sort);
        Ok(f(&projector))
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    /// The current sort orders, most significant first.
    pub fn sort_orders(&self) -> Vec<(String, SortDirection)> {
        self.sort_orders.read().clone()
    }

    /// Sort by the given columns, most significant first.
    ///
    /// Every column must exist and be sortable, and the provider must know
    /// its size. An empty list removes the sort.
    pub fn sort(&self, orders: Vec<(String, SortDirection)>) -> HarnessResult<()> {
        if !orders.is_empty() && !self.provider().is_bounded() {
            return Err(HarnessError::unsupported(
                "sorting a grid whose provider has no known size",
            ));
        }
        {
            let columns = self.columns.read();
            for (key, _) in &orders {
                if !self.find_column(&columns, key)?.is_sortable() {
                    return Err(HarnessError::unsupported(format!(
                        "sorting by column '{key}', which has no comparator"
                    )));
                }
            }
        }

        *self.sort_orders.write() = orders.clone();
        self.refresh();
        tracing::debug!(target: targets::DATA, ?orders, "grid sort changed");
        self.sort_changed.emit(orders);
        Ok(())
    }

    fn sort_keys(&self) -> HarnessResult<Vec<SortKey<T>>> {
        let columns = self.columns.read();
        self.sort_orders
            .read()
            .iter()
            .map(|(key, direction)| {
                let column = self.find_column(&columns, key)?;
                let compare = column.comparator.clone().ok_or_else(|| {
                    HarnessError::unsupported(format!("sorting by column '{key}'"))
                })?;
                Ok(SortKey::new(key.clone(), *direction, compare))
            })
            .collect()
    }

    // =========================================================================
    // Cells
    // =========================================================================

    fn cell_component(&self, row: usize, key: &str) -> HarnessResult<Arc<dyn Component>> {
        let factory = {
            let columns = self.columns.read();
            match &self.find_column(&columns, key)?.renderer {
                CellRenderer::Component(factory) => factory.clone(),
                _ => {
                    return Err(HarnessError::NoComponentInCell {
                        row,
                        column: key.to_string(),
                    });
                }
            }
        };

        if let Some(component) = self.cells.lock().get(&(row, key.to_string())) {
            return Ok(component.clone());
        }

        let item = self.get_row(row)?;
        let component = factory(&item);
        attach(component.clone())?;
        self.base.adopt(component.as_ref())?;
        self.cells
            .lock()
            .insert((row, key.to_string()), component.clone());
        tracing::trace!(target: targets::DATA, row, column = key, "materialized cell component");
        Ok(component)
    }

    fn format_cell(
        &self,
        key: &str,
        renderer: &CellRenderer<T>,
        row: usize,
        item: &T,
    ) -> HarnessResult<String> {
        match renderer {
            CellRenderer::Text(format) => Ok(format(item)),
            CellRenderer::Button { label, .. } => Ok(label(item)),
            CellRenderer::Component(_) => {
                let component = self.cell_component(row, key)?;
                Ok(component
                    .text()
                    .or_else(|| component.caption())
                    .unwrap_or_default())
            }
        }
    }

    fn emit_item_click(
        &self,
        row: usize,
        column: Option<&str>,
        event: &ComponentEvent,
    ) -> HarnessResult<()> {
        let ComponentEvent::ItemClick {
            button,
            modifiers,
            click_count,
            ..
        } = event
        else {
            return Err(unsupported_event(&self.base, event));
        };

        if let Some(key) = column {
            let columns = self.columns.read();
            self.find_column(&columns, key)?;
        }
        let item = self.get_row(row)?;
        let click = ItemClickEvent {
            item,
            row,
            column: column.map(str::to_string),
            button: *button,
            modifiers: *modifiers,
            click_count: *click_count,
            from_client: true,
        };

        self.item_click.emit(click.clone());
        if *click_count == 2 {
            self.item_double_click.emit(click);
        }
        Ok(())
    }

    fn emit_renderer_click(&self, row: usize, key: &str) -> HarnessResult<()> {
        let clicked = {
            let columns = self.columns.read();
            match &self.find_column(&columns, key)?.renderer {
                CellRenderer::Button { clicked, .. } => clicked.clone(),
                CellRenderer::Component(_) => {
                    return Err(HarnessError::unsupported(format!(
                        "renderer click on component column '{key}'; click the cell component instead"
                    )));
                }
                CellRenderer::Text(_) => {
                    return Err(HarnessError::unsupported(format!(
                        "renderer click on text column '{key}'"
                    )));
                }
            }
        };

        let item = self.get_row(row)?;
        clicked.emit(RendererClickEvent {
            item,
            row,
            column: key.to_string(),
        });
        Ok(())
    }
}

impl<T: Clone + Send + Sync + 'static> Default for Grid<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn no_such_column(key: &str, available: Vec<String>) -> HarnessError {
    HarnessError::NoSuchColumn {
        key: key.to_string(),
        available,
    }
}

impl<T: Clone + Send + Sync + 'static> TabularView for Grid<T> {
    fn columns(&self) -> Vec<ColumnInfo> {
        let orders = self.sort_orders.read().clone();
        self.columns
            .read()
            .iter()
            .map(|column| ColumnInfo {
                key: column.key.clone(),
                header: column.header.clone(),
                visible: column.visible,
                sort: orders
                    .iter()
                    .find(|(key, _)| *key == column.key)
                    .map(|(_, direction)| *direction),
                renderer: column.renderer.kind(),
            })
            .collect()
    }

    fn row_count(&self) -> HarnessResult<usize> {
        Grid::<T>::row_count(self)
    }

    fn count_rows_up_to(&self, limit: usize) -> HarnessResult<usize> {
        let items = self.with_projector(|projector| projector.fetch(0..limit))??;
        Ok(items.len())
    }

    fn render_rows(&self, rows: Range<usize>) -> HarnessResult<Vec<Vec<String>>> {
        let start = rows.start;
        let items = self.with_projector(|projector| projector.fetch(rows))??;
        let visible: Vec<(String, CellRenderer<T>)> = self
            .columns
            .read()
            .iter()
            .filter(|column| column.visible)
            .map(|column| (column.key.clone(), column.renderer.clone()))
            .collect();

        items
            .iter()
            .enumerate()
            .map(|(offset, item)| {
                visible
                    .iter()
                    .map(|(key, renderer)| self.format_cell(key, renderer, start + offset, item))
                    .collect()
            })
            .collect()
    }

    fn component_at(&self, row: usize, column: &str) -> HarnessResult<Arc<dyn Component>> {
        self.cell_component(row, column)
    }

    fn sort_by(&self, orders: Vec<(String, SortDirection)>) -> HarnessResult<()> {
        self.sort(orders)
    }
}

impl<T: Clone + Send + Sync + 'static> Object for Grid<T> {
    fn object_id(&self) -> ObjectId {
        self.base.id()
    }
}

impl<T: Clone + Send + Sync + 'static> Component for Grid<T> {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn caption(&self) -> Option<String> {
        self.caption.get()
    }

    fn as_tabular(&self) -> Option<&dyn TabularView> {
        Some(self)
    }

    fn is_opaque(&self) -> bool {
        true
    }

    fn handle_event(&self, event: &ComponentEvent) -> HarnessResult<()> {
        match event {
            ComponentEvent::ItemClick { row, column, .. } => {
                self.emit_item_click(*row, column.as_deref(), event)
            }
            ComponentEvent::RendererClick { row, column } => self.emit_renderer_click(*row, column),
            _ => Err(unsupported_event(&self.base, event)),
        }
    }
}
