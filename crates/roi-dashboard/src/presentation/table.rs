use super::cells::{display_text, RenderedCell};
use super::columns::{Align, ColumnDescriptor};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

pub const DEFAULT_EMPTY_MESSAGE: &str = "No data available";

/// Row background for non-striped rows and even rows of striped tables.
pub const BASE_ROW_COLOR: &str = "#ffffff";
/// Row background for odd rows of striped tables.
pub const ALTERNATE_ROW_COLOR: &str = "#f9fafb";

/// A record that can be shown as a table row.
pub trait TableRow {
    /// Look up a field by column key.
    fn field(&self, key: &str) -> Option<Value>;

    /// Stable identity of the row, defaulting to its `id` then `key` field.
    fn row_key(&self) -> Option<String> {
        ["id", "key"]
            .into_iter()
            .filter_map(|name| self.field(name))
            .find(|value| !value.is_null())
            .map(|value| display_text(&value))
    }
}

impl TableRow for Map<String, Value> {
    fn field(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

impl TableRow for Value {
    fn field(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

/// A title-like string given literally or computed from the rows.
pub enum TextSource<R> {
    Literal(String),
    Computed(Box<dyn Fn(&[R]) -> String + Send + Sync>),
}

impl<R> TextSource<R> {
    pub fn computed<F>(compute: F) -> Self
    where
        F: Fn(&[R]) -> String + Send + Sync + 'static,
    {
        Self::Computed(Box::new(compute))
    }

    pub fn resolve(&self, rows: &[R]) -> String {
        match self {
            Self::Literal(text) => text.clone(),
            Self::Computed(compute) => compute(rows),
        }
    }
}

impl<R> From<&str> for TextSource<R> {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_string())
    }
}

impl<R> From<String> for TextSource<R> {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

impl<R> fmt::Debug for TextSource<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

pub type RowKeyFn<R> = Box<dyn Fn(&R, usize) -> String + Send + Sync>;
pub type RowClickHandler<R> = Box<dyn Fn(&R) + Send + Sync>;

/// Presentation options for [`present`].
pub struct TableOptions<R> {
    pub title: Option<String>,
    pub subtitle: Option<TextSource<R>>,
    pub empty_message: TextSource<R>,
    pub empty_description: Option<String>,
    pub row_key: Option<RowKeyFn<R>>,
    pub accent_color: Option<String>,
    pub striped_rows: bool,
    pub compact: bool,
    pub on_row_click: Option<RowClickHandler<R>>,
}

impl<R> Default for TableOptions<R> {
    fn default() -> Self {
        Self {
            title: None,
            subtitle: None,
            empty_message: TextSource::Literal(DEFAULT_EMPTY_MESSAGE.to_string()),
            empty_description: None,
            row_key: None,
            accent_color: None,
            striped_rows: true,
            compact: false,
            on_row_click: None,
        }
    }
}

impl<R> TableOptions<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<TextSource<R>>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn empty_message(mut self, message: impl Into<TextSource<R>>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn empty_description(mut self, description: impl Into<String>) -> Self {
        self.empty_description = Some(description.into());
        self
    }

    pub fn row_key<F>(mut self, row_key: F) -> Self
    where
        F: Fn(&R, usize) -> String + Send + Sync + 'static,
    {
        self.row_key = Some(Box::new(row_key));
        self
    }

    pub fn accent_color(mut self, color: impl Into<String>) -> Self {
        self.accent_color = Some(color.into());
        self
    }

    pub fn striped_rows(mut self, striped: bool) -> Self {
        self.striped_rows = striped;
        self
    }

    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    pub fn on_row_click<F>(mut self, handler: F) -> Self
    where
        F: Fn(&R) + Send + Sync + 'static,
    {
        self.on_row_click = Some(Box::new(handler));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowBackground {
    Base,
    Alternate,
}

impl RowBackground {
    pub const fn for_index(index: usize, striped: bool) -> Self {
        if striped && index % 2 == 1 {
            Self::Alternate
        } else {
            Self::Base
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Base => BASE_ROW_COLOR,
            Self::Alternate => ALTERNATE_ROW_COLOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Density {
    Comfortable,
    Compact,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub align: Align,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    pub sticky: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyCell {
    pub column_key: String,
    pub align: Align,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    pub sticky: bool,
    /// Set only on sticky cells, tracking the row's stripe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<RowBackground>,
    pub content: RenderedCell,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedRow {
    pub key: String,
    pub index: usize,
    pub background: RowBackground,
    pub interactive: bool,
    pub cells: Vec<BodyCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TableBody {
    Empty {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Rows {
        rows: Vec<RenderedRow>,
    },
}

/// Serializable snapshot of a presented table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableGrid {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    pub density: Density,
    pub headers: Vec<HeaderCell>,
    pub body: TableBody,
}

/// A presented table, still tied to its source rows for click dispatch.
pub struct TableView<'a, R> {
    grid: TableGrid,
    rows: &'a [R],
    on_row_click: Option<&'a RowClickHandler<R>>,
}

impl<'a, R> TableView<'a, R> {
    pub fn grid(&self) -> &TableGrid {
        &self.grid
    }

    pub fn into_grid(self) -> TableGrid {
        self.grid
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.grid.body, TableBody::Empty { .. })
    }

    pub fn rows(&self) -> &[RenderedRow] {
        match &self.grid.body {
            TableBody::Rows { rows } => rows.as_slice(),
            TableBody::Empty { .. } => &[],
        }
    }

    pub fn row_keys(&self) -> Vec<&str> {
        self.rows().iter().map(|row| row.key.as_str()).collect()
    }

    /// Dispatch a click on the row with `key` to the click handler, passing the
    /// original record. Returns whether a handler ran.
    pub fn click(&self, key: &str) -> bool {
        let Some(handler) = self.on_row_click else {
            return false;
        };
        match self.rows().iter().find(|row| row.key == key) {
            Some(rendered) => match self.rows.get(rendered.index) {
                Some(row) => {
                    handler(row);
                    true
                }
                None => false,
            },
            None => false,
        }
    }
}

impl<R> fmt::Debug for TableView<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableView")
            .field("grid", &self.grid)
            .field("interactive", &self.on_row_click.is_some())
            .finish()
    }
}

/// Turn column descriptors and rows into a rendered grid.
pub fn present<'a, R: TableRow>(
    columns: &[ColumnDescriptor<R>],
    rows: &'a [R],
    options: &'a TableOptions<R>,
) -> TableView<'a, R> {
    let mut seen = HashSet::new();
    for column in columns {
        if !seen.insert(column.key.as_str()) {
            warn!(key = %column.key, "duplicate column key in table definition");
        }
    }

    let headers = columns
        .iter()
        .map(|column| HeaderCell {
            key: column.key.clone(),
            label: column.header.clone(),
            align: column.align,
            width: column.width.clone(),
            sticky: column.sticky,
        })
        .collect();

    let body = if rows.is_empty() {
        TableBody::Empty {
            message: options.empty_message.resolve(rows),
            description: options.empty_description.clone(),
        }
    } else {
        let interactive = options.on_row_click.is_some();
        let rendered = rows
            .iter()
            .enumerate()
            .map(|(index, row)| present_row(columns, row, index, options, interactive))
            .collect();
        TableBody::Rows { rows: rendered }
    };

    TableView {
        grid: TableGrid {
            title: options.title.clone(),
            subtitle: options.subtitle.as_ref().map(|source| source.resolve(rows)),
            accent_color: options.accent_color.clone(),
            density: if options.compact {
                Density::Compact
            } else {
                Density::Comfortable
            },
            headers,
            body,
        },
        rows,
        on_row_click: options.on_row_click.as_ref(),
    }
}

fn present_row<R: TableRow>(
    columns: &[ColumnDescriptor<R>],
    row: &R,
    index: usize,
    options: &TableOptions<R>,
    interactive: bool,
) -> RenderedRow {
    let key = match &options.row_key {
        Some(row_key) => row_key(row, index),
        None => row.row_key().unwrap_or_else(|| index.to_string()),
    };
    let background = RowBackground::for_index(index, options.striped_rows);

    let cells = columns
        .iter()
        .map(|column| BodyCell {
            column_key: column.key.clone(),
            align: column.align,
            width: column.width.clone(),
            sticky: column.sticky,
            background: column.sticky.then_some(background),
            content: cell_content(column, row),
        })
        .collect();

    RenderedRow {
        key,
        index,
        background,
        interactive,
        cells,
    }
}

fn cell_content<R: TableRow>(column: &ColumnDescriptor<R>, row: &R) -> RenderedCell {
    match column.accessor_fn() {
        Some(accessor) => accessor(row),
        None => {
            let value = row.field(&column.key).unwrap_or(Value::Null);
            RenderedCell::plain(display_text(&value))
        }
    }
}

/// Columns and options bundled for a view that presents many row sets.
pub struct TabularPresenter<R> {
    columns: Vec<ColumnDescriptor<R>>,
    options: TableOptions<R>,
}

impl<R: TableRow> TabularPresenter<R> {
    pub fn new(columns: Vec<ColumnDescriptor<R>>, options: TableOptions<R>) -> Self {
        Self { columns, options }
    }

    pub fn columns(&self) -> &[ColumnDescriptor<R>] {
        &self.columns
    }

    pub fn present<'a>(&'a self, rows: &'a [R]) -> TableView<'a, R> {
        present(&self.columns, rows, &self.options)
    }
}
