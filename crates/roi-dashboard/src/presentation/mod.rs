//! Turning raw rows into rendered tables.

pub mod cells;
pub mod columns;
pub mod status;
pub mod table;

pub use cells::{render, render_tagged, RenderedCell, TextWeight, LONG_TEXT_THRESHOLD};
pub use columns::{Align, BadgeConfig, ColumnDescriptor, ColumnTypeTag, RenderConfig, TextStyle};
pub use status::{StatusKind, UnknownStatus};
pub use table::{
    present, BodyCell, Density, HeaderCell, RenderedRow, RowBackground, TableBody, TableGrid,
    TableOptions, TableRow, TableView, TabularPresenter, TextSource,
};
