use super::cells::{self, RenderedCell};
use super::table::TableRow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// How a column's cells are rendered.
///
/// Deserialising from an unrecognised tag yields [`ColumnTypeTag::Custom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "String")]
pub enum ColumnTypeTag {
    Text,
    Status,
    Badge,
    Number,
    Currency,
    Percentage,
    Date,
    Custom,
    TextWithIcon,
    TextWithLink,
}

impl ColumnTypeTag {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::Text,
            Self::Status,
            Self::Badge,
            Self::Number,
            Self::Currency,
            Self::Percentage,
            Self::Date,
            Self::Custom,
            Self::TextWithIcon,
            Self::TextWithLink,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Status => "status",
            Self::Badge => "badge",
            Self::Number => "number",
            Self::Currency => "currency",
            Self::Percentage => "percentage",
            Self::Date => "date",
            Self::Custom => "custom",
            Self::TextWithIcon => "textWithIcon",
            Self::TextWithLink => "textWithLink",
        }
    }

    /// Lenient parse: any tag outside the closed set renders as `Custom`.
    pub fn parse(tag: &str) -> Self {
        Self::try_parse(tag).unwrap_or(Self::Custom)
    }

    /// Strict parse, accepting camelCase, snake_case and kebab-case spellings.
    pub fn try_parse(tag: &str) -> Option<Self> {
        let normalized: String = tag
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let tag = match normalized.as_str() {
            "text" => Self::Text,
            "status" => Self::Status,
            "badge" => Self::Badge,
            "number" => Self::Number,
            "currency" => Self::Currency,
            "percentage" => Self::Percentage,
            "date" => Self::Date,
            "custom" => Self::Custom,
            "textwithicon" => Self::TextWithIcon,
            "textwithlink" => Self::TextWithLink,
            _ => return None,
        };
        Some(tag)
    }
}

impl From<String> for ColumnTypeTag {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl fmt::Display for ColumnTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested visual weight for text-like cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    Short,
    Long,
    #[default]
    Auto,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Color lookup for badge-like cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeConfig {
    #[serde(default)]
    pub color_map: BTreeMap<String, String>,
    #[serde(default)]
    pub default_color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl BadgeConfig {
    pub fn with_color(mut self, value: impl Into<String>, color: impl Into<String>) -> Self {
        self.color_map.insert(value.into(), color.into());
        self
    }

    pub fn with_default_color(mut self, color: impl Into<String>) -> Self {
        self.default_color = Some(color.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Per-column settings consulted by the cell renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderConfig {
    pub text_style: Option<TextStyle>,
    pub badge_config: Option<BadgeConfig>,
}

pub type CellAccessor<R> = Arc<dyn Fn(&R) -> RenderedCell + Send + Sync>;

/// Describes one table column. Keys must be unique within a table.
pub struct ColumnDescriptor<R> {
    pub key: String,
    pub header: String,
    pub column_type: ColumnTypeTag,
    pub align: Align,
    pub width: Option<String>,
    pub sticky: bool,
    pub badge_config: Option<BadgeConfig>,
    pub text_style: Option<TextStyle>,
    accessor: Option<CellAccessor<R>>,
}

impl<R> ColumnDescriptor<R> {
    pub fn new(key: impl Into<String>, header: impl Into<String>, column_type: ColumnTypeTag) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            column_type,
            align: Align::Left,
            width: None,
            sticky: false,
            badge_config: None,
            text_style: None,
            accessor: None,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }

    pub fn badge_config(mut self, config: BadgeConfig) -> Self {
        self.badge_config = Some(config);
        self
    }

    pub fn text_style(mut self, style: TextStyle) -> Self {
        self.text_style = Some(style);
        self
    }

    pub fn accessor<F>(mut self, accessor: F) -> Self
    where
        F: Fn(&R) -> RenderedCell + Send + Sync + 'static,
    {
        self.accessor = Some(Arc::new(accessor));
        self
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            text_style: self.text_style,
            badge_config: self.badge_config.clone(),
        }
    }

    pub(crate) fn accessor_fn(&self) -> Option<&CellAccessor<R>> {
        self.accessor.as_ref()
    }
}

impl<R: TableRow + 'static> ColumnDescriptor<R> {
    /// Route this column's field through the type registry using the column's
    /// own type tag and render config.
    pub fn rendered(self) -> Self {
        let key = self.key.clone();
        let column_type = self.column_type;
        let config = self.render_config();
        self.accessor(move |row: &R| {
            let value = row.field(&key).unwrap_or(serde_json::Value::Null);
            cells::render(&value, column_type, &config)
        })
    }
}

impl<R> Clone for ColumnDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            header: self.header.clone(),
            column_type: self.column_type,
            align: self.align,
            width: self.width.clone(),
            sticky: self.sticky,
            badge_config: self.badge_config.clone(),
            text_style: self.text_style,
            accessor: self.accessor.clone(),
        }
    }
}

impl<R> fmt::Debug for ColumnDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("column_type", &self.column_type)
            .field("align", &self.align)
            .field("width", &self.width)
            .field("sticky", &self.sticky)
            .field("has_accessor", &self.accessor.is_some())
            .finish()
    }
}
