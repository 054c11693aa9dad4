//! Type-tagged cell rendering.
//!
//! Every table column funnels its values through [`render`], which matches
//! exhaustively on [`ColumnTypeTag`]. Renderers are pure: they see the value
//! and the column's [`RenderConfig`], nothing else.

use super::columns::{BadgeConfig, ColumnTypeTag, RenderConfig, TextStyle};
use super::status::{StatusKind, NEUTRAL_STATUS_COLOR};
use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Text longer than this many characters is rendered in the long style.
pub const LONG_TEXT_THRESHOLD: usize = 50;

/// Badge color used when neither the color map nor the column default applies.
pub const DEFAULT_BADGE_COLOR: &str = "#6b7280";

/// Visual weight chosen for text cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextWeight {
    /// Short text, rendered emphasised.
    Short,
    /// Long text, rendered de-emphasised.
    Long,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderedCell {
    Text {
        text: String,
        weight: TextWeight,
    },
    TextWithIcon {
        text: String,
        weight: TextWeight,
        icon_color: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
    },
    TextWithLink {
        text: String,
        weight: TextWeight,
    },
    Badge {
        text: String,
        color: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
    },
    Status {
        status: StatusKind,
        label: &'static str,
        color: &'static str,
        icon: &'static str,
    },
    Number {
        text: String,
    },
    Currency {
        text: String,
    },
    Percentage {
        text: String,
    },
    Date {
        text: String,
    },
    Plain {
        text: String,
    },
}

impl RenderedCell {
    /// The display text of the cell, whatever its kind.
    pub fn text(&self) -> &str {
        match self {
            Self::Text { text, .. }
            | Self::TextWithIcon { text, .. }
            | Self::TextWithLink { text, .. }
            | Self::Badge { text, .. }
            | Self::Number { text }
            | Self::Currency { text }
            | Self::Percentage { text }
            | Self::Date { text }
            | Self::Plain { text } => text.as_str(),
            Self::Status { label, .. } => *label,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain { text: text.into() }
    }
}

/// Render `value` for a column of type `tag`.
pub fn render(value: &Value, tag: ColumnTypeTag, config: &RenderConfig) -> RenderedCell {
    let text = display_text(value);
    match tag {
        ColumnTypeTag::Text => RenderedCell::Text {
            weight: text_weight(&text, config.text_style),
            text,
        },
        ColumnTypeTag::TextWithIcon => {
            let badge = config.badge_config.as_ref();
            RenderedCell::TextWithIcon {
                weight: text_weight(&text, config.text_style),
                icon_color: badge_color(&text, badge),
                icon: badge.and_then(|config| config.icon.clone()),
                text,
            }
        }
        ColumnTypeTag::TextWithLink => RenderedCell::TextWithLink {
            weight: text_weight(&text, config.text_style),
            text,
        },
        ColumnTypeTag::Badge => render_badge(text, config.badge_config.as_ref()),
        ColumnTypeTag::Status => render_status(text),
        ColumnTypeTag::Number => RenderedCell::Number {
            text: numeric(value).map(format_number).unwrap_or(text),
        },
        ColumnTypeTag::Currency => RenderedCell::Currency {
            text: numeric(value).map(format_currency).unwrap_or(text),
        },
        ColumnTypeTag::Percentage => RenderedCell::Percentage {
            text: numeric(value).map(format_percentage).unwrap_or(text),
        },
        ColumnTypeTag::Date => RenderedCell::Date {
            text: format_date(&text).unwrap_or(text),
        },
        ColumnTypeTag::Custom => render_custom(text),
    }
}

/// Render with a string tag, as column definitions loaded from data carry them.
pub fn render_tagged(value: &Value, tag: &str, config: &RenderConfig) -> RenderedCell {
    let column_type = match ColumnTypeTag::try_parse(tag) {
        Some(column_type) => column_type,
        None => {
            debug!(tag, "unknown column type; rendering as custom");
            ColumnTypeTag::Custom
        }
    };
    render(value, column_type, config)
}

/// Fallback renderer: the coerced text, unstyled.
pub fn render_custom(text: String) -> RenderedCell {
    RenderedCell::Plain { text }
}

pub fn render_badge(text: String, config: Option<&BadgeConfig>) -> RenderedCell {
    RenderedCell::Badge {
        color: badge_color(&text, config),
        icon: config.and_then(|config| config.icon.clone()),
        text,
    }
}

/// Status cells for values outside [`StatusKind`] degrade to a neutral badge.
pub fn render_status(text: String) -> RenderedCell {
    match text.parse::<StatusKind>() {
        Ok(status) => RenderedCell::Status {
            status,
            label: status.label(),
            color: status.color(),
            icon: status.icon(),
        },
        Err(err) => {
            warn!(error = %err, "status column received an unknown value");
            RenderedCell::Badge {
                text,
                color: NEUTRAL_STATUS_COLOR.to_string(),
                icon: None,
            }
        }
    }
}

/// Coerce any JSON value into the string shown in a cell.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}

pub fn text_weight(text: &str, style: Option<TextStyle>) -> TextWeight {
    match style.unwrap_or_default() {
        TextStyle::Short => TextWeight::Short,
        TextStyle::Long => TextWeight::Long,
        TextStyle::Auto => {
            if text.chars().count() > LONG_TEXT_THRESHOLD {
                TextWeight::Long
            } else {
                TextWeight::Short
            }
        }
    }
}

pub fn badge_color(text: &str, config: Option<&BadgeConfig>) -> String {
    config
        .and_then(|config| {
            config
                .color_map
                .get(text)
                .or(config.default_color.as_ref())
        })
        .cloned()
        .unwrap_or_else(|| DEFAULT_BADGE_COLOR.to_string())
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let cleaned: String = text
                .trim()
                .chars()
                .filter(|c| !matches!(c, ',' | '$' | '%'))
                .collect();
            cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
        }
        _ => None,
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

fn format_fixed(value: f64, decimals: usize, trim: bool) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match fixed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (fixed.as_str(), ""),
    };
    let fraction = if trim {
        fraction.trim_end_matches('0')
    } else {
        fraction
    };

    let mut out = group_thousands(whole);
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

fn sign(value: f64, formatted: &str) -> &'static str {
    let is_zero = formatted.chars().all(|c| matches!(c, '0' | '.' | ','));
    if value < 0.0 && !is_zero {
        "-"
    } else {
        ""
    }
}

/// `1234567.891` → `1,234,567.89`
pub fn format_number(value: f64) -> String {
    let body = format_fixed(value, 2, true);
    format!("{}{}", sign(value, &body), body)
}

/// `-1234.5` → `-$1,234.50`
pub fn format_currency(value: f64) -> String {
    let body = format_fixed(value, 2, false);
    format!("{}${}", sign(value, &body), body)
}

/// `12.345` → `12.3%`
pub fn format_percentage(value: f64) -> String {
    let body = format_fixed(value, 1, false);
    format!("{}{}%", sign(value, &body), body)
}

/// Accepts `YYYY-MM-DD` or RFC 3339 timestamps; renders `Jan 5, 2025`.
pub fn format_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })?;
    Some(date.format("%b %-d, %Y").to_string())
}
