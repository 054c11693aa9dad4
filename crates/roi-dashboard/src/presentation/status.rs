use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Color used when a status value falls outside [`StatusKind`].
pub const NEUTRAL_STATUS_COLOR: &str = "#9ca3af";

/// Closed set of workflow states shown by status columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Completed,
    InProgress,
    Pending,
    NotStarted,
    Overdue,
    AtRisk,
    OnTrack,
    Compliant,
    PartiallyCompliant,
    NonCompliant,
}

impl StatusKind {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::Completed,
            Self::InProgress,
            Self::Pending,
            Self::NotStarted,
            Self::Overdue,
            Self::AtRisk,
            Self::OnTrack,
            Self::Compliant,
            Self::PartiallyCompliant,
            Self::NonCompliant,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::InProgress => "In Progress",
            Self::Pending => "Pending",
            Self::NotStarted => "Not Started",
            Self::Overdue => "Overdue",
            Self::AtRisk => "At Risk",
            Self::OnTrack => "On Track",
            Self::Compliant => "Compliant",
            Self::PartiallyCompliant => "Partially Compliant",
            Self::NonCompliant => "Non-Compliant",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Completed | Self::Compliant | Self::OnTrack => "#16a34a",
            Self::InProgress => "#2563eb",
            Self::Pending | Self::NotStarted => "#6b7280",
            Self::AtRisk | Self::PartiallyCompliant => "#d97706",
            Self::Overdue | Self::NonCompliant => "#dc2626",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Completed | Self::Compliant => "check-circle",
            Self::OnTrack => "trending-up",
            Self::InProgress => "clock",
            Self::Pending | Self::NotStarted => "circle",
            Self::AtRisk | Self::PartiallyCompliant => "alert-triangle",
            Self::Overdue | Self::NonCompliant => "x-circle",
        }
    }
}

/// A status string that does not name any [`StatusKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status value '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for StatusKind {
    type Err = UnknownStatus;

    /// Accepts labels and snake, kebab or space separated forms, ignoring case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();

        let status = match normalized.as_str() {
            "completed" | "complete" | "done" => Self::Completed,
            "in_progress" => Self::InProgress,
            "pending" => Self::Pending,
            "not_started" => Self::NotStarted,
            "overdue" => Self::Overdue,
            "at_risk" => Self::AtRisk,
            "on_track" => Self::OnTrack,
            "compliant" => Self::Compliant,
            "partially_compliant" | "partial" => Self::PartiallyCompliant,
            "non_compliant" => Self::NonCompliant,
            _ => return Err(UnknownStatus(value.to_string())),
        };
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_and_slugs() {
        for status in StatusKind::ordered() {
            assert_eq!(status.label().parse::<StatusKind>(), Ok(status));
        }
        assert_eq!("in-progress".parse::<StatusKind>(), Ok(StatusKind::InProgress));
        assert_eq!("NON_COMPLIANT".parse::<StatusKind>(), Ok(StatusKind::NonCompliant));
    }

    #[test]
    fn rejects_unknown_values() {
        let err = "archived".parse::<StatusKind>().expect_err("not a status");
        assert_eq!(err, UnknownStatus("archived".to_string()));
    }
}
