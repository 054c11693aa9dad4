//! Mapping loosely formatted route identifiers onto canonical KPI records.
//!
//! Resolution tries four rules in order and stops at the first that matches:
//! exact id, slugified name, qualifier-stripped slug, then substring
//! containment. Within a rule, the earliest candidate in the list wins.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Trailing qualifiers ignored when comparing slugs.
pub const KNOWN_QUALIFIERS: [&str; 6] = [
    "-detection",
    "-prevention",
    "-monitoring",
    "-compliance",
    "-coverage",
    "-accuracy",
];

/// An authoritative record addressed by route identifiers.
pub trait CanonicalRecord {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

/// Minimal canonical record for callers without their own type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiReference {
    pub id: String,
    pub name: String,
}

impl KpiReference {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl CanonicalRecord for KpiReference {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Which rule produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    Exact,
    NameSlug,
    NormalizedSuffix,
    Containment,
}

impl MatchRule {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Exact => "exact id",
            Self::NameSlug => "name slug",
            Self::NormalizedSuffix => "qualifier-stripped slug",
            Self::Containment => "partial match",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a, C> {
    pub record: &'a C,
    pub rule: MatchRule,
}

/// Lowercase, replace each whitespace run with `-` (edges included), drop
/// anything outside `[a-z0-9-]`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            slug.push(c);
        }
    }
    slug
}

/// Remove one trailing qualifier from [`KNOWN_QUALIFIERS`], if present.
pub fn strip_qualifier(slug: &str) -> &str {
    KNOWN_QUALIFIERS
        .iter()
        .find_map(|qualifier| slug.strip_suffix(qualifier))
        .unwrap_or(slug)
}

pub fn resolve<'a, C: CanonicalRecord>(slug: &str, candidates: &'a [C]) -> Option<&'a C> {
    resolve_match(slug, candidates).map(|resolved| resolved.record)
}

pub fn resolve_match<'a, C: CanonicalRecord>(
    slug: &str,
    candidates: &'a [C],
) -> Option<Resolved<'a, C>> {
    let found = |record: &'a C, rule: MatchRule| {
        debug!(slug, id = record.id(), rule = rule.label(), "resolved kpi identifier");
        Some(Resolved { record, rule })
    };

    if let Some(record) = candidates.iter().find(|candidate| candidate.id() == slug) {
        return found(record, MatchRule::Exact);
    }

    let derived: Vec<String> = candidates
        .iter()
        .map(|candidate| slugify(candidate.name()))
        .collect();

    if let Some(position) = derived.iter().position(|candidate| candidate == slug) {
        return found(&candidates[position], MatchRule::NameSlug);
    }

    let lowered = slug.to_lowercase();
    let wanted = strip_qualifier(&lowered);
    let normalized: Vec<&str> = derived
        .iter()
        .map(|candidate| strip_qualifier(candidate))
        .collect();

    if let Some(position) = normalized.iter().position(|candidate| *candidate == wanted) {
        return found(&candidates[position], MatchRule::NormalizedSuffix);
    }

    if !wanted.is_empty() {
        let position = normalized.iter().position(|candidate| {
            !candidate.is_empty() && (candidate.contains(wanted) || wanted.contains(candidate))
        });
        if let Some(position) = position {
            return found(&candidates[position], MatchRule::Containment);
        }
    }

    debug!(slug, candidates = candidates.len(), "no kpi matched identifier");
    None
}
