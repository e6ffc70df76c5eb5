//! Static zone-code table and category display priority

use crate::core::constants::{ALL_ZONES_LABEL, OTHER_ZONE_NAME};
use std::cmp::Ordering;

/// Raw zone code → zone category name, in display priority order
const ZONE_TABLE: &[(&str, &str)] = &[
    ("01", "環球集市"),
    ("02", "美洲探險"),
    ("03", "魔術天地"),
    ("04", "歐洲探險"),
    ("05", "動物王國"),
    ("06", "水上樂園"),
];

/// Resolves a raw code; unknown or missing codes fall into the "other" bucket
pub fn zone_name(code: Option<&str>) -> &'static str {
    let Some(code) = code.map(str::trim) else {
        return OTHER_ZONE_NAME;
    };
    ZONE_TABLE
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
        .unwrap_or(OTHER_ZONE_NAME)
}

/// Position in the priority table; names outside the table rank after it
pub fn zone_priority(name: &str) -> usize {
    ZONE_TABLE
        .iter()
        .position(|(_, known)| *known == name)
        .unwrap_or(ZONE_TABLE.len())
}

/// Priority order first, then name so unknown categories stay deterministic
pub fn compare_zones(a: &str, b: &str) -> Ordering {
    zone_priority(a)
        .cmp(&zone_priority(b))
        .then_with(|| a.cmp(b))
}

/// Selected zone filter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ZoneFilter {
    #[default]
    All,
    Zone(String),
}

impl ZoneFilter {
    /// Builds a filter from a UI label; the "all" label maps to [`ZoneFilter::All`]
    pub fn from_label(label: &str) -> Self {
        if label.is_empty() || label == ALL_ZONES_LABEL {
            Self::All
        } else {
            Self::Zone(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_ZONES_LABEL,
            Self::Zone(name) => name,
        }
    }

    pub fn matches(&self, zone: &str) -> bool {
        match self {
            Self::All => true,
            Self::Zone(name) => name == zone,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}
