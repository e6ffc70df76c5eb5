//! Flattens the view model into the rows a list widget draws.

use crate::{
    core::constants::{EMPTY_FACILITY_LIST, EMPTY_LABEL_LIST},
    data::model::ViewModel,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ListRow {
    Category {
        name: String,
        collapsed: bool,
        count: usize,
    },
    Facility {
        id: String,
        name: String,
        location_count: usize,
        expanded: bool,
        offers_menu: bool,
        active: bool,
    },
    Location {
        facility_id: String,
        id: String,
        label: String,
        active: bool,
    },
    Label {
        label: String,
        active: bool,
    },
    Empty(String),
}

/// Rows for the facility list.
///
/// Hidden entries are omitted, collapsed categories keep only their header,
/// and locations are listed only under expanded multi-location facilities.
pub fn facility_rows(
    model: &ViewModel,
    active_facility: Option<&str>,
    active_location: Option<&str>,
) -> Vec<ListRow> {
    let mut rows = Vec::new();

    for category in model.categories.iter().filter(|c| c.visible) {
        let visible: Vec<_> = category.facilities.iter().filter(|f| f.visible).collect();
        rows.push(ListRow::Category {
            name: category.name.clone(),
            collapsed: category.collapsed,
            count: visible.len(),
        });
        if category.collapsed {
            continue;
        }

        for facility in visible {
            rows.push(ListRow::Facility {
                id: facility.id.clone(),
                name: facility.name.clone(),
                location_count: facility.locations.len(),
                expanded: facility.expanded,
                offers_menu: facility.offers_menu(),
                active: active_facility == Some(facility.id.as_str()),
            });

            if facility.is_multi_location() && facility.expanded {
                for location in facility.visible_locations() {
                    rows.push(ListRow::Location {
                        facility_id: facility.id.clone(),
                        id: location.id.clone(),
                        label: location.label.clone(),
                        active: active_location == Some(location.id.as_str()),
                    });
                }
            }
        }
    }

    if rows.is_empty() {
        rows.push(ListRow::Empty(EMPTY_FACILITY_LIST.to_string()));
    }
    rows
}

/// Rows for the PDF label list
pub fn label_rows(labels: &[&str], active: Option<&str>) -> Vec<ListRow> {
    if labels.is_empty() {
        return vec![ListRow::Empty(EMPTY_LABEL_LIST.to_string())];
    }
    labels
        .iter()
        .map(|label| ListRow::Label {
            label: label.to_string(),
            active: active == Some(*label),
        })
        .collect()
}
