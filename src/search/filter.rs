//! Free-text + zone filtering over the view model.
//!
//! [`apply`] is a pure function of the previous model and the filter state.
//! It only touches visibility, sub-list expansion and category collapse, so
//! ordering and identities survive every recomputation.

use crate::{
    data::{model::ViewModel, zones::ZoneFilter},
    search::text::fold_query,
};

/// Current search box text and zone selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub query: String,
    pub zone: ZoneFilter,
}

impl FilterState {
    pub fn new(query: impl Into<String>, zone: ZoneFilter) -> Self {
        Self {
            query: query.into(),
            zone,
        }
    }

    /// Folded query, `None` when blank
    pub fn needle(&self) -> Option<String> {
        fold_query(&self.query)
    }

    /// True when the filter can hide anything at all
    pub fn is_narrowing(&self) -> bool {
        self.needle().is_some() || !self.zone.is_all()
    }
}

/// Recomputes every visibility flag; O(total locations)
pub fn apply(model: &ViewModel, filter: &FilterState) -> ViewModel {
    let needle = filter.needle();
    let narrowing = needle.is_some() || !filter.zone.is_all();
    let mut next = model.clone();

    for category in next.categories.iter_mut() {
        for facility in category.facilities.iter_mut() {
            let zone_ok = filter.zone.matches(&facility.zone);

            let Some(needle) = needle.as_deref() else {
                for location in facility.locations.iter_mut() {
                    location.visible = true;
                }
                facility.visible = zone_ok;
                if facility.locations.len() <= 1 {
                    facility.expanded = false;
                }
                continue;
            };

            let name_hit = facility.search_key.contains(needle);
            let mut label_hit = false;
            for location in facility.locations.iter_mut() {
                let hit = location.label_key.contains(needle);
                location.visible = name_hit || hit;
                label_hit |= hit;
            }

            facility.visible = zone_ok && (name_hit || label_hit);
            if facility.is_multi_location() && label_hit {
                facility.expanded = true;
            }
        }

        category.visible = category.facilities.iter().any(|f| f.visible);
        if narrowing && category.visible {
            category.collapsed = false;
        }
    }

    next
}

/// Flips one category's collapsed flag
pub fn toggle_category(model: &ViewModel, name: &str) -> ViewModel {
    let mut next = model.clone();
    if let Some(category) = next.category_mut(name) {
        category.collapsed = !category.collapsed;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{normalizer::FacilityNormalizer, record::parse_records};

    fn sample() -> ViewModel {
        let records = parse_records(
            r#"[
              {"zoneKindCd":"01","faciltCateKindCd":"04","faciltNameCN":"漢堡店","faciltNameEng":"Burger",
               "locList":[{"latud":"37.30","lgtud":"127.20"}]},
              {"zoneKindCd":"01","faciltNameCN":"洗手間","faciltNameEng":"Restroom",
               "locList":[{"latud":"37.301","lgtud":"127.201"},{"latud":"37.302","lgtud":"127.202"}]},
              {"zoneKindCd":"02","faciltNameCN":"雲霄飛車","faciltNameEng":"T Express",
               "locList":[{"latud":"37.29","lgtud":"127.19"}]}
            ]"#,
        )
        .unwrap();
        FacilityNormalizer::new().build(&records)
    }

    fn visible_names(model: &ViewModel) -> Vec<&str> {
        model.visible_facilities().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_query_matches_name_case_insensitively() {
        let model = apply(&sample(), &FilterState::new("BURGER", ZoneFilter::All));

        assert_eq!(visible_names(&model), vec!["漢堡店/Burger"]);
        assert!(!model.category("美洲探險").unwrap().visible);
    }

    #[test]
    fn test_location_label_match_forces_sublist_open() {
        let model = apply(&sample(), &FilterState::new("地點 2", ZoneFilter::All));

        let restroom = model.facilities().find(|f| f.name.starts_with("洗手間")).unwrap();
        assert!(restroom.visible);
        assert!(restroom.expanded);
        let visible: Vec<&str> = restroom.visible_locations().map(|l| l.label.as_str()).collect();
        assert_eq!(visible, vec!["地點 2"]);
    }

    #[test]
    fn test_name_match_shows_all_locations_without_forcing_open() {
        let model = apply(&sample(), &FilterState::new("restroom", ZoneFilter::All));

        let restroom = model.facilities().find(|f| f.name.starts_with("洗手間")).unwrap();
        assert!(restroom.visible);
        assert!(!restroom.expanded);
        assert_eq!(restroom.visible_locations().count(), 2);
    }

    #[test]
    fn test_query_spanning_name_and_label_does_not_match() {
        let records = parse_records(
            r#"[{"zoneKindCd":"01","faciltNameCN":"漢堡店","locList":[{"latud":"37.3","lgtud":"127.2"}]}]"#,
        )
        .unwrap();
        let model = FacilityNormalizer::new().build(&records);

        let joint = apply(&model, &FilterState::new("店 漢", ZoneFilter::All));
        assert!(visible_names(&joint).is_empty());

        let whole = apply(&model, &FilterState::new("堡店", ZoneFilter::All));
        assert_eq!(visible_names(&whole), vec!["漢堡店"]);
    }

    #[test]
    fn test_zone_filter() {
        let model = apply(&sample(), &FilterState::new("", ZoneFilter::from_label("美洲探險")));

        assert_eq!(visible_names(&model), vec!["雲霄飛車/T Express"]);
        assert!(!model.category("環球集市").unwrap().visible);
    }

    #[test]
    fn test_zone_and_query_combine() {
        let model = apply(&sample(), &FilterState::new("burger", ZoneFilter::from_label("美洲探險")));
        assert!(visible_names(&model).is_empty());
        assert!(model.categories.iter().all(|c| !c.visible));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let filter = FilterState::new("地點", ZoneFilter::All);
        let once = apply(&sample(), &filter);
        let twice = apply(&once, &filter);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_clearing_query_restores_full_visibility() {
        let base = sample();
        let filtered = apply(&base, &FilterState::new("zzz", ZoneFilter::All));
        assert!(visible_names(&filtered).is_empty());

        let cleared = apply(&filtered, &FilterState::default());
        assert!(cleared.categories.iter().all(|c| c.visible));
        assert!(cleared
            .facilities()
            .all(|f| f.visible && f.locations.iter().all(|l| l.visible)));
        assert_eq!(cleared, base);
    }

    #[test]
    fn test_clearing_query_recollapses_only_single_location_facilities() {
        let mut model = sample();
        for facility in model.categories.iter_mut().flat_map(|c| c.facilities.iter_mut()) {
            facility.expanded = true;
        }

        let cleared = apply(&model, &FilterState::default());
        for facility in cleared.facilities() {
            assert_eq!(facility.expanded, facility.is_multi_location());
        }
    }

    #[test]
    fn test_narrowing_clears_collapse() {
        let collapsed = toggle_category(&sample(), "環球集市");
        assert!(collapsed.category("環球集市").unwrap().collapsed);

        let unfiltered = apply(&collapsed, &FilterState::default());
        assert!(unfiltered.category("環球集市").unwrap().collapsed);

        let searched = apply(&collapsed, &FilterState::new("burger", ZoneFilter::All));
        assert!(!searched.category("環球集市").unwrap().collapsed);
    }

    #[test]
    fn test_full_width_query() {
        let model = apply(&sample(), &FilterState::new("ｂｕｒｇｅｒ", ZoneFilter::All));
        assert_eq!(visible_names(&model), vec!["漢堡店/Burger"]);
    }
}
