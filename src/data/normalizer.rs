//! Raw facility records → grouped, de-duplicated, sorted [`ViewModel`].

use crate::{
    core::constants::{ALL_ZONES_LABEL, LOCATION_LABEL_PREFIX, RESTAURANT_CATEGORY_CODE},
    core::geo::LatLng,
    data::{
        model::{MenuItem, ViewFacility, ViewLocation, ViewModel, ZoneCategory},
        record::{non_empty, parse_number, FacilityRecord, MenuRecord},
        zones::{compare_zones, zone_name},
        NormalizeStrategy,
    },
    prelude::HashMap,
    search::text::fold,
    Error, Result,
};
use icu_collator::{Collator, CollatorOptions, Strength};
use std::cmp::Ordering;

/// Locale-aware name ordering (Traditional Chinese stroke order, base sensitivity).
///
/// Falls back to case-insensitive code point order when the collation data
/// cannot be loaded; ties always break on raw code points so the order is
/// total and repeatable.
pub struct NameCollator {
    collator: Option<Collator>,
}

impl NameCollator {
    pub fn traditional_chinese() -> Self {
        Self::try_traditional_chinese().unwrap_or_else(|e| {
            log::warn!("{}, using code point order", e);
            Self::code_point()
        })
    }

    pub fn try_traditional_chinese() -> Result<Self> {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Primary);
        // plain zh-Hant resolves to the pinyin tailoring; stroke must be requested
        let locale = icu_locid::locale!("zh-Hant-u-co-stroke").into();

        let collator = Collator::try_new(&locale, options).map_err(|e| {
            Error::Collation(format!("zh-Hant stroke collation unavailable: {}", e))
        })?;
        Ok(Self {
            collator: Some(collator),
        })
    }

    /// Case-insensitive code point order
    pub fn code_point() -> Self {
        Self { collator: None }
    }

    pub fn is_locale_aware(&self) -> bool {
        self.collator.is_some()
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let primary = match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()),
        };
        primary.then_with(|| a.cmp(b))
    }
}

impl Default for NameCollator {
    fn default() -> Self {
        Self::traditional_chinese()
    }
}

impl std::fmt::Debug for NameCollator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameCollator")
            .field("locale_aware", &self.collator.is_some())
            .finish()
    }
}

/// Normalizer for the structured facility dataset
#[derive(Debug, Default)]
pub struct FacilityNormalizer {
    collator: NameCollator,
}

/// Facility accumulated across duplicate records, before ids are assigned
#[derive(Debug)]
struct PendingFacility {
    name: String,
    zone: &'static str,
    is_restaurant: bool,
    positions: Vec<LatLng>,
    menu: Vec<PendingMenuItem>,
}

#[derive(Debug, PartialEq)]
struct PendingMenuItem {
    description_cn: Option<String>,
    description_eng: Option<String>,
    description: Option<String>,
    price: Option<f64>,
}

impl FacilityNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collator(collator: NameCollator) -> Self {
        Self { collator }
    }

    pub fn collator(&self) -> &NameCollator {
        &self.collator
    }

    /// Builds the view model; every entry starts visible and collapsed.
    pub fn build(&self, records: &[FacilityRecord]) -> ViewModel {
        let started = instant::Instant::now();

        let mut pending: Vec<PendingFacility> = Vec::new();
        let mut index: HashMap<(&'static str, String), usize> = HashMap::default();

        for record in records {
            let Some(pending_facility) = Self::pending_from_record(record) else {
                continue;
            };
            let key = (pending_facility.zone, pending_facility.name.clone());
            match index.get(&key) {
                Some(&existing) => merge(&mut pending[existing], pending_facility),
                None => {
                    index.insert(key, pending.len());
                    pending.push(pending_facility);
                }
            }
        }

        let mut grouped: Vec<(&'static str, Vec<PendingFacility>)> = Vec::new();
        for facility in pending {
            match grouped.iter_mut().find(|(zone, _)| *zone == facility.zone) {
                Some((_, facilities)) => facilities.push(facility),
                None => grouped.push((facility.zone, vec![facility])),
            }
        }

        grouped.sort_by(|(a, _), (b, _)| compare_zones(a, b));
        for (_, facilities) in grouped.iter_mut() {
            facilities.sort_by(|a, b| self.collator.compare(&a.name, &b.name));
        }

        let mut next_id = 1usize;
        let mut zone_names = vec![ALL_ZONES_LABEL.to_string()];
        let categories: Vec<ZoneCategory> = grouped
            .into_iter()
            .map(|(zone, facilities)| {
                zone_names.push(zone.to_string());
                let facilities = facilities
                    .into_iter()
                    .map(|facility| {
                        let id = format!("facility-{}", next_id);
                        next_id += 1;
                        finish_facility(id, facility)
                    })
                    .collect();
                ZoneCategory {
                    name: zone.to_string(),
                    facilities,
                    visible: true,
                    collapsed: false,
                }
            })
            .collect();

        let model = ViewModel {
            categories,
            zone_names,
        };
        log::debug!(
            "normalized {} records into {} facilities / {} locations in {:?}",
            records.len(),
            model.facility_count(),
            model.location_count(),
            started.elapsed()
        );
        model
    }

    fn pending_from_record(record: &FacilityRecord) -> Option<PendingFacility> {
        let positions: Vec<LatLng> = record
            .locations
            .iter()
            .filter_map(|loc| loc.coordinates())
            .filter_map(|(lat, lng)| LatLng::try_new(lat, lng))
            .collect();

        if positions.is_empty() {
            return None;
        }

        let Some(name) = display_name(record) else {
            log::debug!("skipping record without any name: {:?}", record.zone_code);
            return None;
        };

        if positions.len() < record.locations.len() {
            log::debug!(
                "{}: dropped {} malformed locations",
                name,
                record.locations.len() - positions.len()
            );
        }

        let is_restaurant = record
            .category_code
            .as_deref()
            .map(str::trim)
            .is_some_and(|code| code == RESTAURANT_CATEGORY_CODE);

        Some(PendingFacility {
            name,
            zone: zone_name(record.zone_code.as_deref()),
            is_restaurant,
            positions,
            menu: record.menu.iter().filter_map(sanitize_menu_item).collect(),
        })
    }
}

impl NormalizeStrategy for FacilityNormalizer {
    type Input = [FacilityRecord];
    type Output = ViewModel;

    fn normalize(&self, input: &Self::Input) -> Self::Output {
        self.build(input)
    }
}

/// `中文/English (short)`, degrading to whichever parts exist
pub fn display_name(record: &FacilityRecord) -> Option<String> {
    let chinese = non_empty(&record.name_cn);
    let english = match (non_empty(&record.name_eng), non_empty(&record.short_name)) {
        (Some(eng), Some(short)) => Some(format!("{} ({})", eng, short)),
        (Some(eng), None) => Some(eng.to_string()),
        (None, Some(short)) => Some(short.to_string()),
        (None, None) => None,
    };

    match (chinese, english) {
        (Some(cn), Some(en)) => Some(format!("{}/{}", cn, en)),
        (Some(cn), None) => Some(cn.to_string()),
        (None, english) => english,
    }
}

fn sanitize_menu_item(raw: &MenuRecord) -> Option<PendingMenuItem> {
    let description_cn = non_empty(&raw.description_cn).map(str::to_string);
    let description_eng = non_empty(&raw.description_eng).map(str::to_string);
    let description = non_empty(&raw.description).map(str::to_string);

    if description_cn.is_none() && description_eng.is_none() && description.is_none() {
        return None;
    }

    Some(PendingMenuItem {
        description_cn,
        description_eng,
        description,
        price: parse_number(&raw.price).filter(|p| p.is_finite()),
    })
}

/// Later duplicates only add: unseen locations, restaurant flag, unseen menu items
fn merge(existing: &mut PendingFacility, incoming: PendingFacility) {
    existing.is_restaurant |= incoming.is_restaurant;
    for position in incoming.positions {
        if !existing.positions.contains(&position) {
            existing.positions.push(position);
        }
    }
    for item in incoming.menu {
        if !existing.menu.contains(&item) {
            existing.menu.push(item);
        }
    }
}

fn finish_facility(id: String, facility: PendingFacility) -> ViewFacility {
    let multi = facility.positions.len() > 1;
    let locations = facility
        .positions
        .iter()
        .enumerate()
        .map(|(i, position)| {
            let label = if multi {
                format!("{} {}", LOCATION_LABEL_PREFIX, i + 1)
            } else {
                facility.name.clone()
            };
            ViewLocation {
                id: format!("{}-loc-{}", id, i + 1),
                position: *position,
                label_key: fold(&label),
                label,
                visible: true,
            }
        })
        .collect();

    let menu = facility
        .menu
        .into_iter()
        .enumerate()
        .map(|(i, item)| MenuItem {
            id: format!("{}-menu-{}", id, i + 1),
            description_cn: item.description_cn,
            description_eng: item.description_eng,
            description: item.description,
            price: item.price,
        })
        .collect();

    ViewFacility {
        search_key: fold(&facility.name),
        name: facility.name,
        zone: facility.zone.to_string(),
        is_restaurant: facility.is_restaurant,
        locations,
        menu,
        visible: true,
        expanded: false,
        id,
    }
}
