//! Display-ready view model: zone categories of facilities of locations.
//!
//! A [`ViewModel`] is rebuilt from scratch for every dataset load and treated
//! as a value afterwards. Filtering and selection produce new models (or
//! effects) instead of patching shared state.

use crate::core::constants::PRICE_PREFIX;
use crate::core::geo::{LatLng, LatLngBounds};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewLocation {
    /// `<facility id>-loc-<n>`
    pub id: String,
    pub position: LatLng,
    /// `地點 N` for multi-location facilities, the facility name otherwise
    pub label: String,
    /// Folded label; the facility name is matched on the facility's own key
    pub label_key: String,
    pub visible: bool,
}

/// Sanitized menu entry; at least one description is present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub description_cn: Option<String>,
    pub description_eng: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

impl MenuItem {
    /// Chinese first, then English, then the generic description
    pub fn title(&self) -> &str {
        self.description_cn
            .as_deref()
            .or(self.description_eng.as_deref())
            .or(self.description.as_deref())
            .unwrap_or_default()
    }

    /// English line shown under the title when the title is Chinese
    pub fn subtitle(&self) -> Option<&str> {
        self.description_cn.as_ref()?;
        self.description_eng.as_deref()
    }

    /// `₩12,000`; `None` without a usable price
    pub fn formatted_price(&self) -> Option<String> {
        let price = self.price.filter(|p| p.is_finite() && *p >= 0.0)?;
        let whole = price.round() as u64;
        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        Some(format!("{}{}", PRICE_PREFIX, grouped))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewFacility {
    /// `facility-<n>`, assigned in display order
    pub id: String,
    pub name: String,
    /// Folded display name
    pub search_key: String,
    pub zone: String,
    pub is_restaurant: bool,
    pub locations: Vec<ViewLocation>,
    pub menu: Vec<MenuItem>,
    pub visible: bool,
    /// Whether the location sub-list is open
    pub expanded: bool,
}

impl ViewFacility {
    pub fn has_menu(&self) -> bool {
        !self.menu.is_empty()
    }

    /// Menu modal is offered only for restaurants with sanitized entries
    pub fn offers_menu(&self) -> bool {
        self.is_restaurant && self.has_menu()
    }

    pub fn is_multi_location(&self) -> bool {
        self.locations.len() > 1
    }

    pub fn location(&self, location_id: &str) -> Option<&ViewLocation> {
        self.locations.iter().find(|l| l.id == location_id)
    }

    pub fn visible_locations(&self) -> impl Iterator<Item = &ViewLocation> {
        self.locations.iter().filter(|l| l.visible)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneCategory {
    pub name: String,
    pub facilities: Vec<ViewFacility>,
    pub visible: bool,
    pub collapsed: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewModel {
    pub categories: Vec<ZoneCategory>,
    /// `全部區域` followed by every observed zone in priority order
    pub zone_names: Vec<String>,
}

impl ViewModel {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn facilities(&self) -> impl Iterator<Item = &ViewFacility> {
        self.categories.iter().flat_map(|c| c.facilities.iter())
    }

    pub fn facility_count(&self) -> usize {
        self.categories.iter().map(|c| c.facilities.len()).sum()
    }

    pub fn location_count(&self) -> usize {
        self.facilities().map(|f| f.locations.len()).sum()
    }

    pub fn facility(&self, facility_id: &str) -> Option<&ViewFacility> {
        self.facilities().find(|f| f.id == facility_id)
    }

    pub fn facility_mut(&mut self, facility_id: &str) -> Option<&mut ViewFacility> {
        self.categories
            .iter_mut()
            .flat_map(|c| c.facilities.iter_mut())
            .find(|f| f.id == facility_id)
    }

    pub fn category(&self, name: &str) -> Option<&ZoneCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn category_mut(&mut self, name: &str) -> Option<&mut ZoneCategory> {
        self.categories.iter_mut().find(|c| c.name == name)
    }

    pub fn visible_facilities(&self) -> impl Iterator<Item = &ViewFacility> {
        self.categories
            .iter()
            .filter(|c| c.visible)
            .flat_map(|c| c.facilities.iter().filter(|f| f.visible))
    }

    /// Bounds of every location in the model
    pub fn bounds(&self) -> Option<LatLngBounds> {
        let positions: Vec<LatLng> = self
            .facilities()
            .flat_map(|f| f.locations.iter().map(|l| l.position))
            .collect();
        LatLngBounds::from_points(positions.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(cn: Option<&str>, eng: Option<&str>, price: Option<f64>) -> MenuItem {
        MenuItem {
            id: "facility-1-menu-1".to_string(),
            description_cn: cn.map(str::to_string),
            description_eng: eng.map(str::to_string),
            description: None,
            price,
        }
    }

    #[test]
    fn test_menu_titles() {
        let both = item(Some("牛肉堡"), Some("Beef Burger"), None);
        assert_eq!(both.title(), "牛肉堡");
        assert_eq!(both.subtitle(), Some("Beef Burger"));

        let eng = item(None, Some("Fries"), None);
        assert_eq!(eng.title(), "Fries");
        assert_eq!(eng.subtitle(), None);
    }

    #[test]
    fn test_price_formatting() {
        assert_eq!(
            item(None, Some("a"), Some(12000.0)).formatted_price().as_deref(),
            Some("₩12,000")
        );
        assert_eq!(item(None, Some("a"), Some(500.0)).formatted_price().as_deref(), Some("₩500"));
        assert_eq!(
            item(None, Some("a"), Some(1234567.0)).formatted_price().as_deref(),
            Some("₩1,234,567")
        );
        assert_eq!(item(None, Some("a"), None).formatted_price(), None);
        assert_eq!(item(None, Some("a"), Some(f64::NAN)).formatted_price(), None);
    }
}
