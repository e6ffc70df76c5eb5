//! Raw facility records as published in the park's facility JSON.
//!
//! The upstream file is loose: codes show up as strings or numbers,
//! coordinates are numeric strings, and optional lists may be `null`. Every
//! field is therefore optional here and coerced leniently; deciding what is
//! usable is the normalizer's job.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One facility entry of the raw dataset
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FacilityRecord {
    #[serde(rename = "zoneKindCd", default, deserialize_with = "loose_string")]
    pub zone_code: Option<String>,
    #[serde(rename = "faciltCateKindCd", default, deserialize_with = "loose_string")]
    pub category_code: Option<String>,
    #[serde(rename = "faciltNameCN", default, deserialize_with = "loose_string")]
    pub name_cn: Option<String>,
    #[serde(rename = "faciltNameEng", default, deserialize_with = "loose_string")]
    pub name_eng: Option<String>,
    #[serde(rename = "faciltName", default, deserialize_with = "loose_string")]
    pub short_name: Option<String>,
    #[serde(rename = "locList", default, deserialize_with = "null_as_empty")]
    pub locations: Vec<LocationRecord>,
    #[serde(rename = "menuList", default, deserialize_with = "null_as_empty")]
    pub menu: Vec<MenuRecord>,
}

/// Raw `{latud, lgtud}` pair, kept unparsed
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocationRecord {
    #[serde(default)]
    pub latud: Value,
    #[serde(default)]
    pub lgtud: Value,
}

impl LocationRecord {
    /// Parses both components; `None` if either is missing, malformed or non-finite
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = parse_number(&self.latud)?;
        let lng = parse_number(&self.lgtud)?;
        (lat.is_finite() && lng.is_finite()).then_some((lat, lng))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MenuRecord {
    #[serde(rename = "menuDescrtCN", default, deserialize_with = "loose_string")]
    pub description_cn: Option<String>,
    #[serde(rename = "menuDescrtEng", default, deserialize_with = "loose_string")]
    pub description_eng: Option<String>,
    #[serde(rename = "menuDescrt", default, deserialize_with = "loose_string")]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Value,
}

/// Parses a whole dataset, skipping entries that do not look like records.
///
/// Only a document that is not a JSON array at all is an error.
pub fn parse_records(json: &str) -> crate::Result<Vec<FacilityRecord>> {
    let raw: Vec<Value> = serde_json::from_str(json)?;
    Ok(records_from_values(raw))
}

pub fn records_from_values(raw: Vec<Value>) -> Vec<FacilityRecord> {
    let total = raw.len();
    let records: Vec<FacilityRecord> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                log::debug!("skipping malformed record #{}: {}", index, e);
                None
            }
        })
        .collect();

    if records.len() != total {
        log::debug!("parsed {} of {} raw records", records.len(), total);
    }
    records
}

/// Accepts numbers and numeric strings; anything else is `None`
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Trimmed text, `None` when empty
pub fn non_empty(text: &Option<String>) -> Option<&str> {
    text.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_record() {
        let records = parse_records(
            r#"[{
                "zoneKindCd": "01",
                "faciltCateKindCd": "04",
                "faciltNameCN": "漢堡店",
                "faciltNameEng": "Burger",
                "faciltName": "BGR",
                "locList": [{"latud": "37.30", "lgtud": "127.20"}],
                "menuList": [{"menuDescrtCN": "牛肉堡", "price": 12000}]
            }]"#,
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.zone_code.as_deref(), Some("01"));
        assert_eq!(record.category_code.as_deref(), Some("04"));
        assert_eq!(record.locations[0].coordinates(), Some((37.30, 127.20)));
        assert_eq!(record.menu[0].description_cn.as_deref(), Some("牛肉堡"));
        assert_eq!(parse_number(&record.menu[0].price), Some(12000.0));
    }

    #[test]
    fn test_loose_fields() {
        let records = parse_records(
            r#"[{"zoneKindCd": 2, "locList": null, "menuList": null, "faciltNameCN": null}]"#,
        )
        .unwrap();

        assert_eq!(records[0].zone_code.as_deref(), Some("2"));
        assert!(records[0].locations.is_empty());
        assert!(records[0].menu.is_empty());
        assert!(records[0].name_cn.is_none());
    }

    #[test]
    fn test_malformed_coordinates() {
        let loc = |lat: Value, lng: Value| LocationRecord { latud: lat, lgtud: lng };

        assert_eq!(loc(Value::from(37.3), Value::from("127.2")).coordinates(), Some((37.3, 127.2)));
        assert_eq!(loc(Value::from("abc"), Value::from("127.2")).coordinates(), None);
        assert_eq!(loc(Value::from("NaN"), Value::from("127.2")).coordinates(), None);
        assert_eq!(loc(Value::from("inf"), Value::from("127.2")).coordinates(), None);
        assert_eq!(loc(Value::Null, Value::from("127.2")).coordinates(), None);
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let records =
            parse_records(r#"[{"locList": "oops"}, 42, {"faciltNameCN": "旋轉木馬"}]"#).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name_cn.as_deref(), Some("旋轉木馬"));
    }

    #[test]
    fn test_non_array_is_an_error() {
        assert!(parse_records(r#"{"locList": []}"#).is_err());
    }
}
