//! Query parameters of a resource request

use std::collections::BTreeMap;

use chrono::NaiveDate;
use openwowi_domain::{Result, WowiError};

/// Query parameter map with unique keys.
///
/// Keys iterate in sorted order so the map doubles as a stable request
/// signature for the response cache. Inserting an existing key overwrites it
/// (last write wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    /// Key carrying the page size.
    pub const LIMIT: &'static str = "limit";
    /// Key carrying the page offset.
    pub const OFFSET: &'static str = "offset";

    pub fn new() -> Self {
        Self::default()
    }

    /// Build from static key/value pairs such as an entity's default flags.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    /// Set `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.insert(key.into(), value.to_string());
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key` only when a value is present.
    pub fn insert_opt<V: ToString>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Set `key` to a calendar date in `%Y-%m-%d` format, when present.
    pub fn insert_date(&mut self, key: &str, value: Option<NaiveDate>) {
        self.insert_opt(key, value.map(|d| d.format("%Y-%m-%d")));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Overlay `other` on top of `self`; keys in `other` win.
    pub fn extend(&mut self, other: &Self) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Page size, if set. A value that is not an integer is a validation
    /// error.
    pub fn limit(&self) -> Result<Option<i64>> {
        self.get(Self::LIMIT)
            .map(|raw| {
                raw.trim().parse::<i64>().map_err(|_| {
                    WowiError::Validation(format!("limit must be an integer, got '{raw}'"))
                })
            })
            .transpose()
    }

    /// Page offset, defaulting to zero when unset or not numeric.
    pub fn offset(&self) -> u64 {
        self.get(Self::OFFSET).and_then(|raw| raw.trim().parse().ok()).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl FromIterator<(String, String)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a QueryParams {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_values_win_on_extend() {
        let mut params = QueryParams::from_pairs(&[("showNullValues", "true"), ("includeAddress", "true")]);
        params.extend(&QueryParams::new().with("showNullValues", "false"));

        assert_eq!(params.get("showNullValues"), Some("false"));
        assert_eq!(params.get("includeAddress"), Some("true"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn limit_parses_or_fails_validation() {
        assert_eq!(QueryParams::new().limit().unwrap(), None);
        assert_eq!(QueryParams::new().with("limit", 250).limit().unwrap(), Some(250));

        let err = QueryParams::new().with("limit", "lots").limit().unwrap_err();
        assert!(matches!(err, WowiError::Validation(_)));
    }

    #[test]
    fn dates_use_iso_calendar_format() {
        let mut params = QueryParams::new();
        params.insert_date("licenseAgreementActiveOn", NaiveDate::from_ymd_opt(2024, 3, 1));
        params.insert_date("contractualUseActiveOn", None);

        assert_eq!(params.get("licenseAgreementActiveOn"), Some("2024-03-01"));
        assert!(!params.contains("contractualUseActiveOn"));
    }

    #[test]
    fn offset_defaults_to_zero() {
        assert_eq!(QueryParams::new().offset(), 0);
        assert_eq!(QueryParams::new().with("offset", 200).offset(), 200);
    }
}
