//! Local search over cache slots
//!
//! Linear scans over already-fetched objects; no network access. All matching
//! is case-insensitive and every result is a deep copy.

use std::collections::HashSet;

use openwowi_domain::constants::{COMMUNICATION_EMAIL, COMMUNICATION_LANDLINE, COMMUNICATION_MOBILE};
use openwowi_domain::{BuildingLand, Contractor, LicenseAgreement, Person};

use super::store::CacheStore;

/// Where the needle has to occur in the haystack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Haystack starts with the needle.
    BeginsWith,
    /// Needle occurs anywhere in the haystack.
    #[default]
    Contains,
}

/// Case-insensitive substring or prefix test.
pub fn search_string(haystack: &str, needle: &str, mode: SearchMode) -> bool {
    let haystack = haystack.to_lowercase();
    let needle = needle.to_lowercase();
    match mode {
        SearchMode::Contains => haystack.contains(&needle),
        SearchMode::BeginsWith => haystack.starts_with(&needle),
    }
}

/// Criteria for person and contractor search. A person matches when any of
/// the supplied criteria matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonQuery {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub mode: SearchMode,
}

impl PersonQuery {
    /// Query by first, last or full name, or legal long name.
    pub fn name(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Self::default() }
    }

    /// Query by street of any address.
    pub fn address(address: impl Into<String>) -> Self {
        Self { address: Some(address.into()), ..Self::default() }
    }

    /// Query by landline or mobile number.
    pub fn phone(phone: impl Into<String>) -> Self {
        Self { phone: Some(phone.into()), ..Self::default() }
    }

    /// Query by e-mail address.
    pub fn email(email: impl Into<String>) -> Self {
        Self { email: Some(email.into()), ..Self::default() }
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Whether `person` satisfies any supplied criterion.
    pub fn matches(&self, person: &Person) -> bool {
        self.name.as_deref().is_some_and(|n| self.matches_name(person, n))
            || self.address.as_deref().is_some_and(|a| self.matches_address(person, a))
            || self.phone.as_deref().is_some_and(|p| self.matches_phone(person, p))
            || self.email.as_deref().is_some_and(|e| self.matches_email(person, e))
    }

    fn matches_name(&self, person: &Person, needle: &str) -> bool {
        let natural = person.natural_person.as_ref().and_then(|np| {
            let last = np.last_name.as_deref()?;
            let first = np.first_name.as_deref().unwrap_or_default();
            Some([
                first.to_string(),
                last.to_string(),
                format!("{first} {last}"),
                format!("{last}, {first}"),
            ])
        });
        if natural.is_some_and(|candidates| candidates.iter().any(|c| search_string(c, needle, self.mode))) {
            return true;
        }

        person
            .legal_person
            .as_ref()
            .and_then(|lp| lp.long_name1.as_deref())
            .is_some_and(|name| search_string(name, needle, self.mode))
    }

    fn matches_address(&self, person: &Person, needle: &str) -> bool {
        person
            .addresses
            .iter()
            .filter_map(|a| a.street_complete.as_deref())
            .any(|street| search_string(street, needle, self.mode))
    }

    fn matches_phone(&self, person: &Person, needle: &str) -> bool {
        let needle = normalize_phone(needle);
        person
            .communications
            .iter()
            .filter(|c| c.has_type(COMMUNICATION_LANDLINE) || c.has_type(COMMUNICATION_MOBILE))
            .filter_map(|c| c.content.as_deref())
            .any(|content| search_string(&normalize_phone(content), &needle, self.mode))
    }

    fn matches_email(&self, person: &Person, needle: &str) -> bool {
        person
            .communications
            .iter()
            .filter(|c| c.has_type(COMMUNICATION_EMAIL))
            .filter_map(|c| c.content.as_deref())
            .any(|content| search_string(content.trim(), needle, self.mode))
    }
}

/// Reduce a phone number to a comparable core: drop a `+` and the two-digit
/// country code after it, or a `0049` prefix, then leading zeros and spaces.
fn normalize_phone(raw: &str) -> String {
    let mut number = raw.trim();
    if let Some(rest) = number.strip_prefix('+') {
        number = rest.get(2..).unwrap_or_default();
    }
    if let Some(rest) = number.strip_prefix("0049") {
        number = rest;
    }
    number.trim_start_matches('0').replace(' ', "")
}

/// Street with all whitespace removed.
fn compact(raw: &str) -> String {
    raw.split_whitespace().collect()
}

/// Last `.`-separated segment of an id-num, parsed as an integer.
fn trailing_id_num(id_num: &str) -> Option<u64> {
    id_num.rsplit('.').next().and_then(|segment| segment.parse().ok())
}

impl CacheStore {
    /// Persons in the person slot matching `query`, at most `max_results`.
    pub fn search_persons(&self, query: &PersonQuery, max_results: usize) -> Vec<Person> {
        self.read::<Person>()
            .iter()
            .filter(|p| query.matches(p))
            .take(max_results)
            .cloned()
            .collect()
    }

    /// Contractors whose person matches `query`, at most `max_results`.
    ///
    /// Unless `allow_duplicates` is set, only the first contractor per person
    /// is returned.
    pub fn search_contractors(
        &self,
        query: &PersonQuery,
        max_results: usize,
        allow_duplicates: bool,
    ) -> Vec<Contractor> {
        let mut seen_persons = HashSet::new();
        let mut results = Vec::new();
        for contractor in self.read::<Contractor>() {
            if results.len() >= max_results {
                break;
            }
            if !allow_duplicates && seen_persons.contains(&contractor.person.id) {
                continue;
            }
            if query.matches(&contractor.person) {
                seen_persons.insert(contractor.person.id);
                results.push(contractor.clone());
            }
        }
        results
    }

    /// Building lands whose estate street matches `address`, ignoring
    /// whitespace. A query spelled with "str." also matches "straße".
    ///
    /// With `max_id_num`, building lands whose trailing id-num segment is
    /// numeric and larger are skipped. A bound of 0 means no bound.
    pub fn search_buildings(
        &self,
        address: &str,
        max_id_num: Option<u64>,
        max_results: usize,
        mode: SearchMode,
    ) -> Vec<BuildingLand> {
        let needle = compact(address);
        let expanded = needle.replace("str.", "straße").replace("Str.", "Straße");

        self.read::<BuildingLand>()
            .iter()
            .filter(|land| {
                let above_bound = max_id_num.filter(|bound| *bound > 0).is_some_and(|bound| {
                    land.id_num.as_deref().and_then(trailing_id_num).is_some_and(|n| n > bound)
                });
                !above_bound
            })
            .filter(|land| {
                land.estate_address
                    .as_ref()
                    .and_then(|a| a.street_complete.as_deref())
                    .map(compact)
                    .is_some_and(|street| {
                        search_string(&street, &needle, mode) || search_string(&street, &expanded, mode)
                    })
            })
            .take(max_results)
            .cloned()
            .collect()
    }

    /// License agreements whose id-num matches `id_num`.
    pub fn search_license_agreements(
        &self,
        id_num: &str,
        max_results: usize,
        mode: SearchMode,
    ) -> Vec<LicenseAgreement> {
        self.read::<LicenseAgreement>()
            .iter()
            .filter(|la| la.id_num.as_deref().is_some_and(|n| search_string(n, id_num, mode)))
            .take(max_results)
            .cloned()
            .collect()
    }
}
