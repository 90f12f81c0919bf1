//! Per-entity filters
//!
//! Each filter knows two things: the query parameters it contributes to a
//! network request, and how to test an already-typed object in cache mode.
//! In cache mode every supplied field that has a counterpart on the typed
//! object must match; fields without such a counterpart are ignored.

use std::fmt::Debug;

use chrono::NaiveDate;
use openwowi_domain::{
    BuildingLand, ContractPosition, Contractor, EconomicUnit, InvoiceReceipt, LicenseAgreement,
    Management, Owner, Person, Ticket, UseUnit,
};

use crate::api::QueryParams;

/// Filter over entities of type `T`.
pub trait EntityFilter<T>: Default + Debug {
    /// Query parameters sent with network requests.
    fn params(&self) -> QueryParams;

    /// Cache-mode predicate. Matches everything unless overridden.
    fn matches(&self, _item: &T) -> bool {
        true
    }
}

/// `true` when no expectation is set or the actual value equals it.
fn field_matches<A, E>(expected: Option<&E>, actual: Option<&A>) -> bool
where
    A: PartialEq<E> + ?Sized,
    E: ?Sized,
{
    expected.map_or(true, |e| actual.is_some_and(|a| a == e))
}

/// Filter for [`LicenseAgreement`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseAgreementFilter {
    pub economic_unit_id_num: Option<String>,
    pub use_unit_number: Option<String>,
    pub id_num: Option<String>,
    /// Network mode only.
    pub active_on: Option<NaiveDate>,
    /// Network mode only.
    pub person_id_num: Option<String>,
}

impl EntityFilter<LicenseAgreement> for LicenseAgreementFilter {
    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert_opt("EconomicUnitIdNum", self.economic_unit_id_num.as_ref());
        params.insert_opt("UseUnitNumber", self.use_unit_number.as_ref());
        params.insert_opt("LicenseAgreementIdNum", self.id_num.as_ref());
        params.insert_date("licenseAgreementActiveOn", self.active_on);
        params.insert_opt("personIdNum", self.person_id_num.as_ref());
        params
    }

    fn matches(&self, item: &LicenseAgreement) -> bool {
        field_matches(self.economic_unit_id_num.as_deref(), item.economic_unit_id_num())
            && field_matches(self.use_unit_number.as_deref(), item.use_unit_number())
            && field_matches(self.id_num.as_deref(), item.id_num.as_deref())
    }
}

/// Filter for [`Management`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagementFilter {
    pub id_num: Option<String>,
}

impl EntityFilter<Management> for ManagementFilter {
    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert_opt("managementIdNum", self.id_num.as_ref());
        params
    }
}

/// Filter for [`EconomicUnit`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EconomicUnitFilter {
    /// Network mode only.
    pub management_id_num: Option<String>,
    pub owner_number: Option<String>,
    pub id_num: Option<String>,
}

impl EntityFilter<EconomicUnit> for EconomicUnitFilter {
    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert_opt("managementIdNum", self.management_id_num.as_ref());
        params.insert_opt("ownerNumber", self.owner_number.as_ref());
        params.insert_opt("economicIdNum", self.id_num.as_ref());
        params
    }

    fn matches(&self, item: &EconomicUnit) -> bool {
        let owner_number = item.owner.as_ref().and_then(|o| o.owner_number.as_deref());
        field_matches(self.id_num.as_deref(), item.id_num.as_deref())
            && field_matches(self.owner_number.as_deref(), owner_number)
    }
}

/// Filter for [`BuildingLand`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildingLandFilter {
    /// Network mode only.
    pub management_id_num: Option<String>,
    /// Network mode only.
    pub owner_number: Option<String>,
    pub economic_unit_id_num: Option<String>,
    pub id_num: Option<String>,
}

impl EntityFilter<BuildingLand> for BuildingLandFilter {
    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert_opt("managementIdNum", self.management_id_num.as_ref());
        params.insert_opt("ownerNumber", self.owner_number.as_ref());
        params.insert_opt("economicIdNum", self.economic_unit_id_num.as_ref());
        params.insert_opt("buildingLandIdNum", self.id_num.as_ref());
        params
    }

    fn matches(&self, item: &BuildingLand) -> bool {
        field_matches(self.economic_unit_id_num.as_deref(), item.economic_unit_id_num())
            && field_matches(self.id_num.as_deref(), item.id_num.as_deref())
    }
}

/// Filter for [`Owner`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerFilter {
    pub owner_number: Option<String>,
}

impl EntityFilter<Owner> for OwnerFilter {
    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert_opt("ownerNumber", self.owner_number.as_ref());
        params
    }
}

/// Invoice receipts take no filter fields; use extra params instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceReceiptFilter;

impl EntityFilter<InvoiceReceipt> for InvoiceReceiptFilter {
    fn params(&self) -> QueryParams {
        QueryParams::new()
    }
}

/// Filter for [`UseUnit`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UseUnitFilter {
    pub id_num: Option<String>,
    pub building_land_id_num: Option<String>,
    pub economic_unit_id_num: Option<String>,
    /// Network mode only.
    pub management_id_num: Option<String>,
    /// Network mode only.
    pub owner_number: Option<String>,
}

impl EntityFilter<UseUnit> for UseUnitFilter {
    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert_opt("useUnitNumber", self.id_num.as_ref());
        params.insert_opt("buildingLandIdNum", self.building_land_id_num.as_ref());
        params.insert_opt("EconomicUnitIdNum", self.economic_unit_id_num.as_ref());
        params.insert_opt("managementIdNum", self.management_id_num.as_ref());
        params.insert_opt("ownerNumber", self.owner_number.as_ref());
        params
    }

    fn matches(&self, item: &UseUnit) -> bool {
        field_matches(self.id_num.as_deref(), item.id_num.as_deref())
            && field_matches(self.building_land_id_num.as_deref(), item.building_land_id_num())
            && field_matches(self.economic_unit_id_num.as_deref(), item.economic_unit_id_num())
    }
}

/// Filter for [`Contractor`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractorFilter {
    pub license_agreement_id: Option<i64>,
    pub person_id: Option<i64>,
    /// Network mode only.
    pub license_agreement_active_on: Option<NaiveDate>,
    /// Network mode only.
    pub contractual_use_active_on: Option<NaiveDate>,
}

impl ContractorFilter {
    /// Contractors of one license agreement.
    pub fn for_agreement(license_agreement_id: i64) -> Self {
        Self { license_agreement_id: Some(license_agreement_id), ..Self::default() }
    }
}

impl EntityFilter<Contractor> for ContractorFilter {
    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert_opt("licenseAgreementId", self.license_agreement_id);
        params.insert_opt("personId", self.person_id);
        params.insert_date("licenseAgreementActiveOn", self.license_agreement_active_on);
        params.insert_date("contractualUseActiveOn", self.contractual_use_active_on);
        params
    }

    fn matches(&self, item: &Contractor) -> bool {
        field_matches(self.license_agreement_id.as_ref(), item.license_agreement_id.as_ref())
            && field_matches(self.person_id.as_ref(), Some(&item.person.id))
    }
}

/// Filter for [`Person`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFilter {
    pub person_id: Option<i64>,
}

impl EntityFilter<Person> for PersonFilter {
    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert_opt("personId", self.person_id);
        params
    }

    fn matches(&self, item: &Person) -> bool {
        field_matches(self.person_id.as_ref(), Some(&item.id))
    }
}

/// Filter for [`ContractPosition`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractPositionFilter {
    pub license_agreement_id_num: Option<String>,
    pub license_agreement_id: Option<i64>,
    pub active_on: Option<NaiveDate>,
}

impl EntityFilter<ContractPosition> for ContractPositionFilter {
    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert_opt("licenseAgreementIdNum", self.license_agreement_id_num.as_ref());
        params.insert_opt("licenseAgreementId", self.license_agreement_id);
        params.insert_date("contractPositionsActiveOn", self.active_on);
        params
    }
}

/// Filter for [`Ticket`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    pub ticket_id: Option<i64>,
    pub ticket_id_num: Option<String>,
    pub priority_id: Option<i64>,
    pub status_id: Option<i64>,
    pub source_id: Option<i64>,
}

impl EntityFilter<Ticket> for TicketFilter {
    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert_opt("ticketId", self.ticket_id);
        params.insert_opt("ticketIdNum", self.ticket_id_num.as_ref());
        params.insert_opt("ticketPriorityId", self.priority_id);
        params.insert_opt("ticketStatusId", self.status_id);
        params.insert_opt("ticketSourceId", self.source_id);
        params
    }
}

#[cfg(test)]
mod tests {
    use openwowi_domain::map_record;
    use serde_json::json;

    use super::*;

    fn use_unit(id_num: &str, building_land: &str, economic_unit: &str) -> UseUnit {
        map_record(&json!({
            "Id": 1,
            "IdNum": id_num,
            "BuildingLand": {"Id": 2, "IdNum": building_land},
            "EconomicUnit": {"Id": 3, "IdNum": economic_unit}
        }))
        .unwrap()
    }

    #[test]
    fn params_use_wire_keys() {
        let filter = LicenseAgreementFilter {
            economic_unit_id_num: Some("001".into()),
            active_on: NaiveDate::from_ymd_opt(2024, 1, 31),
            ..LicenseAgreementFilter::default()
        };
        let params = filter.params();

        assert_eq!(params.get("EconomicUnitIdNum"), Some("001"));
        assert_eq!(params.get("licenseAgreementActiveOn"), Some("2024-01-31"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(UseUnitFilter::default().matches(&use_unit("001.01.0001", "001.01", "001")));
        assert!(UseUnitFilter::default().params().is_empty());
    }

    #[test]
    fn cache_predicates_require_every_supplied_field() {
        let unit = use_unit("001.01.0001", "001.01", "001");

        let both = UseUnitFilter {
            building_land_id_num: Some("001.01".into()),
            economic_unit_id_num: Some("001".into()),
            ..UseUnitFilter::default()
        };
        assert!(both.matches(&unit));

        let mismatch = UseUnitFilter {
            building_land_id_num: Some("001.01".into()),
            economic_unit_id_num: Some("002".into()),
            ..UseUnitFilter::default()
        };
        assert!(!mismatch.matches(&unit));
    }

    #[test]
    fn network_only_fields_are_ignored_in_cache_mode() {
        let unit = use_unit("001.01.0001", "001.01", "001");
        let filter = UseUnitFilter { owner_number: Some("E-9".into()), ..UseUnitFilter::default() };

        assert!(filter.matches(&unit));
        assert_eq!(filter.params().get("ownerNumber"), Some("E-9"));
    }

    #[test]
    fn missing_field_on_object_does_not_match_supplied_filter() {
        let unit: UseUnit = map_record(&json!({"Id": 1})).unwrap();
        let filter = UseUnitFilter { economic_unit_id_num: Some("001".into()), ..UseUnitFilter::default() };
        assert!(!filter.matches(&unit));
    }
}
