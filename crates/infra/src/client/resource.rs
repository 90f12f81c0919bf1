//! Entity resources
//!
//! Binds each domain type to its endpoint, its default include flags, its
//! filter type and, for cacheable types, its cache slot.

use openwowi_domain::{
    BuildingLand, ContractPosition, Contractor, EconomicUnit, FromRecord, InvoiceReceipt,
    LicenseAgreement, Management, Owner, Person, Ticket, UseUnit,
};

use super::filters::{
    BuildingLandFilter, ContractPositionFilter, ContractorFilter, EconomicUnitFilter,
    EntityFilter, InvoiceReceiptFilter, LicenseAgreementFilter, ManagementFilter, OwnerFilter,
    PersonFilter, TicketFilter, UseUnitFilter,
};
use crate::api::QueryParams;
use crate::cache::CacheStore;

/// A domain type readable from a resource endpoint.
pub trait Resource: FromRecord + Clone {
    /// Endpoint path relative to the versioned resource root.
    const ENDPOINT: &'static str;

    /// Include flags sent with every request unless overridden.
    const DEFAULT_PARAMS: &'static [(&'static str, &'static str)];

    /// Filter accepted by the accessor.
    type Filter: EntityFilter<Self>;

    /// Cache slot contents, or `None` for types without a slot.
    fn cached(_store: &CacheStore) -> Option<&[Self]> {
        None
    }

    fn default_params() -> QueryParams {
        QueryParams::from_pairs(Self::DEFAULT_PARAMS)
    }
}

const PERSON_DETAILS: &[(&str, &str)] = &[
    ("includeMainAddress", "true"),
    ("includeMainCommunication", "true"),
    ("includeMainBankaccount", "true"),
    ("includePersonAddresses", "true"),
    ("includePersonCommunications", "true"),
    ("includePersonBankAccounts", "true"),
    ("includeCompanyCodes", "true"),
];

macro_rules! impl_resource {
    ($ty:ty, $endpoint:literal, $filter:ty, $defaults:expr) => {
        impl Resource for $ty {
            const ENDPOINT: &'static str = $endpoint;
            const DEFAULT_PARAMS: &'static [(&'static str, &'static str)] = $defaults;
            type Filter = $filter;
        }
    };
    ($ty:ty, $endpoint:literal, $filter:ty, $defaults:expr, cached) => {
        impl Resource for $ty {
            const ENDPOINT: &'static str = $endpoint;
            const DEFAULT_PARAMS: &'static [(&'static str, &'static str)] = $defaults;
            type Filter = $filter;

            fn cached(store: &CacheStore) -> Option<&[Self]> {
                Some(store.read::<Self>())
            }
        }
    };
}

impl_resource!(LicenseAgreement, "RentAccounting/LicenseAgreements", LicenseAgreementFilter, &[], cached);

impl_resource!(Management, "CommercialInventory/Managements", ManagementFilter, PERSON_DETAILS);

impl_resource!(
    EconomicUnit,
    "CommercialInventory/EconomicUnits",
    EconomicUnitFilter,
    &[("includeCompanyCode", "true")],
    cached
);

impl_resource!(
    BuildingLand,
    "CommercialInventory/BuildingLands",
    BuildingLandFilter,
    &[("includeCompanyCode", "true"), ("showNullValues", "true")],
    cached
);

impl_resource!(Owner, "CommercialInventory/Owners", OwnerFilter, PERSON_DETAILS);

impl_resource!(
    InvoiceReceipt,
    "CommissioningRead/InvoiceReceipt/CommissionItems",
    InvoiceReceiptFilter,
    &[("showNullValues", "true"), ("includePaymentOrder", "true")]
);

impl_resource!(
    UseUnit,
    "CommercialInventory/UseUnits",
    UseUnitFilter,
    &[
        ("includeUseUnitTypes", "true"),
        ("includeBillingUnits", "true"),
        ("includeMarketingTags", "false"),
        ("showNullValues", "true"),
    ],
    cached
);

impl_resource!(
    Contractor,
    "RentAccountingPersonDetails/Contractors",
    ContractorFilter,
    &[
        ("includeMainAddress", "true"),
        ("includeMainCommunication", "true"),
        ("includePersonAddresses", "true"),
        ("includePersonCommunications", "true"),
        ("includePersonBankAccounts", "true"),
        ("showNullValues", "true"),
    ],
    cached
);

impl_resource!(
    Person,
    "PersonsRead/Persons",
    PersonFilter,
    &[
        ("includeAddress", "true"),
        ("includeCommunication", "true"),
        ("includeBankaccount", "true"),
        ("showNullValues", "true"),
    ],
    cached
);

impl_resource!(
    ContractPosition,
    "RentAccounting/ContractPositions",
    ContractPositionFilter,
    &[("includeContractPositionTypeDetails", "true"), ("showNullValues", "true")]
);

impl_resource!(
    Ticket,
    "CommunicationRead/Ticket",
    TicketFilter,
    &[
        ("includeComments", "true"),
        ("includeAssignmentEntity", "true"),
        ("showNullValues", "true"),
    ]
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_cacheable_types_expose_a_slot() {
        let store = CacheStore::new();
        assert!(UseUnit::cached(&store).is_some());
        assert!(Person::cached(&store).is_some());
        assert!(Management::cached(&store).is_none());
        assert!(Ticket::cached(&store).is_none());
    }

    #[test]
    fn default_params_carry_include_flags() {
        let params = UseUnit::default_params();
        assert_eq!(params.get("includeMarketingTags"), Some("false"));
        assert_eq!(params.get("showNullValues"), Some("true"));
        assert!(LicenseAgreement::default_params().is_empty());
    }
}
