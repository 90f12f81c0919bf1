//! Rent accounting: license agreements and contract positions

use serde::{Deserialize, Serialize};

use super::common::CatalogEntry;
use super::inventory::UseUnitShort;
use super::person::Contractor;
use crate::impl_from_record;
use crate::mapping::null_to_default;

/// Restriction of use of a license agreement (vacancy, renovation, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictionOfUse {
    pub id: Option<i64>,
    pub node_id: Option<i64>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub is_vacancy: bool,
}

/// Dunning state of a license agreement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DunningData {
    #[serde(default, deserialize_with = "null_to_default")]
    pub dunningblock: bool,
    pub dunning_level: Option<CatalogEntry>,
}

/// Rental contract of a use unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseAgreement {
    pub id: i64,
    pub id_num: Option<String>,
    pub use_unit: Option<UseUnitShort>,
    pub restriction_of_use: Option<RestrictionOfUse>,
    pub status_contract: Option<CatalogEntry>,
    pub life_of_contract: Option<CatalogEntry>,
    pub payment_interval: Option<CatalogEntry>,
    pub dunning_data: Option<DunningData>,
    pub differing_maturity: Option<i32>,
    pub start_contract: Option<String>,
    pub end_of_contract: Option<String>,
    pub period_of_notice: Option<CatalogEntry>,
    pub debit_entry_type: Option<CatalogEntry>,
    /// Filled only when contractors were requested alongside the agreements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contractors: Option<Vec<Contractor>>,
}

impl LicenseAgreement {
    /// Use unit number the agreement refers to.
    pub fn use_unit_number(&self) -> Option<&str> {
        self.use_unit.as_ref().and_then(|u| u.use_unit_number.as_deref())
    }

    /// Economic unit id-num, i.e. the first segment of the use unit number.
    pub fn economic_unit_id_num(&self) -> Option<&str> {
        self.use_unit
            .as_ref()
            .and_then(|u| u.economic_unit.as_deref())
            .or_else(|| self.use_unit_number().and_then(|n| n.split('.').next()))
    }
}

/// License agreement reference embedded in contract positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseAgreementShort {
    pub id: i64,
    pub id_num: Option<String>,
    pub use_unit: Option<UseUnitShort>,
}

/// Type of a contract position (net rent, heating prepayment, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractPositionType {
    pub id: Option<i64>,
    pub node_id: Option<i64>,
    pub name: Option<String>,
    pub short_code: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub deposit: bool,
    #[serde(default, deserialize_with = "null_to_default")]
    pub is_part_of_net_rent: bool,
    #[serde(default, deserialize_with = "null_to_default")]
    pub is_prepayment_heating: bool,
    #[serde(default, deserialize_with = "null_to_default")]
    pub is_prepayment_running_cost: bool,
}

/// One priced position of a license agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractPosition {
    pub id: i64,
    pub net_amount: Option<f64>,
    pub amount: Option<f64>,
    pub active_from: Option<String>,
    pub active_to: Option<String>,
    pub license_agreement: Option<LicenseAgreementShort>,
    pub vat_rate: Option<CatalogEntry>,
    pub valid_contract_position: Option<CatalogEntry>,
    pub change_reason_contracts: Option<CatalogEntry>,
    pub contract_position_type: Option<ContractPositionType>,
    pub contract_position_type_slim: Option<ContractPositionType>,
}

impl_from_record!(
    RestrictionOfUse,
    DunningData,
    LicenseAgreement,
    LicenseAgreementShort,
    ContractPositionType,
    ContractPosition,
);
