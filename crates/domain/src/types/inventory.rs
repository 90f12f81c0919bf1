//! Commercial inventory: managements, owners, economic units, building lands
//! and use units

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{Address, BankAccount, CatalogEntry, CompanyCode, EstateAddress};
use super::person::Person;
use crate::impl_from_record;
use crate::mapping::{deserialize_normalized, null_to_default, FromRecord};
use crate::Result;

/// Property management unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Management {
    pub id: i64,
    pub id_num: Option<String>,
    pub name: Option<String>,
    pub node_id: Option<i64>,
    pub parent_management_id: Option<i64>,
    pub administration_type: Option<CatalogEntry>,
    pub person: Option<Person>,
    pub default_address: Option<Address>,
    pub default_bankaccount: Option<BankAccount>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub company_codes: Vec<CompanyCode>,
}

/// Owner reference embedded in economic units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerShort {
    pub id: i64,
    pub owner_number: Option<String>,
}

/// Property owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub id: i64,
    pub owner_number: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub is_condominium: bool,
    pub person: Option<Person>,
    pub default_address: Option<Address>,
    pub default_bankaccount: Option<BankAccount>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub company_codes: Vec<CompanyCode>,
}

/// Economic unit reference embedded in building lands and use units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomicUnitShort {
    pub id: i64,
    pub id_num: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
}

/// Economic unit (a group of buildings managed together).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicUnit {
    pub id: i64,
    pub id_num: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub construction_year: Option<i32>,
    pub info: Option<String>,
    pub binding_end_date: Option<String>,
    pub owner: Option<OwnerShort>,
    pub asset_identification: Option<CatalogEntry>,
    pub status_inventory: Option<CatalogEntry>,
    pub district: Option<CatalogEntry>,
    pub monumental_protection_type: Option<CatalogEntry>,
    pub regional_responsibility: Option<CatalogEntry>,
    pub company_code: Option<CompanyCode>,
}

/// Building data of a building land.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub construction_year: Option<i32>,
    pub move_in_date: Option<String>,
    pub building_number_of_storeys: Option<i32>,
    pub construction_method: Option<CatalogEntry>,
    pub building_type: Option<CatalogEntry>,
    pub district: Option<CatalogEntry>,
    pub monumental_protection_type: Option<CatalogEntry>,
    pub origin: Option<CatalogEntry>,
    pub change_reason: Option<CatalogEntry>,
}

/// Land data of a building land.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Land {
    pub land_area: Option<f64>,
    pub entry_reason: Option<CatalogEntry>,
}

/// Building land (a plot, usually carrying one building).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingLand {
    pub id: i64,
    pub id_num: Option<String>,
    pub entry_date: Option<String>,
    pub exit_date: Option<String>,
    pub economic_unit: Option<EconomicUnitShort>,
    pub estate_address: Option<EstateAddress>,
    pub land: Option<Land>,
    pub building: Option<Building>,
    pub exit_reason: Option<CatalogEntry>,
    pub company_code: Option<CompanyCode>,
}

impl BuildingLand {
    /// Economic unit id-num of the building land, if embedded.
    pub fn economic_unit_id_num(&self) -> Option<&str> {
        self.economic_unit.as_ref().and_then(|eu| eu.id_num.as_deref())
    }
}

/// Building land reference embedded in use units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingLandShort {
    pub id: i64,
    pub id_num: Option<String>,
}

/// Floor a use unit is located on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub level_to_ground: Option<i32>,
}

/// Allocation key value of a use unit (e.g. heating area).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingUnit {
    pub id: Option<i64>,
    pub value: Option<f64>,
    pub valid_from: Option<String>,
    pub valid_to: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub is_base_component_cold_water: bool,
    #[serde(default, deserialize_with = "null_to_default")]
    pub is_base_component_heating: bool,
    #[serde(default, deserialize_with = "null_to_default")]
    pub is_base_component_warm_water: bool,
    pub quantity_type: Option<CompanyCode>,
}

/// Usage type period of a use unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseUnitType {
    pub id: Option<i64>,
    pub valid_from: Option<String>,
    pub valid_to: Option<String>,
    pub use_unit_usage_type: Option<CatalogEntry>,
}

/// Use unit reference embedded in contractors and license agreements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UseUnitShort {
    pub id: i64,
    pub use_unit_number: Option<String>,
    pub building_land_id: Option<i64>,
    pub economic_unit_id: Option<i64>,
    pub economic_unit: Option<String>,
}

/// Rentable unit (flat, shop, parking space, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseUnit {
    pub id: i64,
    pub id_num: Option<String>,
    pub building_land: Option<BuildingLandShort>,
    pub economic_unit: Option<EconomicUnitShort>,
    pub estate_address: Option<EstateAddress>,
    pub financing_type: Option<CatalogEntry>,
    pub current_use_unit_type: Option<UseUnitType>,
    pub usable_space: Option<f64>,
    pub living_space: Option<f64>,
    pub heating_space: Option<f64>,
    pub number_of_rooms: Option<f64>,
    pub number_of_half_rooms: Option<f64>,
    pub description_of_position: Option<String>,
    pub target_rent: Option<f64>,
    pub management_start: Option<String>,
    pub management_end: Option<String>,
    pub binding_end_date: Option<String>,
    pub move_in_date: Option<String>,
    pub entry_date: Option<String>,
    pub exit_date: Option<String>,
    pub energy_certificate_id: Option<i64>,
    pub position: Option<CatalogEntry>,
    pub floor: Option<Floor>,
    pub residential_authorization: Option<CatalogEntry>,
    pub entry_reason: Option<CatalogEntry>,
    pub exit_reason: Option<CatalogEntry>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub billing_units: Vec<BillingUnit>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub use_unit_types: Vec<UseUnitType>,
    pub company_code: Option<CompanyCode>,
}

impl UseUnit {
    /// Building land id-num of the use unit, if embedded.
    pub fn building_land_id_num(&self) -> Option<&str> {
        self.building_land.as_ref().and_then(|bl| bl.id_num.as_deref())
    }

    /// Economic unit id-num of the use unit, if embedded.
    pub fn economic_unit_id_num(&self) -> Option<&str> {
        self.economic_unit.as_ref().and_then(|eu| eu.id_num.as_deref())
    }
}

impl FromRecord for Management {
    fn from_record(record: &Value) -> Result<Self> {
        let mut management: Self = deserialize_normalized(record)?;
        if let Some(person) = management.person.as_mut() {
            person.derive_natural_person();
        }
        Ok(management)
    }
}

impl FromRecord for Owner {
    fn from_record(record: &Value) -> Result<Self> {
        let mut owner: Self = deserialize_normalized(record)?;
        if let Some(person) = owner.person.as_mut() {
            person.derive_natural_person();
        }
        Ok(owner)
    }
}

impl_from_record!(
    OwnerShort,
    EconomicUnitShort,
    EconomicUnit,
    Building,
    Land,
    BuildingLand,
    BuildingLandShort,
    Floor,
    BillingUnit,
    UseUnitType,
    UseUnitShort,
    UseUnit,
);
