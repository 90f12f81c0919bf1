//! Building blocks shared by several entity families

use serde::{Deserialize, Serialize};

use crate::impl_from_record;
use crate::mapping::null_to_default;

/// Catalog reference as embedded in most records (`{Id, Name}` or
/// `{Id, Code}`): gender, address type, communication type, status, ...
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub code: Option<String>,
}

impl CatalogEntry {
    /// Whether the entry's name equals `name`.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

/// Accounting company code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyCode {
    pub id: i64,
    pub name: Option<String>,
    pub code: Option<String>,
    pub arge_code: Option<String>,
}

/// Postal address of a person.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: Option<i64>,
    pub zip: Option<String>,
    pub town: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub house_number_addition: Option<String>,
    pub street_complete: Option<String>,
    pub house_number_complete: Option<String>,
    pub valid_from: Option<String>,
    pub valid_to: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub main_address: bool,
    pub address_type: Option<CatalogEntry>,
    pub country: Option<CatalogEntry>,
}

/// Address of a building land or use unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstateAddress {
    pub zip: Option<String>,
    pub town: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub house_number_addition: Option<String>,
    pub country_id: Option<i64>,
    pub country_code: Option<String>,
    pub street_complete: Option<String>,
    pub house_number_complete: Option<String>,
}

/// Phone number, e-mail address or similar contact entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Communication {
    pub id: Option<i64>,
    pub related_address_id: Option<i64>,
    pub content: Option<String>,
    pub explanation: Option<String>,
    pub related_address: Option<String>,
    pub communication_type: Option<CatalogEntry>,
}

impl Communication {
    /// Whether the communication type carries the given name.
    pub fn has_type(&self, type_name: &str) -> bool {
        self.communication_type.as_ref().is_some_and(|t| t.is_named(type_name))
    }
}

/// Bank account attached to a person.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: Option<i64>,
    pub bank_account_id: Option<i64>,
    pub iban: Option<String>,
    pub bic: Option<String>,
    pub account_holder: Option<String>,
    pub valid_from: Option<String>,
    pub valid_to: Option<String>,
    pub bank_account_type: Option<CatalogEntry>,
    pub bank_account_usage_type: Option<CatalogEntry>,
}

impl_from_record!(CatalogEntry, CompanyCode, Address, EstateAddress, Communication, BankAccount);
