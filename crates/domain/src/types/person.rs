//! Persons and contractors

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{Address, BankAccount, CatalogEntry, Communication};
use super::inventory::UseUnitShort;
use crate::constants::GENDER_NOT_SPECIFIED_ID;
use crate::mapping::{deserialize_normalized, null_to_default, FromRecord};
use crate::Result;

/// Legal-person part of a person record (companies, associations).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegalPerson {
    pub long_name1: Option<String>,
    pub long_name2: Option<String>,
    pub vat_id: Option<String>,
    pub commercial_register_number: Option<String>,
    pub commercial_register_town: Option<String>,
}

/// Natural-person part of a person record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NaturalPerson {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<CatalogEntry>,
}

/// A person as returned by `PersonsRead/Persons`, and embedded in
/// contractors, owners and managements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub id_num: Option<String>,
    pub short_name: Option<String>,
    pub name: Option<String>,
    pub tax_number: Option<String>,
    pub tax_identification_number: Option<String>,
    pub valid_from: Option<String>,
    pub valid_to: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub is_natural_person: bool,
    pub natural_person: Option<NaturalPerson>,
    pub legal_person: Option<LegalPerson>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub addresses: Vec<Address>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub communications: Vec<Communication>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub bank_accounts: Vec<BankAccount>,
    pub first_email_communication: Option<Communication>,
    pub first_landline_phone_communication: Option<Communication>,
    pub first_mobile_phone_communication: Option<Communication>,
}

impl Person {
    /// The server does not send `IsNaturalPerson`; it is derived from the
    /// gender of the natural-person part instead.
    pub(crate) fn derive_natural_person(&mut self) {
        self.is_natural_person = self
            .natural_person
            .as_ref()
            .and_then(|np| np.gender.as_ref())
            .and_then(|g| g.id)
            .is_some_and(|id| id != GENDER_NOT_SPECIFIED_ID);
    }

    /// Display name: "first last" for natural persons, the first long name
    /// for legal persons, falling back to `name`.
    pub fn display_name(&self) -> Option<String> {
        if self.is_natural_person {
            if let Some(np) = &self.natural_person {
                let full = [np.first_name.as_deref(), np.last_name.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");
                if !full.is_empty() {
                    return Some(full);
                }
            }
        }
        self.legal_person
            .as_ref()
            .and_then(|lp| lp.long_name1.clone())
            .or_else(|| self.name.clone())
    }
}

impl FromRecord for Person {
    fn from_record(record: &Value) -> Result<Self> {
        let mut person: Self = deserialize_normalized(record)?;
        person.derive_natural_person();
        Ok(person)
    }
}

/// Contract party of a license agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contractor {
    pub id: i64,
    pub license_agreement_id: Option<i64>,
    pub license_agreement: Option<String>,
    pub start_contract: Option<String>,
    pub end_of_contract: Option<String>,
    pub contractual_use_valid_from: Option<String>,
    pub contractual_use_valid_to: Option<String>,
    pub contractor_type: Option<CatalogEntry>,
    pub use_unit: Option<UseUnitShort>,
    pub person: Person,
    pub default_address: Option<Address>,
}

impl FromRecord for Contractor {
    fn from_record(record: &Value) -> Result<Self> {
        let mut contractor: Self = deserialize_normalized(record)?;
        contractor.person.derive_natural_person();
        Ok(contractor)
    }
}

crate::impl_from_record!(LegalPerson, NaturalPerson);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::map_record;

    fn person_record(gender_id: Option<i64>) -> Value {
        json!({
            "Id": 501,
            "IdNum": "P-501",
            "ShortName": "MUSTER",
            "Name": "Muster, Max",
            "NaturalPerson": {
                "FirstName": "Max",
                "LastName": "Muster",
                "Gender": gender_id.map(|id| json!({"Id": id, "Name": "x"}))
            },
            "LegalPerson": null,
            "Addresses": null,
            "Communications": [
                {"Id": 1, "Content": "max@example.org", "CommunicationType": {"Id": 4, "Name": "E-Mail"}}
            ]
        })
    }

    #[test]
    fn gender_decides_natural_person() {
        let natural: Person = map_record(&person_record(Some(1))).unwrap();
        assert!(natural.is_natural_person);

        let unspecified: Person = map_record(&person_record(Some(3))).unwrap();
        assert!(!unspecified.is_natural_person);

        let missing: Person = map_record(&person_record(None)).unwrap();
        assert!(!missing.is_natural_person);
    }

    #[test]
    fn null_lists_become_empty() {
        let person: Person = map_record(&person_record(Some(1))).unwrap();
        assert!(person.addresses.is_empty());
        assert_eq!(person.communications.len(), 1);
        assert_eq!(person.short_name.as_deref(), Some("MUSTER"));
    }

    #[test]
    fn display_name_prefers_natural_name() {
        let person: Person = map_record(&person_record(Some(2))).unwrap();
        assert_eq!(person.display_name().as_deref(), Some("Max Muster"));

        let company = Person {
            id: 9,
            legal_person: Some(LegalPerson {
                long_name1: Some("Wohnbau GmbH".into()),
                ..LegalPerson::default()
            }),
            ..Person::default()
        };
        assert_eq!(company.display_name().as_deref(), Some("Wohnbau GmbH"));
    }

    #[test]
    fn contractor_embeds_person_with_derived_flag() {
        let raw = json!({
            "Id": 77,
            "LicenseAgreementId": 300,
            "LicenseAgreement": "001.01.0001.01",
            "ContractorType": {"Id": 1, "Name": "Hauptmieter"},
            "UseUnit": {"Id": 5, "UseUnitNumber": "001.01.0001"},
            "Person": person_record(Some(1)),
            "DefaultAddress": {"Id": 1, "StreetComplete": "Ringstraße 3"}
        });

        let contractor: Contractor = map_record(&raw).unwrap();

        assert_eq!(contractor.license_agreement_id, Some(300));
        assert!(contractor.person.is_natural_person);
        assert_eq!(contractor.use_unit.and_then(|u| u.use_unit_number).as_deref(), Some("001.01.0001"));
    }
}
