//! Cache slot identifiers
//!
//! The client keeps one in-memory slot per cacheable entity family. Slots are
//! addressed by this enum; the textual names only matter at the edges
//! (command line, file names).

use serde::{Deserialize, Serialize};

use crate::impl_name_conversions;

/// Identifies one in-memory cache slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheSlot {
    LicenseAgreements,
    Contractors,
    Persons,
    EconomicUnits,
    BuildingLands,
    UseUnits,
}

impl_name_conversions!(CacheSlot {
    LicenseAgreements => "license_agreements",
    Contractors => "contractors",
    Persons => "persons",
    EconomicUnits => "economic_units",
    BuildingLands => "building_lands",
    UseUnits => "use_units",
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WowiError;

    #[test]
    fn names_round_trip_through_from_str() {
        for slot in CacheSlot::ALL {
            assert_eq!(slot.as_str().parse::<CacheSlot>().unwrap(), *slot);
        }
    }

    #[test]
    fn unknown_slot_name_is_a_configuration_error() {
        let err = "tickets".parse::<CacheSlot>().unwrap_err();
        assert!(matches!(err, WowiError::Config(_)));
    }

    #[test]
    fn serde_name_matches_display_name() {
        let json = serde_json::to_string(&CacheSlot::EconomicUnits).unwrap();
        assert_eq!(json, "\"economic_units\"");
    }
}
