//! In-memory cache store
//!
//! One slot per cacheable entity family, addressed at compile time through
//! the [`Cacheable`] trait (or at runtime through [`CacheSlot`]). Slots are
//! only ever replaced wholesale; every public read hands out deep copies so
//! that callers cannot mutate cached state.

use std::fs;
use std::path::Path;

use openwowi_domain::{
    BuildingLand, CacheSlot, Contractor, EconomicUnit, LicenseAgreement, Person, Result, UseUnit,
    WowiError,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::conversions::to_wowi;

/// A domain type that owns a cache slot.
pub trait Cacheable: Clone + Serialize + DeserializeOwned {
    /// Slot holding values of this type.
    const SLOT: CacheSlot;

    /// Borrow the slot's entries.
    fn entries(store: &CacheStore) -> &Vec<Self>;

    /// Mutably borrow the slot's entries.
    fn entries_mut(store: &mut CacheStore) -> &mut Vec<Self>;
}

macro_rules! impl_cacheable {
    ($($ty:ty => $slot:ident, $field:ident;)+) => {
        $(
            impl Cacheable for $ty {
                const SLOT: CacheSlot = CacheSlot::$slot;

                fn entries(store: &CacheStore) -> &Vec<Self> {
                    &store.$field
                }

                fn entries_mut(store: &mut CacheStore) -> &mut Vec<Self> {
                    &mut store.$field
                }
            }
        )+
    };
}

impl_cacheable! {
    LicenseAgreement => LicenseAgreements, license_agreements;
    Contractor => Contractors, contractors;
    Person => Persons, persons;
    EconomicUnit => EconomicUnits, economic_units;
    BuildingLand => BuildingLands, building_lands;
    UseUnit => UseUnits, use_units;
}

/// Named collections of previously fetched domain objects. All slots start
/// empty.
#[derive(Debug, Clone, Default)]
pub struct CacheStore {
    license_agreements: Vec<LicenseAgreement>,
    contractors: Vec<Contractor>,
    persons: Vec<Person>,
    economic_units: Vec<EconomicUnit>,
    building_lands: Vec<BuildingLand>,
    use_units: Vec<UseUnit>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot of `T` with `entries`.
    pub fn write<T: Cacheable>(&mut self, entries: Vec<T>) {
        info!(slot = %T::SLOT, count = entries.len(), "cache slot replaced");
        *T::entries_mut(self) = entries;
    }

    /// Borrow the slot of `T` for internal filtering.
    pub(crate) fn read<T: Cacheable>(&self) -> &[T] {
        T::entries(self)
    }

    /// Deep copy of every entry in the slot of `T`.
    pub fn snapshot<T: Cacheable>(&self) -> Vec<T> {
        self.read::<T>().to_vec()
    }

    /// Deep copies of the entries of `T` matching `predicate`, in slot order.
    pub fn filtered<T, F>(&self, predicate: F) -> Vec<T>
    where
        T: Cacheable,
        F: Fn(&T) -> bool,
    {
        self.read::<T>().iter().filter(|e| predicate(e)).cloned().collect()
    }

    /// Number of entries in `slot`.
    pub fn len(&self, slot: CacheSlot) -> usize {
        match slot {
            CacheSlot::LicenseAgreements => self.license_agreements.len(),
            CacheSlot::Contractors => self.contractors.len(),
            CacheSlot::Persons => self.persons.len(),
            CacheSlot::EconomicUnits => self.economic_units.len(),
            CacheSlot::BuildingLands => self.building_lands.len(),
            CacheSlot::UseUnits => self.use_units.len(),
        }
    }

    pub fn is_empty(&self, slot: CacheSlot) -> bool {
        self.len(slot) == 0
    }

    /// Empty `slot`.
    pub fn clear(&mut self, slot: CacheSlot) {
        match slot {
            CacheSlot::LicenseAgreements => self.write::<LicenseAgreement>(Vec::new()),
            CacheSlot::Contractors => self.write::<Contractor>(Vec::new()),
            CacheSlot::Persons => self.write::<Person>(Vec::new()),
            CacheSlot::EconomicUnits => self.write::<EconomicUnit>(Vec::new()),
            CacheSlot::BuildingLands => self.write::<BuildingLand>(Vec::new()),
            CacheSlot::UseUnits => self.write::<UseUnit>(Vec::new()),
        }
    }

    /// Write the slot of `T` to `path` as a JSON array.
    ///
    /// # Errors
    ///
    /// `WowiError::Storage` if the file cannot be written.
    pub fn persist<T: Cacheable>(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec(self.read::<T>())
            .map_err(|e| WowiError::Storage(format!("cannot serialize {} slot: {e}", T::SLOT)))?;
        fs::write(path, bytes).map_err(to_wowi)?;
        info!(slot = %T::SLOT, path = %path.display(), count = self.len(T::SLOT), "cache slot persisted");
        Ok(())
    }

    /// Replace the slot of `T` with the contents of `path`. Returns the number
    /// of restored entries.
    ///
    /// # Errors
    ///
    /// `WowiError::Storage` if the file cannot be read, `WowiError::Decode`
    /// if it does not hold entries of `T`. The slot is untouched on error.
    pub fn restore<T: Cacheable>(&mut self, path: &Path) -> Result<usize> {
        let bytes = fs::read(path).map_err(to_wowi)?;
        let entries: Vec<T> = serde_json::from_slice(&bytes).map_err(|e| {
            WowiError::Decode(format!("{} is not a {} snapshot: {e}", path.display(), T::SLOT))
        })?;
        let count = entries.len();
        debug!(slot = %T::SLOT, path = %path.display(), count, "restoring cache slot");
        self.write(entries);
        Ok(count)
    }

    /// [`persist`](Self::persist) addressed by slot identifier.
    pub fn persist_slot(&self, slot: CacheSlot, path: &Path) -> Result<()> {
        match slot {
            CacheSlot::LicenseAgreements => self.persist::<LicenseAgreement>(path),
            CacheSlot::Contractors => self.persist::<Contractor>(path),
            CacheSlot::Persons => self.persist::<Person>(path),
            CacheSlot::EconomicUnits => self.persist::<EconomicUnit>(path),
            CacheSlot::BuildingLands => self.persist::<BuildingLand>(path),
            CacheSlot::UseUnits => self.persist::<UseUnit>(path),
        }
    }

    /// [`restore`](Self::restore) addressed by slot identifier.
    pub fn restore_slot(&mut self, slot: CacheSlot, path: &Path) -> Result<usize> {
        match slot {
            CacheSlot::LicenseAgreements => self.restore::<LicenseAgreement>(path),
            CacheSlot::Contractors => self.restore::<Contractor>(path),
            CacheSlot::Persons => self.restore::<Person>(path),
            CacheSlot::EconomicUnits => self.restore::<EconomicUnit>(path),
            CacheSlot::BuildingLands => self.restore::<BuildingLand>(path),
            CacheSlot::UseUnits => self.restore::<UseUnit>(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use openwowi_domain::NaturalPerson;
    use tempfile::tempdir;

    use super::*;

    fn person(id: i64, last_name: &str) -> Person {
        Person {
            id,
            natural_person: Some(NaturalPerson {
                last_name: Some(last_name.to_string()),
                ..NaturalPerson::default()
            }),
            ..Person::default()
        }
    }

    #[test]
    fn reads_are_deep_copies() {
        let mut store = CacheStore::new();
        store.write(vec![person(1, "Muster")]);

        let mut copy = store.snapshot::<Person>();
        copy[0].natural_person.as_mut().unwrap().last_name = Some("Changed".into());
        copy.push(person(2, "Extra"));

        assert_eq!(store.snapshot::<Person>(), store.snapshot::<Person>());
        assert_eq!(store.snapshot::<Person>(), vec![person(1, "Muster")]);
    }

    #[test]
    fn write_replaces_instead_of_appending() {
        let mut store = CacheStore::new();
        store.write(vec![person(1, "A"), person(2, "B")]);
        store.write(vec![person(3, "C")]);

        assert_eq!(store.len(CacheSlot::Persons), 1);
        assert!(store.is_empty(CacheSlot::Contractors));
    }

    #[test]
    fn filtered_keeps_slot_order() {
        let mut store = CacheStore::new();
        store.write(vec![person(1, "A"), person(2, "B"), person(3, "C")]);

        let ids: Vec<i64> = store.filtered::<Person, _>(|p| p.id != 2).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn persist_and_restore_replace_the_slot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("persons.json");

        let mut source = CacheStore::new();
        source.write(vec![person(1, "A"), person(2, "B")]);
        source.persist_slot(CacheSlot::Persons, &path).unwrap();

        let mut target = CacheStore::new();
        target.write(vec![person(9, "Old")]);
        let restored = target.restore_slot(CacheSlot::Persons, &path).unwrap();

        assert_eq!(restored, 2);
        assert_eq!(target.snapshot::<Person>(), source.snapshot::<Person>());
    }

    #[test]
    fn restore_from_missing_file_is_a_storage_error() {
        let dir = tempdir().unwrap();
        let mut store = CacheStore::new();

        let err = store.restore::<Person>(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, WowiError::Storage(_)));
    }

    #[test]
    fn restore_of_foreign_content_leaves_slot_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, b"{\"not\": \"a list\"}").unwrap();

        let mut store = CacheStore::new();
        store.write(vec![person(1, "Kept")]);
        let err = store.restore::<Person>(&path).unwrap_err();

        assert!(matches!(err, WowiError::Decode(_)));
        assert_eq!(store.len(CacheSlot::Persons), 1);
    }

    #[test]
    fn clear_empties_only_the_named_slot() {
        let mut store = CacheStore::new();
        store.write(vec![person(1, "A")]);
        store.clear(CacheSlot::EconomicUnits);
        assert_eq!(store.len(CacheSlot::Persons), 1);

        store.clear(CacheSlot::Persons);
        assert!(store.is_empty(CacheSlot::Persons));
    }
}
