// src/lookup/universe.rs

use crate::db::store::PropertyStore;
use crate::domain::property::PropertyRecord;
use crate::errors::ServerError;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

/// Properties sharing a tract with `index`, one per location, index excluded.
///
/// The index parcel is excluded first; each remaining location is then
/// represented by its smallest parcel number. An empty tract set returns an
/// empty universe without querying.
pub fn build_universe<S: PropertyStore + ?Sized>(
    store: &S,
    index: &PropertyRecord,
    tracts: &BTreeSet<String>,
) -> Result<Vec<PropertyRecord>, ServerError> {
    if tracts.is_empty() {
        return Ok(Vec::new());
    }

    let rows = store.properties_in_tracts(tracts, &index.parcel_number)?;

    let mut by_location: BTreeMap<String, PropertyRecord> = BTreeMap::new();
    for rec in rows {
        if rec.parcel_number == index.parcel_number {
            continue;
        }
        match by_location.entry(rec.location.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(rec);
            }
            Entry::Occupied(mut slot) => {
                if rec.parcel_number < slot.get().parcel_number {
                    slot.insert(rec);
                }
            }
        }
    }

    Ok(by_location.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::utils::{property, MemoryStore};
    use std::collections::HashSet;

    fn tracts(ts: &[&str]) -> BTreeSet<String> {
        ts.iter().map(|t| t.to_string()).collect()
    }

    fn store() -> MemoryStore {
        MemoryStore::new(vec![
            property("100", "123 MARKET ST", Some("001")),
            property("101", "123 MARKET ST", Some("001")),
            property("250", "5 ELM ST", Some("001")),
            property("210", "5 ELM ST", Some("001")),
            property("300", "7 OAK ST", Some("002")),
            property("400", "9 PINE ST", Some("003")),
            property("500", "11 ASH ST", None),
        ])
    }

    #[test]
    fn excludes_index_and_keeps_one_record_per_location() {
        let store = store();
        let index = property("100", "123 MARKET ST", Some("001"));

        let universe = build_universe(&store, &index, &tracts(&["001", "002"])).unwrap();
        let parcels: Vec<&str> = universe.iter().map(|p| p.parcel_number.as_str()).collect();

        // 101 shares the index address but is its own parcel.
        assert_eq!(parcels, vec!["101", "210", "300"]);
        assert!(universe.iter().all(|p| p.parcel_number != index.parcel_number));

        let locations: HashSet<&str> = universe.iter().map(|p| p.location.as_str()).collect();
        assert_eq!(locations.len(), universe.len());
    }

    #[test]
    fn only_requested_tracts_are_included() {
        let index = property("100", "123 MARKET ST", Some("001"));
        let universe = build_universe(&store(), &index, &tracts(&["003"])).unwrap();
        assert_eq!(universe.len(), 1);
        assert_eq!(universe[0].parcel_number, "400");
    }

    #[test]
    fn empty_tract_set_is_empty_universe_without_query() {
        let store = store();
        let index = property("100", "123 MARKET ST", Some("001"));

        let universe = build_universe(&store, &index, &BTreeSet::new()).unwrap();
        assert!(universe.is_empty());
        assert_eq!(store.tract_queries(), 0);
    }

    #[test]
    fn tract_with_only_the_index_is_empty() {
        let store = MemoryStore::new(vec![property("1", "1 LONE RD", Some("009"))]);
        let index = property("1", "1 LONE RD", Some("009"));
        assert!(build_universe(&store, &index, &tracts(&["009"])).unwrap().is_empty());
    }
}
