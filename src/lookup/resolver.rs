// src/lookup/resolver.rs

use crate::db::store::PropertyStore;
use crate::domain::property::PropertyRecord;
use crate::errors::ServerError;

/// Distinct locations containing `fragment`, case-insensitively, ascending.
/// A blank fragment matches nothing and never reaches the store.
pub fn resolve_candidate_names<S: PropertyStore + ?Sized>(
    store: &S,
    fragment: &str,
) -> Result<Vec<String>, ServerError> {
    let needle = fragment.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(Vec::new());
    }

    let mut names = store.location_names_containing(&needle)?;
    names.sort();
    names.dedup();
    Ok(names)
}

/// The canonical record at exactly `location`: the smallest parcel number
/// when several parcels share the address.
pub fn resolve_index_property<S: PropertyStore + ?Sized>(
    store: &S,
    location: &str,
) -> Result<Option<PropertyRecord>, ServerError> {
    let parcels = store.properties_at_location(location)?;
    Ok(parcels
        .into_iter()
        .min_by(|a, b| a.parcel_number.cmp(&b.parcel_number)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::utils::{property, MemoryStore};

    fn store() -> MemoryStore {
        MemoryStore::new(vec![
            property("300", "123 MARKET ST", Some("001")),
            property("100", "123 MARKET ST", Some("001")),
            property("200", "123 MARKET ST", Some("002")),
            property("400", "12 Market Street", Some("001")),
            property("500", "9 CHESTNUT ST", Some("001")),
        ])
    }

    #[test]
    fn candidate_names_match_substring_case_insensitively() {
        let names = resolve_candidate_names(&store(), "  mArKeT ").unwrap();
        assert_eq!(names, vec!["12 Market Street", "123 MARKET ST"]);
        for n in &names {
            assert!(n.to_lowercase().contains("market"));
        }
    }

    #[test]
    fn blank_fragment_skips_the_store() {
        let store = store();
        assert!(resolve_candidate_names(&store, "   ").unwrap().is_empty());
        assert_eq!(store.calls(), 0);
    }

    #[test]
    fn unknown_fragment_yields_nothing() {
        assert!(resolve_candidate_names(&store(), "nonexistent").unwrap().is_empty());
    }

    #[test]
    fn index_property_is_smallest_parcel_at_location() {
        let idx = resolve_index_property(&store(), "123 MARKET ST").unwrap().unwrap();
        assert_eq!(idx.parcel_number, "100");
    }

    #[test]
    fn index_lookup_is_exact_not_substring() {
        // "123 market st" is a suggestion for "market" but not an exact location.
        assert!(resolve_index_property(&store(), "123 market st").unwrap().is_none());
        assert!(resolve_index_property(&store(), "MARKET").unwrap().is_none());
    }
}
