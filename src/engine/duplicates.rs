use crate::model::{DuplicateTable, Listing};
use std::collections::BTreeMap;
use tracing::debug;

/// Appends every exact-title sibling of a matched listing right after it in
/// the same group. Returns how many siblings were attached.
pub fn merge_duplicates(groups: &mut BTreeMap<String, Vec<Listing>>, duplicates: &DuplicateTable) -> usize {
    if duplicates.is_empty() {
        return 0;
    }

    let mut merged = 0;
    for (product_id, listings) in groups.iter_mut() {
        let mut expanded = Vec::with_capacity(listings.len());
        for listing in listings.drain(..) {
            let siblings = duplicates.get(&listing.title);
            expanded.push(listing);
            if let Some(siblings) = siblings {
                merged += siblings.len();
                expanded.extend(siblings.iter().cloned());
            }
        }
        debug!(product = %product_id, listings = expanded.len(), "Duplicates merged");
        *listings = expanded;
    }
    merged
}
