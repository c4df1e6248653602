// src/domain/dedupe.rs

use crate::domain::fingerprint::{fingerprint, Fingerprint};
use crate::domain::listing::Listing;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// A listing annotated with its fingerprint and duplicate flag.
#[derive(Debug, Clone, Serialize)]
pub struct DedupEntry<'a> {
    pub listing: &'a Listing,
    pub fingerprint: Fingerprint,
    pub is_duplicate: bool,
}

/// Listings sharing one fingerprint, in dataset order.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup<'a> {
    pub fingerprint: Fingerprint,
    pub members: Vec<&'a Listing>,
}

/// Flags every listing whose fingerprint was already seen earlier in the
/// dataset. The first occurrence of each fingerprint is never flagged, and
/// nothing is removed or reordered.
pub fn mark_duplicates(listings: &[Listing]) -> Vec<DedupEntry<'_>> {
    let mut seen: HashSet<Fingerprint> = HashSet::with_capacity(listings.len());

    listings
        .iter()
        .map(|listing| {
            let fingerprint = fingerprint(listing);
            let is_duplicate = !seen.insert(fingerprint.clone());
            DedupEntry {
                listing,
                fingerprint,
                is_duplicate,
            }
        })
        .collect()
}

/// Groups with two or more members, ordered by fingerprint.
pub fn duplicate_groups<'a>(entries: &[DedupEntry<'a>]) -> Vec<DuplicateGroup<'a>> {
    let mut groups: BTreeMap<&Fingerprint, Vec<&'a Listing>> = BTreeMap::new();
    for entry in entries {
        groups.entry(&entry.fingerprint).or_default().push(entry.listing);
    }

    groups
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(fingerprint, members)| DuplicateGroup {
            fingerprint: fingerprint.clone(),
            members,
        })
        .collect()
}

/// Number of distinct properties (first occurrences).
pub fn unique_count(entries: &[DedupEntry<'_>]) -> usize {
    entries.iter().filter(|e| !e.is_duplicate).count()
}

/// What `dedupe --json` prints: counts, the groups, and every flagged entry.
#[derive(Debug, Serialize)]
pub struct DedupReport<'a> {
    pub total: usize,
    pub unique: usize,
    pub groups: Vec<DuplicateGroup<'a>>,
    pub entries: Vec<DedupEntry<'a>>,
}

impl<'a> DedupReport<'a> {
    pub fn build(listings: &'a [Listing]) -> Self {
        let entries = mark_duplicates(listings);
        Self {
            total: listings.len(),
            unique: unique_count(&entries),
            groups: duplicate_groups(&entries),
            entries,
        }
    }
}
