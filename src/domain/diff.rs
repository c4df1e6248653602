// src/domain/diff.rs

use crate::domain::fingerprint::{fingerprint, Fingerprint};
use crate::domain::listing::{Listing, Source};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("listing '{id}' has no source tag")]
    MissingSource { id: String },

    #[error("listing '{id}' comes from '{tag}', expected '{left}' or '{right}'")]
    UnexpectedSource {
        id: String,
        tag: String,
        left: String,
        right: String,
    },

    #[error("a source pair needs two distinct, non-empty tags (got '{left}' and '{right}')")]
    InvalidPair { left: String, right: String },
}

/// The two sources being reconciled: `left` is side A, `right` is side B.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourcePair {
    pub left: Source,
    pub right: Source,
}

impl SourcePair {
    pub fn new(left: impl Into<Source>, right: impl Into<Source>) -> Result<Self, ReconcileError> {
        let (left, right) = (left.into(), right.into());
        if left.is_empty() || right.is_empty() || left == right {
            return Err(ReconcileError::InvalidPair {
                left: left.to_string(),
                right: right.to_string(),
            });
        }
        Ok(Self { left, right })
    }
}

impl Default for SourcePair {
    fn default() -> Self {
        Self {
            left: Source::new("seloger"),
            right: Source::new("leboncoin"),
        }
    }
}

/// Fields compared between two listings that share a fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparedField {
    Title,
    City,
    PostalCode,
    ListingType,
    PropertyType,
    Rooms,
    Surface,
    Price,
    AgencyOrPrivate,
}

impl ComparedField {
    pub const ALL: [ComparedField; 9] = [
        ComparedField::Title,
        ComparedField::City,
        ComparedField::PostalCode,
        ComparedField::ListingType,
        ComparedField::PropertyType,
        ComparedField::Rooms,
        ComparedField::Surface,
        ComparedField::Price,
        ComparedField::AgencyOrPrivate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ComparedField::Title => "title",
            ComparedField::City => "city",
            ComparedField::PostalCode => "postal_code",
            ComparedField::ListingType => "listing_type",
            ComparedField::PropertyType => "property_type",
            ComparedField::Rooms => "rooms",
            ComparedField::Surface => "surface",
            ComparedField::Price => "price",
            ComparedField::AgencyOrPrivate => "agency_or_private",
        }
    }

    /// The field's value rendered as text, `None` when absent.
    pub fn value_of(&self, listing: &Listing) -> Option<String> {
        match self {
            ComparedField::Title => listing.title.clone(),
            ComparedField::City => listing.city.clone(),
            ComparedField::PostalCode => listing.postal_code.clone(),
            ComparedField::ListingType => listing.listing_type.map(|t| t.to_string()),
            ComparedField::PropertyType => listing.property_type.clone(),
            ComparedField::Rooms => listing.rooms.map(|r| r.to_string()),
            ComparedField::Surface => listing.surface.map(|s| s.to_string()),
            ComparedField::Price => listing.price.map(|p| p.to_string()),
            ComparedField::AgencyOrPrivate => listing.agency_or_private.map(|a| a.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDiff {
    pub field: ComparedField,
    pub left: Option<String>,
    pub right: Option<String>,
}

/// One joined pair (A record, B record) with at least one differing field.
#[derive(Debug, Clone, Serialize)]
pub struct Mismatch<'a> {
    pub fingerprint: Fingerprint,
    pub left: &'a Listing,
    pub right: &'a Listing,
    pub differing: Vec<FieldDiff>,
}

impl Mismatch<'_> {
    pub fn differing_names(&self) -> Vec<&'static str> {
        self.differing.iter().map(|d| d.field.name()).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiffResult<'a> {
    pub pair: SourcePair,
    pub only_in_a: Vec<&'a Listing>,
    pub only_in_b: Vec<&'a Listing>,
    pub mismatches: Vec<Mismatch<'a>>,
    /// Joined pairs whose compared fields all agree.
    pub identical_pairs: usize,
}

/// Field-level differences between two listings. Two absent values are
/// never reported.
pub fn diff_fields(left: &Listing, right: &Listing) -> Vec<FieldDiff> {
    ComparedField::ALL
        .iter()
        .filter_map(|field| {
            let (l, r) = (field.value_of(left), field.value_of(right));
            if l.is_none() && r.is_none() {
                return None;
            }
            (l != r).then_some(FieldDiff {
                field: *field,
                left: l,
                right: r,
            })
        })
        .collect()
}

/// Splits the dataset by source and reports:
/// - A listings whose fingerprint never occurs in B (and vice versa),
/// - for every fingerprint present on both sides, each A x B pair whose
///   compared fields disagree.
///
/// Shared fingerprints are visited in lexicographic order; within one
/// fingerprint, pairs follow dataset order (A outer, B inner). Listings from a
/// source outside `pair` are rejected rather than skipped.
pub fn compute_differences<'a>(
    listings: &'a [Listing],
    pair: &SourcePair,
) -> Result<DiffResult<'a>, ReconcileError> {
    let mut side_a: Vec<(Fingerprint, &'a Listing)> = Vec::new();
    let mut side_b: Vec<(Fingerprint, &'a Listing)> = Vec::new();

    for listing in listings {
        if listing.source.is_empty() {
            return Err(ReconcileError::MissingSource {
                id: listing.id.clone(),
            });
        }

        if listing.source == pair.left {
            side_a.push((fingerprint(listing), listing));
        } else if listing.source == pair.right {
            side_b.push((fingerprint(listing), listing));
        } else {
            return Err(ReconcileError::UnexpectedSource {
                id: listing.id.clone(),
                tag: listing.source.to_string(),
                left: pair.left.to_string(),
                right: pair.right.to_string(),
            });
        }
    }

    let keys_a: HashSet<&Fingerprint> = side_a.iter().map(|(fp, _)| fp).collect();
    let keys_b: HashSet<&Fingerprint> = side_b.iter().map(|(fp, _)| fp).collect();

    let only_in_a = side_a
        .iter()
        .filter(|(fp, _)| !keys_b.contains(fp))
        .map(|(_, l)| *l)
        .collect();
    let only_in_b = side_b
        .iter()
        .filter(|(fp, _)| !keys_a.contains(fp))
        .map(|(_, l)| *l)
        .collect();

    let groups_a = group_by_fingerprint(&side_a);
    let groups_b = group_by_fingerprint(&side_b);

    let mut mismatches = Vec::new();
    let mut identical_pairs = 0;

    // BTreeMap iteration gives the sorted shared-key order.
    for (fp, lefts) in &groups_a {
        let Some(rights) = groups_b.get(fp) else {
            continue;
        };
        for &left in lefts {
            for &right in rights {
                let differing = diff_fields(left, right);
                if differing.is_empty() {
                    identical_pairs += 1;
                } else {
                    mismatches.push(Mismatch {
                        fingerprint: (*fp).clone(),
                        left,
                        right,
                        differing,
                    });
                }
            }
        }
    }

    debug!(
        a = side_a.len(),
        b = side_b.len(),
        mismatches = mismatches.len(),
        identical_pairs,
        "reconciled {} against {}",
        pair.left,
        pair.right
    );

    Ok(DiffResult {
        pair: pair.clone(),
        only_in_a,
        only_in_b,
        mismatches,
        identical_pairs,
    })
}

fn group_by_fingerprint<'s, 'a>(
    side: &'s [(Fingerprint, &'a Listing)],
) -> BTreeMap<&'s Fingerprint, Vec<&'a Listing>> {
    let mut groups: BTreeMap<&Fingerprint, Vec<&Listing>> = BTreeMap::new();
    for (fp, listing) in side {
        groups.entry(fp).or_default().push(*listing);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::{AgencyOrPrivate, ListingType};

    fn flat(id: &str, source: &str) -> Listing {
        Listing {
            title: Some("Apartment 2 rooms 45m2 in Lyon".to_string()),
            city: Some("Lyon".to_string()),
            postal_code: Some("69000".to_string()),
            listing_type: Some(ListingType::Rent),
            property_type: Some("apartment".to_string()),
            rooms: Some(2),
            surface: Some(45.0),
            price: Some(1200),
            agency_or_private: Some(AgencyOrPrivate::Agency),
            url: Some(format!("https://{source}.example/{id}")),
            ..Listing::new(id, source)
        }
    }

    fn ids(listings: &[&Listing]) -> Vec<String> {
        listings.iter().map(|l| l.id.clone()).collect()
    }

    #[test]
    fn empty_dataset_gives_empty_views() {
        let result = compute_differences(&[], &SourcePair::default()).unwrap();
        assert!(result.only_in_a.is_empty());
        assert!(result.only_in_b.is_empty());
        assert!(result.mismatches.is_empty());
        assert_eq!(result.identical_pairs, 0);
    }

    #[test]
    fn identical_pair_is_matched_without_mismatch() {
        let dataset = vec![flat("a1", "seloger"), flat("b1", "leboncoin")];
        let result = compute_differences(&dataset, &SourcePair::default()).unwrap();

        assert!(result.only_in_a.is_empty());
        assert!(result.only_in_b.is_empty());
        assert!(result.mismatches.is_empty());
        assert_eq!(result.identical_pairs, 1);
    }

    #[test]
    fn price_difference_splits_fingerprints_instead_of_mismatching() {
        // price is part of the fingerprint, so the two listings no longer match
        let mut b = flat("b1", "leboncoin");
        b.price = Some(1250);
        let dataset = vec![flat("a1", "seloger"), b];
        let result = compute_differences(&dataset, &SourcePair::default()).unwrap();

        assert_eq!(ids(&result.only_in_a), vec!["a1"]);
        assert_eq!(ids(&result.only_in_b), vec!["b1"]);
        assert!(result.mismatches.is_empty());
    }

    #[test]
    fn single_non_key_difference_is_reported_verbatim() {
        let mut b = flat("b1", "leboncoin");
        b.postal_code = Some("69003".to_string());
        let dataset = vec![flat("a1", "seloger"), b];
        let result = compute_differences(&dataset, &SourcePair::default()).unwrap();

        assert_eq!(result.mismatches.len(), 1);
        let m = &result.mismatches[0];
        assert_eq!(
            m.differing,
            vec![FieldDiff {
                field: ComparedField::PostalCode,
                left: Some("69000".to_string()),
                right: Some("69003".to_string()),
            }]
        );
        assert_eq!(m.left.id, "a1");
        assert_eq!(m.right.id, "b1");
        assert_eq!(m.left.url.as_deref(), Some("https://seloger.example/a1"));
        assert_eq!(m.right.url.as_deref(), Some("https://leboncoin.example/b1"));
        assert_eq!(m.fingerprint, fingerprint(&dataset[0]));
    }

    #[test]
    fn price_only_difference_between_joined_listings() {
        let a = flat("a1", "seloger");
        let mut b = flat("b1", "leboncoin");
        b.price = Some(1250);

        let diffs = diff_fields(&a, &b);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].field, ComparedField::Price);
        assert_eq!(diffs[0].left.as_deref(), Some("1200"));
        assert_eq!(diffs[0].right.as_deref(), Some("1250"));
    }

    #[test]
    fn both_absent_is_never_a_mismatch() {
        let mut a = flat("a1", "seloger");
        let mut b = flat("b1", "leboncoin");
        a.rooms = None;
        b.rooms = None;
        a.postal_code = None;
        b.postal_code = None;

        let dataset = vec![a, b];
        let result = compute_differences(&dataset, &SourcePair::default()).unwrap();
        assert!(result.mismatches.is_empty());
        assert_eq!(result.identical_pairs, 1);
    }

    #[test]
    fn absent_against_present_is_a_mismatch() {
        let mut b = flat("b1", "leboncoin");
        b.agency_or_private = None;
        let dataset = vec![flat("a1", "seloger"), b];
        let result = compute_differences(&dataset, &SourcePair::default()).unwrap();

        assert_eq!(result.mismatches.len(), 1);
        let diff = &result.mismatches[0].differing[0];
        assert_eq!(diff.field, ComparedField::AgencyOrPrivate);
        assert_eq!(diff.left.as_deref(), Some("agency"));
        assert_eq!(diff.right, None);
    }

    #[test]
    fn empty_string_differs_from_absent() {
        let mut b = flat("b1", "leboncoin");
        b.property_type = Some(String::new());
        let mut a = flat("a1", "seloger");
        a.property_type = None;

        let diffs = diff_fields(&a, &b);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].field, ComparedField::PropertyType);
        assert_eq!(diffs[0].right.as_deref(), Some(""));
    }

    #[test]
    fn duplicates_on_one_side_join_pairwise() {
        let mut b1 = flat("b1", "leboncoin");
        b1.postal_code = Some("69001".to_string());
        let mut b2 = flat("b2", "leboncoin");
        b2.postal_code = Some("69002".to_string());
        let dataset = vec![flat("a1", "seloger"), flat("a2", "seloger"), b1, b2];

        let result = compute_differences(&dataset, &SourcePair::default()).unwrap();
        let pairs: Vec<(&str, &str)> = result
            .mismatches
            .iter()
            .map(|m| (m.left.id.as_str(), m.right.id.as_str()))
            .collect();
        assert_eq!(pairs, vec![("a1", "b1"), ("a1", "b2"), ("a2", "b1"), ("a2", "b2")]);
    }

    #[test]
    fn membership_not_multiplicity_decides_only_views() {
        let dataset = vec![
            flat("a1", "seloger"),
            flat("b1", "leboncoin"),
            flat("b2", "leboncoin"),
        ];
        let result = compute_differences(&dataset, &SourcePair::default()).unwrap();
        assert!(result.only_in_a.is_empty());
        assert!(result.only_in_b.is_empty());
        assert_eq!(result.identical_pairs, 2);
    }

    #[test]
    fn one_empty_side_yields_no_joins() {
        let dataset = vec![flat("a1", "seloger"), flat("a2", "seloger")];
        let result = compute_differences(&dataset, &SourcePair::default()).unwrap();
        assert_eq!(ids(&result.only_in_a), vec!["a1", "a2"]);
        assert!(result.only_in_b.is_empty());
        assert!(result.mismatches.is_empty());
    }

    #[test]
    fn mismatches_follow_sorted_fingerprint_order() {
        let mut rows = Vec::new();
        for (i, title) in ["Loft", "Maison", "Studio", "Duplex"].iter().enumerate() {
            let mut a = flat(&format!("a{i}"), "seloger");
            a.title = Some(title.to_string());
            let mut b = flat(&format!("b{i}"), "leboncoin");
            b.title = Some(title.to_string());
            b.postal_code = Some("69009".to_string());
            rows.push(a);
            rows.push(b);
        }

        let result = compute_differences(&rows, &SourcePair::default()).unwrap();
        let fps: Vec<&Fingerprint> = result.mismatches.iter().map(|m| &m.fingerprint).collect();
        let mut sorted = fps.clone();
        sorted.sort();
        assert_eq!(result.mismatches.len(), 4);
        assert_eq!(fps, sorted);
    }

    #[test]
    fn every_record_lands_in_exactly_one_category() {
        let mut changed = flat("b2", "leboncoin");
        changed.title = Some("Maison 5 rooms".to_string());
        let mut drifted = flat("b3", "leboncoin");
        drifted.postal_code = Some("69100".to_string());
        let dataset = vec![
            flat("a1", "seloger"),
            flat("b1", "leboncoin"),
            changed,
            drifted,
        ];

        let result = compute_differences(&dataset, &SourcePair::default()).unwrap();

        let mut joined: HashSet<&str> = HashSet::new();
        for m in &result.mismatches {
            joined.insert(m.left.id.as_str());
            joined.insert(m.right.id.as_str());
        }
        let only: HashSet<&str> = result
            .only_in_a
            .iter()
            .chain(result.only_in_b.iter())
            .map(|l| l.id.as_str())
            .collect();

        assert_eq!(only, HashSet::from(["b2"]));
        assert!(joined.is_disjoint(&only));
        // a1 x b1 is identical, a1 x b3 mismatches
        assert_eq!(result.identical_pairs, 1);
        assert_eq!(joined, HashSet::from(["a1", "b3"]));
    }

    #[test]
    fn unknown_source_is_rejected() {
        let dataset = vec![flat("a1", "seloger"), flat("c1", "pap")];
        let err = compute_differences(&dataset, &SourcePair::default()).unwrap_err();
        assert_eq!(
            err,
            ReconcileError::UnexpectedSource {
                id: "c1".to_string(),
                tag: "pap".to_string(),
                left: "seloger".to_string(),
                right: "leboncoin".to_string(),
            }
        );
    }

    #[test]
    fn missing_source_fails_fast() {
        let dataset = vec![flat("a1", "seloger"), flat("x", "  ")];
        let err = compute_differences(&dataset, &SourcePair::default()).unwrap_err();
        assert_eq!(err, ReconcileError::MissingSource { id: "x".to_string() });
    }

    #[test]
    fn source_pair_requires_two_distinct_tags() {
        assert!(SourcePair::new("seloger", "SeLoger").is_err());
        assert!(SourcePair::new("", "leboncoin").is_err());
        let pair = SourcePair::new("pap", "bienici").unwrap();
        assert_eq!(pair.left.as_str(), "pap");
    }

    #[test]
    fn input_is_left_untouched() {
        let dataset = vec![flat("a1", "seloger"), flat("b1", "leboncoin")];
        let before = dataset.clone();
        let _ = compute_differences(&dataset, &SourcePair::default()).unwrap();
        assert_eq!(dataset, before);
    }
}
