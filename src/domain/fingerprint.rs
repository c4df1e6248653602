// src/domain/fingerprint.rs

use crate::domain::listing::Listing;
use crate::domain::normalize::normalize;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// Identity key of "the same underlying property": a lowercase hex SHA-256
/// digest of the normalized `title|city|price|surface|rooms` string.
///
/// The source tag is deliberately not part of the key, so the same home listed
/// on two sites produces the same fingerprint. Deduplication and cross-source
/// reconciliation both use this one definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 8 hex characters, for display.
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn fingerprint(listing: &Listing) -> Fingerprint {
    Fingerprint(sha256_hex(&fingerprint_key(listing)))
}

/// The normalized string that [`fingerprint`] hashes.
pub fn fingerprint_key(listing: &Listing) -> String {
    let parts = [
        field_text(&listing.title),
        field_text(&listing.city),
        field_text(&listing.price),
        field_text(&listing.surface),
        field_text(&listing.rooms),
    ];
    normalize(Some(&parts.join("|")))
}

pub(crate) fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

// Absent fields contribute nothing, never a "None" literal.
fn field_text<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}
