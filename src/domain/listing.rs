// src/domain/listing.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag naming the site a listing was collected from (e.g. "seloger").
/// Tags are trimmed and lowercased so "SeLoger " and "seloger" partition together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Source(String);

impl Source {
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(tag.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Source {
    fn from(tag: &str) -> Self {
        Source::new(tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Rent,
    Sale,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Rent => "rent",
            ListingType::Sale => "sale",
        }
    }
}

impl FromStr for ListingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rent" => Ok(ListingType::Rent),
            "sale" => Ok(ListingType::Sale),
            other => Err(format!("unknown listing type '{other}'")),
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgencyOrPrivate {
    Agency,
    Private,
}

impl AgencyOrPrivate {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgencyOrPrivate::Agency => "agency",
            AgencyOrPrivate::Private => "private",
        }
    }
}

impl FromStr for AgencyOrPrivate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "agency" => Ok(AgencyOrPrivate::Agency),
            "private" => Ok(AgencyOrPrivate::Private),
            other => Err(format!("unknown seller kind '{other}'")),
        }
    }
}

impl fmt::Display for AgencyOrPrivate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single listing as collected from one source.
///
/// Every attribute except `id` and `source` may be missing, and a missing
/// value (`None`) is never the same thing as an empty string or a zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Opaque key assigned at ingestion time.
    pub id: String,
    pub source: Source,

    pub title: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub listing_type: Option<ListingType>,
    pub property_type: Option<String>,
    pub rooms: Option<i64>,
    /// Square metres.
    pub surface: Option<f64>,
    pub price: Option<i64>,
    pub agency_or_private: Option<AgencyOrPrivate>,
    pub description: Option<String>,
    pub url: Option<String>,
}

impl Listing {
    /// A listing with only its identity and source set.
    pub fn new(id: impl Into<String>, source: impl Into<Source>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            title: None,
            city: None,
            postal_code: None,
            listing_type: None,
            property_type: None,
            rooms: None,
            surface: None,
            price: None,
            agency_or_private: None,
            description: None,
            url: None,
        }
    }
}
