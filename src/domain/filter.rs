// src/domain/filter.rs

use crate::domain::listing::{AgencyOrPrivate, Listing, ListingType, Source};
use std::collections::{BTreeSet, HashMap};

/// Dashboard filter over a dataset. Every empty criterion matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub sources: Vec<Source>,
    pub cities: Vec<String>,
    pub listing_types: Vec<ListingType>,
    pub agency_or_private: Vec<AgencyOrPrivate>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    /// Case-insensitive substring searched in title and description.
    pub query: Option<String>,
}

impl ListingFilter {
    /// Builds a filter from URL query parameters. List criteria are
    /// comma-separated (`source=seloger,leboncoin`).
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let list = |key: &str| -> Vec<String> {
            params
                .get(key)
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default()
        };

        let price = |key: &str| -> Result<Option<i64>, String> {
            match params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
                Some(v) => v
                    .parse::<i64>()
                    .map(Some)
                    .map_err(|_| format!("'{key}' must be a whole number, got '{v}'")),
                None => Ok(None),
            }
        };

        let listing_types = list("listing_type")
            .iter()
            .map(|s| s.parse())
            .collect::<Result<Vec<ListingType>, _>>()?;
        let agency_or_private = list("agency_or_private")
            .iter()
            .map(|s| s.parse())
            .collect::<Result<Vec<AgencyOrPrivate>, _>>()?;

        Ok(Self {
            sources: list("source").iter().map(Source::new).collect(),
            cities: list("city"),
            listing_types,
            agency_or_private,
            min_price: price("min_price")?,
            max_price: price("max_price")?,
            query: params
                .get("q")
                .map(|q| q.trim().to_lowercase())
                .filter(|q| !q.is_empty()),
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == ListingFilter::default()
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        if !self.sources.is_empty() && !self.sources.contains(&listing.source) {
            return false;
        }

        // Set criteria never match an absent value.
        if !self.cities.is_empty()
            && !listing
                .city
                .as_ref()
                .is_some_and(|c| self.cities.contains(c))
        {
            return false;
        }
        if !self.listing_types.is_empty()
            && !listing
                .listing_type
                .is_some_and(|t| self.listing_types.contains(&t))
        {
            return false;
        }
        if !self.agency_or_private.is_empty()
            && !listing
                .agency_or_private
                .is_some_and(|a| self.agency_or_private.contains(&a))
        {
            return false;
        }

        // An unknown price sorts as zero.
        let price = listing.price.unwrap_or(0);
        if self.min_price.is_some_and(|min| price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| price > max) {
            return false;
        }

        if let Some(q) = &self.query {
            let hit = |text: &Option<String>| {
                text.as_deref()
                    .is_some_and(|t| t.to_lowercase().contains(q.as_str()))
            };
            if !hit(&listing.title) && !hit(&listing.description) {
                return false;
            }
        }

        true
    }

    pub fn apply(&self, listings: &[Listing]) -> Vec<Listing> {
        listings
            .iter()
            .filter(|l| self.matches(l))
            .cloned()
            .collect()
    }
}

/// Distinct values present in the store, offered as filter choices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub sources: Vec<String>,
    pub cities: Vec<String>,
    pub listing_types: Vec<String>,
    pub agency_or_private: Vec<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}

impl FilterOptions {
    pub fn from_listings(listings: &[Listing]) -> Self {
        let mut sources = BTreeSet::new();
        let mut cities = BTreeSet::new();
        let mut listing_types = BTreeSet::new();
        let mut agency_or_private = BTreeSet::new();

        for listing in listings {
            if !listing.source.is_empty() {
                sources.insert(listing.source.to_string());
            }
            if let Some(city) = &listing.city {
                cities.insert(city.clone());
            }
            if let Some(t) = listing.listing_type {
                listing_types.insert(t.to_string());
            }
            if let Some(a) = listing.agency_or_private {
                agency_or_private.insert(a.to_string());
            }
        }

        let prices = listings.iter().filter_map(|l| l.price);
        Self {
            sources: sources.into_iter().collect(),
            cities: cities.into_iter().collect(),
            listing_types: listing_types.into_iter().collect(),
            agency_or_private: agency_or_private.into_iter().collect(),
            min_price: prices.clone().min(),
            max_price: prices.max(),
        }
    }
}

/// Cheapest first; listings without a price go last, in dataset order.
pub fn sort_by_price(listings: &[Listing]) -> Vec<&Listing> {
    let mut sorted: Vec<&Listing> = listings.iter().collect();
    sorted.sort_by_key(|l| (l.price.is_none(), l.price));
    sorted
}
