// src/mock_data.rs
//
// Synthetic listings for demos and tests. Cross-source clones are what make
// the duplicate and difference views non-trivial.

use crate::domain::diff::{ComparedField, SourcePair};
use crate::domain::fingerprint::sha256_hex;
use crate::domain::listing::{AgencyOrPrivate, Listing, ListingType, Source};
use rand::seq::SliceRandom;
use rand::Rng;

const CITIES: &[(&str, &str)] = &[
    ("Paris", "75000"),
    ("Lyon", "69000"),
    ("Marseille", "13000"),
    ("Toulouse", "31000"),
    ("Bordeaux", "33000"),
    ("Lille", "59000"),
];

const PROPERTY_TYPES: &[&str] = &["apartment", "house", "studio"];

/// Which generator fills the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedMode {
    Mock,
    Enhanced,
    Curated,
}

impl SeedMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeedMode::Mock => "mock",
            SeedMode::Enhanced => "enhanced",
            SeedMode::Curated => "curated",
        }
    }
}

impl std::str::FromStr for SeedMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "mock" => Ok(SeedMode::Mock),
            "enhanced" => Ok(SeedMode::Enhanced),
            "curated" => Ok(SeedMode::Curated),
            other => Err(format!("unknown seed mode '{other}'")),
        }
    }
}

/// Up to `total` rows from the chosen generator. Curated mode makes
/// `total / 2` pairs.
pub fn generate<R: Rng>(
    rng: &mut R,
    mode: SeedMode,
    total: usize,
    duplicate_ratio: f64,
    pair: &SourcePair,
) -> Vec<Listing> {
    match mode {
        SeedMode::Mock => generate_mock_rows(rng, total, duplicate_ratio, pair),
        SeedMode::Enhanced => generate_enhanced_duplicates(rng, total, duplicate_ratio, pair),
        SeedMode::Curated => generate_curated_duplicates(rng, total / 2, pair),
    }
}

// Covers every compared field, so a clone that drifted in any of them keeps
// its own row in the store.
fn mock_id(listing: &Listing) -> String {
    let fields: Vec<String> = ComparedField::ALL
        .iter()
        .map(|field| field.value_of(listing).unwrap_or_default())
        .collect();
    sha256_hex(&format!("{}|{}", listing.source, fields.join("|")))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn random_listing<R: Rng>(rng: &mut R, source: &Source) -> Listing {
    let (city, postal) = CITIES[rng.gen_range(0..CITIES.len())];
    let property_type = PROPERTY_TYPES[rng.gen_range(0..PROPERTY_TYPES.len())];
    let listing_type = if rng.gen_bool(0.5) {
        ListingType::Rent
    } else {
        ListingType::Sale
    };
    let rooms: i64 = rng.gen_range(1..=5);
    let surface: i64 = rng.gen_range(18..=140);
    let price: i64 = match listing_type {
        ListingType::Rent => rng.gen_range(400..=3500),
        ListingType::Sale => rng.gen_range(80_000..=1_200_000),
    };
    let agency_or_private = if rng.gen_bool(0.6) {
        AgencyOrPrivate::Agency
    } else {
        AgencyOrPrivate::Private
    };

    let mut listing = Listing {
        title: Some(format!(
            "{} {rooms} rooms {surface}m2 in {city}",
            capitalize(property_type)
        )),
        city: Some(city.to_string()),
        postal_code: Some(postal.to_string()),
        listing_type: Some(listing_type),
        property_type: Some(property_type.to_string()),
        rooms: Some(rooms),
        surface: Some(surface as f64),
        price: Some(price),
        agency_or_private: Some(agency_or_private),
        ..Listing::new(String::new(), source.clone())
    };
    listing.id = mock_id(&listing);
    listing
}

fn other_source<'p>(pair: &'p SourcePair, source: &Source) -> &'p Source {
    if *source == pair.left {
        &pair.right
    } else {
        &pair.left
    }
}

/// Half the base rows from each source, then `floor(len * duplicate_ratio)`
/// of them cloned onto the opposite source. Shuffled and cut to `total`.
pub fn generate_mock_rows<R: Rng>(
    rng: &mut R,
    total: usize,
    duplicate_ratio: f64,
    pair: &SourcePair,
) -> Vec<Listing> {
    if total == 0 {
        return Vec::new();
    }

    let mut rows = base_rows(rng, total, pair);
    let num_dups = (rows.len() as f64 * duplicate_ratio.max(0.0)) as usize;

    let clones: Vec<Listing> = rows
        .iter()
        .take(num_dups)
        .map(|original| {
            let mut clone = Listing {
                source: other_source(pair, &original.source).clone(),
                ..original.clone()
            };
            clone.id = mock_id(&clone);
            clone
        })
        .collect();

    rows.extend(clones);
    rows.shuffle(rng);
    rows.truncate(total);
    rows
}

/// Like [`generate_mock_rows`] but each cloned property gets one or two copies
/// on the other site, some with a jittered price (30%) or a dropped field
/// (20%), mimicking how the two sites drift apart.
pub fn generate_enhanced_duplicates<R: Rng>(
    rng: &mut R,
    total: usize,
    duplicate_ratio: f64,
    pair: &SourcePair,
) -> Vec<Listing> {
    if total == 0 {
        return Vec::new();
    }

    let mut rows = base_rows(rng, total, pair);
    let num_dups = (rows.len() as f64 * duplicate_ratio.max(0.0)) as usize;

    let mut clones = Vec::new();
    for original in rows.iter().take(num_dups) {
        for _ in 0..rng.gen_range(1..=2) {
            let mut clone = Listing {
                source: other_source(pair, &original.source).clone(),
                ..original.clone()
            };

            if rng.gen_bool(0.3) {
                let jitter: i64 = rng.gen_range(-50..=50);
                clone.price = clone.price.map(|p| (p + jitter).max(0));
            }
            if rng.gen_bool(0.2) {
                match rng.gen_range(0..3) {
                    0 => clone.surface = None,
                    1 => clone.rooms = None,
                    _ => clone.agency_or_private = None,
                }
            }

            clone.id = mock_id(&clone);
            clones.push(clone);
        }
    }

    rows.extend(clones);
    rows.shuffle(rng);
    rows.truncate(total);
    rows
}

/// `num_pairs` listings present on both sites. The right-hand copy loses one
/// field outside the fingerprint (and sometimes flips agency to private), so
/// every pair lands in the mismatch view.
pub fn generate_curated_duplicates<R: Rng>(
    rng: &mut R,
    num_pairs: usize,
    pair: &SourcePair,
) -> Vec<Listing> {
    let mut rows = Vec::with_capacity(num_pairs * 2);

    for _ in 0..num_pairs {
        let (city, postal) = CITIES[rng.gen_range(0..CITIES.len())];
        let property_type = PROPERTY_TYPES[rng.gen_range(0..PROPERTY_TYPES.len())];
        let rooms: i64 = rng.gen_range(1..=4);
        let surface = *[42, 55, 68, 75, 90].choose(rng).unwrap_or(&55);
        let (listing_type, prices): (ListingType, &[i64]) = if rng.gen_bool(0.5) {
            (ListingType::Rent, &[950, 1200])
        } else {
            (ListingType::Sale, &[185_000, 320_000, 540_000])
        };

        let mut left = Listing {
            title: Some(format!(
                "{} {rooms} rooms {surface}m2 in {city}",
                capitalize(property_type)
            )),
            city: Some(city.to_string()),
            postal_code: Some(postal.to_string()),
            listing_type: Some(listing_type),
            property_type: Some(property_type.to_string()),
            rooms: Some(rooms),
            surface: Some(surface as f64),
            price: prices.choose(rng).copied(),
            agency_or_private: Some(AgencyOrPrivate::Agency),
            ..Listing::new(String::new(), pair.left.clone())
        };
        left.id = mock_id(&left);

        let mut right = Listing {
            source: pair.right.clone(),
            ..left.clone()
        };
        if rng.gen_bool(0.3) {
            right.agency_or_private = Some(AgencyOrPrivate::Private);
        }
        match rng.gen_range(0..4) {
            0 => right.postal_code = None,
            1 => right.property_type = None,
            2 => right.listing_type = None,
            _ => right.agency_or_private = None,
        }
        right.id = mock_id(&right);

        rows.push(left);
        rows.push(right);
    }
    rows
}

fn base_rows<R: Rng>(rng: &mut R, total: usize, pair: &SourcePair) -> Vec<Listing> {
    let left_count = (total / 2).max(1);
    let right_count = total.saturating_sub(left_count);

    let mut rows = Vec::with_capacity(total * 2);
    for _ in 0..left_count {
        rows.push(random_listing(rng, &pair.left));
    }
    for _ in 0..right_count {
        rows.push(random_listing(rng, &pair.right));
    }
    rows
}
