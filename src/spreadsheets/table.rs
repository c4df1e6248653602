// src/spreadsheets/table.rs
//
// Flat, uniformly shaped rows shared by the XLSX and CSV writers.

use crate::domain::{ComparedField, DedupEntry, DiffResult, Listing, Mismatch, Source};

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn text(value: &Option<String>) -> Cell {
        value.clone().map(Cell::Text).unwrap_or(Cell::Empty)
    }

    fn number<T: Into<f64> + Copy>(value: Option<T>) -> Cell {
        value.map(|v| Cell::Number(v.into())).unwrap_or(Cell::Empty)
    }

    /// Text form used by CSV; absent values become empty fields.
    pub fn render(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

pub const LISTING_HEADERS: [&str; 13] = [
    "id",
    "source",
    "title",
    "url",
    "price",
    "city",
    "postal_code",
    "listing_type",
    "property_type",
    "rooms",
    "surface",
    "agency_or_private",
    "description",
];

pub fn listing_cells(listing: &Listing) -> Vec<Cell> {
    vec![
        Cell::Text(listing.id.clone()),
        Cell::Text(listing.source.to_string()),
        Cell::text(&listing.title),
        Cell::text(&listing.url),
        // Prices stay well inside f64's exact integer range.
        Cell::number(listing.price.map(|p| p as f64)),
        Cell::text(&listing.city),
        Cell::text(&listing.postal_code),
        Cell::text(&listing.listing_type.map(|t| t.to_string())),
        Cell::text(&listing.property_type),
        Cell::number(listing.rooms.map(|r| r as f64)),
        Cell::number(listing.surface),
        Cell::text(&listing.agency_or_private.map(|a| a.to_string())),
        Cell::text(&listing.description),
    ]
}

pub fn listings_table(name: &str, listings: &[&Listing]) -> Table {
    Table {
        name: name.to_string(),
        headers: LISTING_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows: listings.iter().map(|l| listing_cells(l)).collect(),
    }
}

/// Listings plus their fingerprint and duplicate flag.
pub fn dedup_table(entries: &[DedupEntry<'_>]) -> Table {
    let mut headers: Vec<String> = LISTING_HEADERS.iter().map(|h| h.to_string()).collect();
    headers.push("fingerprint".to_string());
    headers.push("is_duplicate".to_string());

    let rows = entries
        .iter()
        .map(|entry| {
            let mut cells = listing_cells(entry.listing);
            cells.push(Cell::Text(entry.fingerprint.to_string()));
            cells.push(Cell::Text(entry.is_duplicate.to_string()));
            cells
        })
        .collect();

    Table {
        name: "listings".to_string(),
        headers,
        rows,
    }
}

pub fn mismatch_headers(a: &Source, b: &Source) -> Vec<String> {
    let mut headers = vec!["fingerprint".to_string()];
    for field in ComparedField::ALL {
        headers.push(format!("{}_{a}", field.name()));
        headers.push(format!("{}_{b}", field.name()));
    }
    headers.push(format!("url_{a}"));
    headers.push(format!("url_{b}"));
    headers.push("differing_fields".to_string());
    headers
}

pub fn mismatch_cells(m: &Mismatch<'_>) -> Vec<Cell> {
    let mut cells = vec![Cell::Text(m.fingerprint.to_string())];
    for field in ComparedField::ALL {
        cells.push(Cell::text(&field.value_of(m.left)));
        cells.push(Cell::text(&field.value_of(m.right)));
    }
    cells.push(Cell::text(&m.left.url));
    cells.push(Cell::text(&m.right.url));
    cells.push(Cell::Text(m.differing_names().join(",")));
    cells
}

/// `only_<A>`, `only_<B>` and `mismatches`, in that order.
pub fn diff_tables(diff: &DiffResult<'_>) -> [Table; 3] {
    let (a, b) = (&diff.pair.left, &diff.pair.right);
    [
        listings_table(&format!("only_{a}"), &diff.only_in_a),
        listings_table(&format!("only_{b}"), &diff.only_in_b),
        Table {
            name: "mismatches".to_string(),
            headers: mismatch_headers(a, b),
            rows: diff.mismatches.iter().map(mismatch_cells).collect(),
        },
    ]
}
