use crate::db::connection::Database;
use crate::domain::fingerprint::sha256_hex;
use crate::domain::listing::{Listing, Source};
use crate::errors::ServerError;
use rusqlite::types::ValueRef;
use rusqlite::{params, Row};
use std::collections::HashSet;
use std::str::FromStr;
use tracing::{info, warn};

const SELECT_LISTINGS: &str = r#"
    SELECT
        id,                 -- 0
        source,             -- 1
        title,              -- 2
        url,                -- 3
        price,              -- 4
        city,               -- 5
        postal_code,        -- 6
        listing_type,       -- 7
        property_type,      -- 8
        rooms,              -- 9
        surface,            -- 10
        agency_or_private,  -- 11
        description         -- 12
    FROM listings
    ORDER BY rowid
"#;

/// Id for rows that arrive without one: hash of `source|url|title`.
pub fn stable_id(source: &Source, url: Option<&str>, title: Option<&str>) -> String {
    sha256_hex(&format!(
        "{}|{}|{}",
        source,
        url.unwrap_or(""),
        title.unwrap_or("")
    ))
}

/// Insert or update listings by id in one transaction. Returns the number of
/// distinct rows written; a later listing with the same id replaces an earlier one.
pub fn upsert_listings(db: &Database, listings: &[Listing]) -> Result<usize, ServerError> {
    if listings.is_empty() {
        return Ok(0);
    }

    let written = db.with_conn(|conn| {
        let tx = conn.transaction()?;

        let distinct = {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO listings (
                    id, source, title, url, price, city, postal_code, listing_type,
                    property_type, rooms, surface, agency_or_private, description
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8,
                    ?9, ?10, ?11, ?12, ?13
                )
                ON CONFLICT(id) DO UPDATE SET
                    source = excluded.source,
                    title = excluded.title,
                    url = excluded.url,
                    price = excluded.price,
                    city = excluded.city,
                    postal_code = excluded.postal_code,
                    listing_type = excluded.listing_type,
                    property_type = excluded.property_type,
                    rooms = excluded.rooms,
                    surface = excluded.surface,
                    agency_or_private = excluded.agency_or_private,
                    description = excluded.description
                "#,
            )?;

            let mut ids = HashSet::new();
            for listing in listings {
                if listing.source.is_empty() {
                    return Err(ServerError::BadRequest(format!(
                        "listing '{}' has no source",
                        listing.id
                    )));
                }

                let id = if listing.id.trim().is_empty() {
                    stable_id(
                        &listing.source,
                        listing.url.as_deref(),
                        listing.title.as_deref(),
                    )
                } else {
                    listing.id.clone()
                };

                stmt.execute(params![
                    &id,
                    listing.source.as_str(),
                    listing.title,
                    listing.url,
                    listing.price,
                    listing.city,
                    listing.postal_code,
                    listing.listing_type.map(|t| t.as_str()),
                    listing.property_type,
                    listing.rooms,
                    listing.surface,
                    listing.agency_or_private.map(|a| a.as_str()),
                    listing.description,
                ])?;
                ids.insert(id);
            }
            ids.len()
        };

        tx.commit()?;
        Ok(distinct)
    })?;

    info!("Upserted {written} listings");
    Ok(written)
}

/// All stored listings, in insertion order.
pub fn load_listings(db: &Database) -> Result<Vec<Listing>, ServerError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(SELECT_LISTINGS)?;
        let rows = stmt.query_map([], listing_from_row)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    })
}

pub fn count_listings(db: &Database) -> Result<i64, ServerError> {
    db.with_conn(|conn| {
        let n = conn.query_row("SELECT COUNT(*) FROM listings", [], |row| row.get(0))?;
        Ok(n)
    })
}

fn listing_from_row(row: &Row<'_>) -> rusqlite::Result<Listing> {
    let id: String = row.get(0)?;
    let source: String = row.get(1)?;

    Ok(Listing {
        listing_type: parse_lenient(&id, "listing_type", row.get(7)?),
        agency_or_private: parse_lenient(&id, "agency_or_private", row.get(11)?),
        title: row.get(2)?,
        url: row.get(3)?,
        price: int_lenient(&id, "price", row.get_ref(4)?),
        city: row.get(5)?,
        postal_code: row.get(6)?,
        property_type: row.get(8)?,
        rooms: int_lenient(&id, "rooms", row.get_ref(9)?),
        surface: number_lenient(&id, "surface", row.get_ref(10)?),
        description: row.get(12)?,
        source: Source::new(source),
        id,
    })
}

// Unrecognized enum text degrades to "absent" instead of failing the load.
fn parse_lenient<T: FromStr>(id: &str, column: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(listing = id, column, value = %raw, "unrecognized value, treating as absent");
            None
        }
    }
}

// Numeric columns hold whatever the scraper stored; anything that does not
// read as a finite number loads as absent.
fn number_lenient(id: &str, column: &str, raw: ValueRef<'_>) -> Option<f64> {
    let value = match raw {
        ValueRef::Null => return None,
        ValueRef::Integer(i) => Some(i as f64),
        ValueRef::Real(f) => Some(f),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|t| t.trim().parse::<f64>().ok()),
        ValueRef::Blob(_) => None,
    };

    match value.filter(|v| v.is_finite()) {
        Some(v) => Some(v),
        None => {
            warn!(listing = id, column, kind = %raw.data_type(), "non-numeric value, treating as absent");
            None
        }
    }
}

fn int_lenient(id: &str, column: &str, raw: ValueRef<'_>) -> Option<i64> {
    match raw {
        ValueRef::Integer(i) => Some(i),
        _ => number_lenient(id, column, raw).map(|v| v.round() as i64),
    }
}
