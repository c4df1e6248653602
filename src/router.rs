use crate::db::listings::{count_listings, load_listings, upsert_listings};
use crate::db::Database;
use crate::domain::{
    compute_differences, duplicate_groups, mark_duplicates, sort_by_price, unique_count,
    FilterOptions, Listing, ListingFilter, SourcePair,
};
use crate::errors::ServerError;
use crate::mock_data::{generate, SeedMode};
use crate::responses::{html_response, redirect, xlsx_response, ResultResp};
use crate::spreadsheets::{diff_workbook, listings_workbook};
use crate::templates::pages::{
    dashboard_page, differences_page, duplicates_page, Comparison, DashboardVm,
};
use astra::Request;
use chrono::Utc;
use std::collections::HashMap;
use std::io::Read;
use tracing::{info, warn};

/// What every request handler needs: the store and the source pair to compare.
pub struct AppState {
    pub db: Database,
    pub sources: SourcePair,
}

const MAX_POPULATE: usize = 10_000;
const DEFAULT_DUPLICATE_RATIO: f64 = 0.3;

pub fn handle(mut req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let query = req.uri().query().unwrap_or("").to_string();

    let mut params = parse_pairs(&query);
    if method == "POST" {
        // Form fields from the body override the query string.
        params.extend(read_form(&mut req)?);
    }

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => overview(state, &params, &query),
        ("GET", "/duplicates") => duplicates(state, &params),
        ("GET", "/differences") => differences(state, &params, &query),
        ("GET", "/export/differences.xlsx") => export_differences(state, &params),
        ("GET", "/export/listings.xlsx") => export_listings(state, &params),
        ("POST", "/populate") => populate(state, &params),
        _ => Err(ServerError::NotFound),
    }
}

/// Loads the store and applies the dashboard filter from the query string.
fn filtered_listings(
    state: &AppState,
    params: &HashMap<String, String>,
) -> Result<Vec<Listing>, ServerError> {
    let filter = ListingFilter::from_params(params).map_err(ServerError::BadRequest)?;
    let all = load_listings(&state.db)?;
    Ok(if filter.is_empty() { all } else { filter.apply(&all) })
}

fn describe_filter(filter: &ListingFilter) -> Vec<(&'static str, String)> {
    let join = |items: Vec<String>| items.join(", ");
    let mut out = Vec::new();

    if !filter.sources.is_empty() {
        out.push(("Sources", join(filter.sources.iter().map(|s| s.to_string()).collect())));
    }
    if !filter.cities.is_empty() {
        out.push(("Cities", filter.cities.join(", ")));
    }
    if !filter.listing_types.is_empty() {
        out.push(("Listing types", join(filter.listing_types.iter().map(|t| t.to_string()).collect())));
    }
    if !filter.agency_or_private.is_empty() {
        out.push((
            "Agency/Private",
            join(filter.agency_or_private.iter().map(|a| a.to_string()).collect()),
        ));
    }
    if filter.min_price.is_some() || filter.max_price.is_some() {
        let bound = |v: Option<i64>| v.map(|p| p.to_string()).unwrap_or_else(|| "…".to_string());
        out.push((
            "Price",
            format!("{} - {}", bound(filter.min_price), bound(filter.max_price)),
        ));
    }
    if let Some(q) = &filter.query {
        out.push(("Search", format!("\"{q}\"")));
    }
    out
}

fn overview(state: &AppState, params: &HashMap<String, String>, query: &str) -> ResultResp {
    let filter = ListingFilter::from_params(params).map_err(ServerError::BadRequest)?;
    let all = load_listings(&state.db)?;
    let listings = if filter.is_empty() { all.clone() } else { filter.apply(&all) };

    let entries = mark_duplicates(&listings);
    // A third stored source only disables the comparison card.
    let comparison = match compute_differences(&listings, &state.sources) {
        Ok(diff) => Ok(Comparison {
            only_a: diff.only_in_a.len(),
            only_b: diff.only_in_b.len(),
            mismatches: diff.mismatches.len(),
            identical_pairs: diff.identical_pairs,
        }),
        Err(e) => {
            warn!("comparison unavailable on overview: {e}");
            Err(e.to_string())
        }
    };

    let vm = DashboardVm {
        total: all.len(),
        filtered: listings.len(),
        unique: unique_count(&entries),
        duplicate_groups: duplicate_groups(&entries).len(),
        source_a: state.sources.left.to_string(),
        source_b: state.sources.right.to_string(),
        comparison,
        summary: describe_filter(&filter),
        filter: &filter,
        options: FilterOptions::from_listings(&all),
        dataset: sort_by_price(&listings),
        query: query.to_string(),
        generated_at: Utc::now().naive_utc(),
    };

    html_response(dashboard_page(&vm))
}

fn duplicates(state: &AppState, params: &HashMap<String, String>) -> ResultResp {
    let listings = filtered_listings(state, params)?;
    let entries = mark_duplicates(&listings);
    let groups = duplicate_groups(&entries);

    html_response(duplicates_page(&groups, unique_count(&entries), listings.len()))
}

fn differences(state: &AppState, params: &HashMap<String, String>, query: &str) -> ResultResp {
    let listings = filtered_listings(state, params)?;
    let diff = compute_differences(&listings, &state.sources)?;

    let export_href = if query.is_empty() {
        "/export/differences.xlsx".to_string()
    } else {
        format!("/export/differences.xlsx?{query}")
    };
    html_response(differences_page(&diff, &export_href))
}

fn export_differences(state: &AppState, params: &HashMap<String, String>) -> ResultResp {
    let listings = filtered_listings(state, params)?;
    let diff = compute_differences(&listings, &state.sources)?;
    let buffer = diff_workbook(&diff)?;

    info!(
        only_a = diff.only_in_a.len(),
        only_b = diff.only_in_b.len(),
        mismatches = diff.mismatches.len(),
        "exporting differences workbook"
    );
    xlsx_response(buffer, "source_differences.xlsx")
}

fn export_listings(state: &AppState, params: &HashMap<String, String>) -> ResultResp {
    let listings = filtered_listings(state, params)?;
    let buffer = listings_workbook(&mark_duplicates(&listings))?;
    xlsx_response(buffer, "listings.xlsx")
}

/// Tops the store up to `count` rows with synthetic listings.
fn populate(state: &AppState, params: &HashMap<String, String>) -> ResultResp {
    let count: usize = match params.get("count") {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ServerError::BadRequest(format!("count must be a number, got '{raw}'")))?,
        None => 200,
    };
    let mode: SeedMode = params
        .get("mode")
        .map(|m| m.parse::<SeedMode>())
        .transpose()
        .map_err(ServerError::BadRequest)?
        .unwrap_or(SeedMode::Mock);

    if count == 0 || count > MAX_POPULATE {
        return Err(ServerError::BadRequest(format!(
            "count must be between 1 and {MAX_POPULATE}"
        )));
    }

    let existing = count_listings(&state.db)?.max(0) as usize;
    let need = count.saturating_sub(existing);
    if need > 0 {
        let rows = generate(
            &mut rand::thread_rng(),
            mode,
            need,
            DEFAULT_DUPLICATE_RATIO,
            &state.sources,
        );
        let written = upsert_listings(&state.db, &rows)?;
        info!("Populated {written} {} listings (had {existing})", mode.as_str());
    }

    redirect("/")
}

/// `a=1&b=2` pairs, percent-decoded. A repeated key (multi-select) is joined
/// with commas, the list syntax the filter reads.
fn parse_pairs(encoded: &str) -> HashMap<String, String> {
    let mut params: HashMap<String, String> = HashMap::new();
    for (key, value) in url::form_urlencoded::parse(encoded.as_bytes()) {
        params
            .entry(key.into_owned())
            .and_modify(|joined| {
                joined.push(',');
                joined.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    params
}

fn read_form(req: &mut Request) -> Result<HashMap<String, String>, ServerError> {
    let mut body = String::new();
    req.body_mut()
        .reader()
        .read_to_string(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("Unreadable form body: {e}")))?;
    Ok(parse_pairs(&body))
}
