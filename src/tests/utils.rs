use crate::db::listings::upsert_listings;
use crate::db::{init_db, Database};
use crate::domain::{AgencyOrPrivate, Listing, ListingType, SourcePair};
use crate::router::{handle, AppState};
use astra::{Body, Response};
use http::{Method, Request};
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Fresh SQLite file per call, initialized with the production schema.
pub fn init_test_db() -> Database {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let n = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
    let db = Database::new(std::env::temp_dir().join(format!("router_test_{nanos}_{n}.sqlite")));

    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    db
}

pub fn test_state(listings: &[Listing]) -> AppState {
    let db = init_test_db();
    upsert_listings(&db, listings).expect("Failed to seed listings");
    AppState {
        db,
        sources: SourcePair::default(),
    }
}

pub fn apartment(id: &str, source: &str) -> Listing {
    Listing {
        title: Some("Appartement 3 pièces lumineux".to_string()),
        url: Some(format!("https://example.com/{source}/{id}")),
        city: Some("Paris".to_string()),
        postal_code: Some("75011".to_string()),
        listing_type: Some(ListingType::Rent),
        property_type: Some("apartment".to_string()),
        rooms: Some(3),
        surface: Some(68.0),
        price: Some(1450),
        agency_or_private: Some(AgencyOrPrivate::Agency),
        ..Listing::new(id, source)
    }
}

pub fn request(method: Method, uri: &str) -> astra::Request {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn get(state: &AppState, uri: &str) -> Response {
    handle(request(Method::GET, uri), state).expect("Handler failed")
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn body_bytes(resp: Response) -> Vec<u8> {
    let mut bytes = Vec::new();
    resp.into_body().reader().read_to_end(&mut bytes).unwrap();
    bytes
}
