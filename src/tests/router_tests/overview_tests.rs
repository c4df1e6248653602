use crate::domain::{Listing, ListingType};
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{apartment, body_string, get, request, test_state};
use http::Method;

/// One identical pair, one pair differing on postal code, one seloger-only row.
fn dataset() -> Vec<Listing> {
    let lyon = |id: &str, source: &str, postal: &str| Listing {
        city: Some("Lyon".to_string()),
        postal_code: Some(postal.to_string()),
        ..apartment(id, source)
    };
    let house = Listing {
        title: Some("Maison avec jardin".to_string()),
        city: Some("Bordeaux".to_string()),
        listing_type: Some(ListingType::Sale),
        price: Some(420_000),
        ..apartment("a3", "seloger")
    };

    vec![
        apartment("a1", "seloger"),
        apartment("b1", "leboncoin"),
        lyon("a2", "seloger", "69001"),
        lyon("b2", "leboncoin", "69003"),
        house,
    ]
}

#[test]
fn overview_summarises_the_store() {
    let state = test_state(&dataset());
    let resp = get(&state, "/");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("seloger vs leboncoin"));
    assert!(body.contains("<strong>5</strong><span>total records</span>"));
    assert!(body.contains("<strong>3</strong><span>unique properties</span>"));
    assert!(body.contains("<strong>2</strong><span>duplicate groups</span>"));
    assert!(body.contains("<strong>1</strong><span>only on seloger</span>"));
    assert!(body.contains("<strong>0</strong><span>only on leboncoin</span>"));
    assert!(body.contains("<strong>1</strong><span>pairs with differences</span>"));
    assert!(body.contains("<strong>1</strong><span>identical pairs</span>"));
    assert!(body.contains("No filters applied."));
}

#[test]
fn overview_applies_filters_and_keeps_them_in_links() {
    let state = test_state(&dataset());
    let body = body_string(get(&state, "/?city=Lyon"));

    assert!(body.contains("<strong>5</strong><span>total records</span>"));
    assert!(body.contains("<strong>2</strong><span>after filters</span>"));
    assert!(body.contains("<strong>0</strong><span>only on seloger</span>"));
    assert!(body.contains("Cities"));
    assert!(body.contains("/differences?city=Lyon"));
}

#[test]
fn malformed_filter_is_a_bad_request() {
    let state = test_state(&dataset());
    let err = handle(request(Method::GET, "/?min_price=cheap"), &state).unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));
    assert_eq!(err.status(), 400);
}

#[test]
fn overview_offers_filter_controls_from_stored_values() {
    let state = test_state(&dataset());
    let body = body_string(get(&state, "/?source=seloger"));

    assert!(body.contains(r#"<form action="/" method="get""#));
    for name in ["source", "city", "listing_type", "agency_or_private"] {
        assert!(body.contains(&format!(r#"<select name="{name}" multiple"#)), "{name}");
    }
    for name in ["min_price", "max_price", "q"] {
        assert!(body.contains(&format!(r#"name="{name}""#)), "{name}");
    }

    assert!(body.contains(r#"<option value="Bordeaux">Bordeaux</option>"#));
    assert!(body.contains(r#"<option value="seloger" selected>seloger</option>"#));
    assert!(body.contains(r#"<option value="leboncoin">leboncoin</option>"#));
    assert!(body.contains(r#"<option value="sale">sale</option>"#));
}

#[test]
fn overview_lists_rows_cheapest_first_missing_price_last() {
    let unpriced = Listing {
        title: Some("Loft sans prix".to_string()),
        price: None,
        ..apartment("a1", "seloger")
    };
    let dear = Listing {
        title: Some("Duplex terrasse".to_string()),
        price: Some(2400),
        ..apartment("a2", "seloger")
    };
    let cheap = Listing {
        title: Some("Studio calme".to_string()),
        price: Some(700),
        ..apartment("b1", "leboncoin")
    };
    let state = test_state(&[unpriced, dear, cheap]);
    let body = body_string(get(&state, "/"));

    let at = |title: &str| body.find(title).unwrap_or_else(|| panic!("{title} missing"));
    assert!(at("Studio calme") < at("Duplex terrasse"));
    assert!(at("Duplex terrasse") < at("Loft sans prix"));
    assert!(body.contains("Listings (3), by price"));
}

#[test]
fn repeated_source_keys_narrow_a_third_source_away() {
    let mut rows = dataset();
    rows.push(apartment("c1", "pap"));
    let state = test_state(&rows);

    // The page still renders, with the comparison disabled.
    let body = body_string(get(&state, "/"));
    assert!(body.contains("Comparison unavailable"));
    assert!(body.contains(r#"<option value="pap">pap</option>"#));

    // What the Source multi-select submits.
    let body = body_string(get(&state, "/?source=seloger&source=leboncoin"));
    assert!(!body.contains("Comparison unavailable"));
    assert!(body.contains("<strong>5</strong><span>after filters</span>"));
    assert!(body.contains("<strong>1</strong><span>pairs with differences</span>"));
}

#[test]
fn empty_store_renders() {
    let state = test_state(&[]);
    let body = body_string(get(&state, "/"));
    assert!(body.contains("<strong>0</strong><span>total records</span>"));
}

#[test]
fn duplicates_page_lists_each_group() {
    let state = test_state(&dataset());
    let resp = get(&state, "/duplicates");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Duplicate groups"));
    assert_eq!(body.matches("(2 listings)").count(), 2);
    assert!(!body.contains("Maison avec jardin"));
}

#[test]
fn differences_page_shows_the_differing_field() {
    let state = test_state(&dataset());
    let resp = get(&state, "/differences");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Differences between seloger and leboncoin"));
    assert!(body.contains("Only on seloger (1)"));
    assert!(body.contains("Only on leboncoin (0)"));
    assert!(body.contains("Field differences (1 pairs)"));
    assert!(body.contains("postal_code"));
    assert!(body.contains("69001 → 69003"));
    assert!(body.contains("Maison avec jardin"));
}

#[test]
fn a_third_source_is_rejected_not_dropped() {
    let mut rows = dataset();
    rows.push(apartment("c1", "pap"));
    let state = test_state(&rows);

    let err = handle(request(Method::GET, "/differences"), &state).unwrap_err();
    assert!(matches!(err, ServerError::Reconcile(_)));
    assert_eq!(err.status(), 422);
}

#[test]
fn filtering_out_the_third_source_makes_it_comparable() {
    let mut rows = dataset();
    rows.push(apartment("c1", "pap"));
    let state = test_state(&rows);

    let resp = get(&state, "/differences?source=seloger,leboncoin");
    assert_eq!(resp.status(), 200);
}

#[test]
fn unknown_paths_are_not_found() {
    let state = test_state(&[]);
    let err = handle(request(Method::GET, "/admin"), &state).unwrap_err();
    assert!(matches!(err, ServerError::NotFound));

    // Populate only answers to POST.
    let err = handle(request(Method::GET, "/populate"), &state).unwrap_err();
    assert!(matches!(err, ServerError::NotFound));
}
