use crate::db::listings::count_listings;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{apartment, body_string, get, request, test_state};
use astra::Body;
use http::{Method, Request};

fn form_post(body: &str) -> astra::Request {
    Request::builder()
        .method(Method::POST)
        .uri("/populate")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[test]
fn populate_tops_up_and_redirects() {
    let state = test_state(&[]);

    let resp = handle(request(Method::POST, "/populate?count=40"), &state).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(
        resp.headers().get("Location").unwrap().to_str().unwrap(),
        "/"
    );

    let stored = count_listings(&state.db).unwrap();
    assert!(stored > 0 && stored <= 40, "stored {stored}");
}

#[test]
fn populate_reads_the_form_body() {
    let state = test_state(&[]);
    let resp = handle(form_post("count=25&mode=enhanced"), &state).unwrap();
    assert_eq!(resp.status(), 302);

    let stored = count_listings(&state.db).unwrap();
    assert!(stored > 0 && stored <= 25, "stored {stored}");
}

#[test]
fn curated_mode_fills_the_mismatch_view() {
    let state = test_state(&[]);
    let resp = handle(form_post("count=12&mode=curated"), &state).unwrap();
    assert_eq!(resp.status(), 302);

    let stored = count_listings(&state.db).unwrap();
    assert!(stored > 0 && stored <= 12, "stored {stored}");

    let body = body_string(get(&state, "/differences"));
    assert!(body.contains("Only on seloger (0)"));
    assert!(body.contains("Only on leboncoin (0)"));
    assert!(!body.contains("Every matched pair agrees"));
}

#[test]
fn unknown_seed_mode_is_refused() {
    let state = test_state(&[]);
    let err = handle(form_post("count=10&mode=fuzzy"), &state).unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));
    assert_eq!(count_listings(&state.db).unwrap(), 0);
}

#[test]
fn populate_leaves_a_full_store_alone() {
    let state = test_state(&[apartment("a1", "seloger"), apartment("b1", "leboncoin")]);
    handle(request(Method::POST, "/populate?count=2"), &state).unwrap();
    assert_eq!(count_listings(&state.db).unwrap(), 2);
}

#[test]
fn populate_rejects_bad_counts() {
    let state = test_state(&[]);
    for uri in ["/populate?count=0", "/populate?count=10001", "/populate?count=lots"] {
        let err = handle(request(Method::POST, uri), &state).unwrap_err();
        assert!(matches!(err, ServerError::BadRequest(_)), "{uri}");
    }
    assert_eq!(count_listings(&state.db).unwrap(), 0);
}
