use crate::domain::Listing;
use crate::tests::utils::{apartment, body_bytes, get, test_state};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

fn rows() -> Vec<Listing> {
    let mut no_agency = apartment("b1", "leboncoin");
    no_agency.agency_or_private = None;
    vec![apartment("a1", "seloger"), no_agency, apartment("a2", "seloger")]
}

#[test]
fn differences_export_is_an_xlsx_attachment() {
    let state = test_state(&rows());
    let resp = get(&state, "/export/differences.xlsx");

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
        XLSX_MIME
    );
    assert!(resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("source_differences.xlsx"));

    let bytes = body_bytes(resp);
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn listings_export_honours_filters() {
    let state = test_state(&rows());
    let all = body_bytes(get(&state, "/export/listings.xlsx"));
    let none = body_bytes(get(&state, "/export/listings.xlsx?city=Nice"));

    assert!(all.starts_with(b"PK"));
    assert!(none.starts_with(b"PK"));
    assert_ne!(all.len(), none.len());
}
