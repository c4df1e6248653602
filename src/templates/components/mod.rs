use crate::domain::Listing;
use maud::{html, Markup};

pub mod error;

pub use error::error_page;

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        section class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

pub fn stat(label: &str, value: impl maud::Render) -> Markup {
    html! {
        div class="stat" {
            strong { (value) }
            span { (label) }
        }
    }
}

fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_else(|| "—".to_string())
}

/// The columns the fingerprint is built from, plus the listing link.
pub fn listings_table(listings: &[&Listing]) -> Markup {
    html! {
        @if listings.is_empty() {
            p { "Nothing to show." }
        } @else {
            div style="overflow-x: auto;" {
                table {
                    thead {
                        tr {
                            th { "Source" }
                            th { "Title" }
                            th { "City" }
                            th { "Price" }
                            th { "Surface" }
                            th { "Rooms" }
                            th { "Link" }
                        }
                    }
                    tbody {
                        @for listing in listings {
                            tr {
                                td { (listing.source.as_str()) }
                                td { (opt(&listing.title)) }
                                td { (opt(&listing.city)) }
                                td { (opt(&listing.price)) }
                                td { (opt(&listing.surface)) }
                                td { (opt(&listing.rooms)) }
                                td {
                                    @if let Some(url) = &listing.url {
                                        a href=(url) target="_blank" rel="noopener" { "open" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
