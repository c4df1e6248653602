use crate::domain::{DiffResult, Mismatch};
use crate::templates::{card, desktop_layout, listings_table};
use maud::{html, Markup};

fn value(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or("—")
}

fn mismatch_row(m: &Mismatch<'_>) -> Markup {
    html! {
        tr {
            td { code { (m.fingerprint.short()) } }
            td { (m.left.title.as_deref().unwrap_or("—")) }
            td {
                @for d in &m.differing {
                    div {
                        strong { (d.field.name()) } ": "
                        span class="diff" { (value(&d.left)) " → " (value(&d.right)) }
                    }
                }
            }
            td {
                @if let Some(url) = &m.left.url { a href=(url) target="_blank" rel="noopener" { "A" } }
                " "
                @if let Some(url) = &m.right.url { a href=(url) target="_blank" rel="noopener" { "B" } }
            }
        }
    }
}

pub fn differences_page(diff: &DiffResult<'_>, export_href: &str) -> Markup {
    let (a, b) = (diff.pair.left.as_str(), diff.pair.right.as_str());

    desktop_layout(
        "Differences",
        html! {
            main class="container" {
                h1 { "Differences between " (a) " and " (b) }
                p { a href=(export_href) { "Download as Excel" } }

                (card(&format!("Only on {a} ({})", diff.only_in_a.len()), listings_table(&diff.only_in_a)))
                (card(&format!("Only on {b} ({})", diff.only_in_b.len()), listings_table(&diff.only_in_b)))

                (card(&format!("Field differences ({} pairs)", diff.mismatches.len()), html! {
                    @if diff.mismatches.is_empty() {
                        p { "Every matched pair agrees on all compared fields." }
                    } @else {
                        div style="overflow-x: auto;" {
                            table {
                                thead {
                                    tr {
                                        th { "Fingerprint" }
                                        th { "Title (" (a) ")" }
                                        th { (a) " → " (b) }
                                        th { "Links" }
                                    }
                                }
                                tbody {
                                    @for m in &diff.mismatches {
                                        (mismatch_row(m))
                                    }
                                }
                            }
                        }
                    }
                }))
            }
        },
    )
}
