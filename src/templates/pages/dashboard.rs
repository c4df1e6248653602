use crate::domain::{FilterOptions, Listing, ListingFilter};
use crate::templates::{card, desktop_layout, listings_table, stat};
use chrono::NaiveDateTime;
use maud::{html, Markup};

/// Rows shown in the dataset table; exports carry the full set.
const DATASET_PREVIEW: usize = 500;

/// Cross-source counts for the current selection.
pub struct Comparison {
    pub only_a: usize,
    pub only_b: usize,
    pub mismatches: usize,
    pub identical_pairs: usize,
}

pub struct DashboardVm<'a> {
    pub total: usize,
    pub filtered: usize,
    pub unique: usize,
    pub duplicate_groups: usize,
    pub source_a: String,
    pub source_b: String,
    /// `Err` carries the reason the two sources could not be compared.
    pub comparison: Result<Comparison, String>,
    /// Active filter criteria as (label, value) pairs.
    pub summary: Vec<(&'static str, String)>,
    pub filter: &'a ListingFilter,
    pub options: FilterOptions,
    /// Filtered listings, cheapest first.
    pub dataset: Vec<&'a Listing>,
    /// Current query string (without '?'), carried over to links.
    pub query: String,
    pub generated_at: NaiveDateTime,
}

fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

fn multi_select(label: &str, name: &str, options: &[String], selected: &[String]) -> Markup {
    html! {
        label {
            (label)
            select name=(name) multiple size="4" {
                @for choice in options {
                    option value=(choice) selected[selected.contains(choice)] { (choice) }
                }
            }
        }
    }
}

fn filter_form(vm: &DashboardVm<'_>) -> Markup {
    let f = vm.filter;
    let sources: Vec<String> = f.sources.iter().map(|s| s.to_string()).collect();
    let listing_types: Vec<String> = f.listing_types.iter().map(|t| t.to_string()).collect();
    let agency: Vec<String> = f.agency_or_private.iter().map(|a| a.to_string()).collect();

    html! {
        form action="/" method="get" class="filters" {
            (multi_select("Source", "source", &vm.options.sources, &sources))
            (multi_select("City", "city", &vm.options.cities, &f.cities))
            (multi_select("Listing type", "listing_type", &vm.options.listing_types, &listing_types))
            (multi_select("Agency/Private", "agency_or_private", &vm.options.agency_or_private, &agency))
            label {
                "Min price"
                input type="number" name="min_price" value=[f.min_price]
                    placeholder=[vm.options.min_price];
            }
            label {
                "Max price"
                input type="number" name="max_price" value=[f.max_price]
                    placeholder=[vm.options.max_price];
            }
            label {
                "Search title/description"
                input type="search" name="q" value=[f.query.as_deref()] placeholder="Type to search...";
            }
            button type="submit" { "Apply" }
            " "
            a href="/" { "Reset" }
        }
    }
}

pub fn dashboard_page(vm: &DashboardVm<'_>) -> Markup {
    desktop_layout(
        "Overview",
        html! {
            main class="container" {
                h1 { "Listings: " (vm.source_a) " vs " (vm.source_b) }

                (card("Filters", filter_form(vm)))

                (card("Dataset", html! {
                    div class="stats" {
                        (stat("total records", vm.total))
                        (stat("after filters", vm.filtered))
                        (stat("unique properties", vm.unique))
                        (stat("duplicate groups", vm.duplicate_groups))
                    }
                    @if vm.summary.is_empty() {
                        p { "No filters applied." }
                    } @else {
                        ul {
                            @for (label, value) in &vm.summary {
                                li { strong { (label) ": " } (value) }
                            }
                        }
                    }
                }))

                (card("Cross-source comparison", html! {
                    @match &vm.comparison {
                        Ok(c) => {
                            div class="stats" {
                                (stat(&format!("only on {}", vm.source_a), c.only_a))
                                (stat(&format!("only on {}", vm.source_b), c.only_b))
                                (stat("pairs with differences", c.mismatches))
                                (stat("identical pairs", c.identical_pairs))
                            }
                            p {
                                a href=(with_query("/differences", &vm.query)) { "See differences" }
                                " · "
                                a href=(with_query("/duplicates", &vm.query)) { "See duplicate groups" }
                            }
                        }
                        Err(reason) => {
                            p class="diff" { "Comparison unavailable: " (reason) }
                            p {
                                "Select only " (vm.source_a) " and " (vm.source_b)
                                " in the Source filter to compare them."
                            }
                        }
                    }
                }))

                (card("Exports", html! {
                    ul {
                        li { a href=(with_query("/export/differences.xlsx", &vm.query)) { "Differences (Excel, one sheet per view)" } }
                        li { a href=(with_query("/export/listings.xlsx", &vm.query)) { "Listings with duplicate flags (Excel)" } }
                    }
                }))

                (card(&format!("Listings ({}), by price", vm.dataset.len()), html! {
                    @if vm.dataset.len() > DATASET_PREVIEW {
                        p { "Showing the first " (DATASET_PREVIEW) " rows; the Excel export has all of them." }
                    }
                    (listings_table(&vm.dataset[..vm.dataset.len().min(DATASET_PREVIEW)]))
                }))

                (card("Sample data", html! {
                    form action="/populate" method="post" style="display: flex; gap: 10px; align-items: center;" {
                        label for="count" { "Top up to" }
                        input type="number" id="count" name="count" value="200" min="1" max="10000" style="width: 100px;";
                        select name="mode" {
                            option value="mock" { "random listings" }
                            option value="enhanced" { "with drifted duplicates" }
                            option value="curated" { "curated cross-site pairs" }
                        }
                        button type="submit" { "Generate" }
                    }
                }))

                p style="color: #6b7280; font-size: 0.8rem;" {
                    "Generated " (vm.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()) " UTC"
                }
            }
        },
    )
}
