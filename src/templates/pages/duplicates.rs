use crate::domain::DuplicateGroup;
use crate::templates::{desktop_layout, listings_table};
use maud::{html, Markup};

pub fn duplicates_page(groups: &[DuplicateGroup<'_>], unique: usize, total: usize) -> Markup {
    desktop_layout(
        "Duplicates",
        html! {
            main class="container" {
                h1 { "Duplicate groups" }
                p {
                    "Found " strong { (groups.len()) } " groups. "
                    "Keeping the first listing of each leaves " strong { (unique) }
                    " unique properties out of " (total) "."
                }

                @for group in groups {
                    section class="card" {
                        h3 {
                            "Group " code { (group.fingerprint.short()) } "… "
                            "(" (group.members.len()) " listings)"
                        }
                        (listings_table(&group.members))
                    }
                }
            }
        },
    )
}
