use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | Listing Explorer" }
                style {
                    "body { font-family: system-ui, sans-serif; margin: 0; color: #1f2937; }"
                    "main.container { max-width: 1600px; margin: 0 auto; padding: 1rem; }"
                    ".card { border: 1px solid #e5e7eb; border-radius: 8px; padding: 1rem; margin-bottom: 1.5rem; }"
                    ".stats { display: flex; flex-wrap: wrap; gap: 1rem; }"
                    ".stat { min-width: 140px; }"
                    ".stat strong { display: block; font-size: 1.6rem; }"
                    "table { width: 100%; border-collapse: collapse; font-size: 0.9rem; }"
                    "th { text-align: left; padding: 8px; border-bottom: 2px solid #e5e7eb; }"
                    "td { padding: 6px 8px; border-bottom: 1px solid #f3f4f6; }"
                    ".diff { color: #b91c1c; }"
                    ".filters { display: flex; flex-wrap: wrap; gap: 1rem; align-items: flex-end; }"
                    ".filters label { display: flex; flex-direction: column; font-size: 0.85rem; }"
                }
            }
            body {
              header style="display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 1.5rem; box-shadow: 0 1px 3px rgba(0,0,0,.1);" {
                  h3 { "Listing Explorer" }
                  nav {
                      a href="/" style="margin-right: 1rem;" { "Overview" }
                      a href="/duplicates" style="margin-right: 1rem;" { "Duplicates" }
                      a href="/differences" { "Differences" }
                  }
              }
                (content)
            }
        }
    }
}
