use crate::domain::{DedupEntry, DiffResult};
use crate::errors::ServerError;
use crate::spreadsheets::table::{dedup_table, diff_tables, Cell, Table};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::collections::HashSet;

// Excel refuses longer names and these characters.
const MAX_SHEET_NAME: usize = 31;
const FORBIDDEN_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

fn sheet_name(name: &str) -> String {
    name.chars()
        .map(|c| if FORBIDDEN_SHEET_CHARS.contains(&c) { '_' } else { c })
        .take(MAX_SHEET_NAME)
        .collect()
}

/// Excel compares sheet names case-insensitively. A clash after truncation
/// gets a `~2`, `~3`... suffix within the length limit.
fn unique_sheet_name(name: &str, taken: &mut HashSet<String>) -> String {
    let base = sheet_name(name);
    let mut candidate = base.clone();
    let mut n = 2;

    while taken.contains(&candidate.to_lowercase()) {
        let suffix = format!("~{n}");
        let keep = MAX_SHEET_NAME - suffix.chars().count();
        candidate = base.chars().take(keep).chain(suffix.chars()).collect();
        n += 1;
    }

    taken.insert(candidate.to_lowercase());
    candidate
}

fn write_table(worksheet: &mut Worksheet, name: String, table: &Table) -> Result<(), ServerError> {
    let bold = Format::new().set_bold();
    worksheet.set_name(name)?;

    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &bold)?;
    }

    for (i, row) in table.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let c = col as u16;
            match cell {
                Cell::Text(s) => {
                    worksheet.write_string(r, c, s)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(r, c, *n)?;
                }
                // Absent values stay blank cells.
                Cell::Empty => {}
            }
        }
    }

    Ok(())
}

fn workbook_from(tables: &[Table]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let mut taken = HashSet::new();
    for table in tables {
        let name = unique_sheet_name(&table.name, &mut taken);
        let worksheet = workbook.add_worksheet();
        write_table(worksheet, name, table)?;
    }
    Ok(workbook.save_to_buffer()?)
}

/// One sheet per collection: `only_<A>`, `only_<B>`, `mismatches`.
pub fn diff_workbook(diff: &DiffResult<'_>) -> Result<Vec<u8>, ServerError> {
    workbook_from(&diff_tables(diff))
}

/// Every listing with its fingerprint and `is_duplicate` flag.
pub fn listings_workbook(entries: &[DedupEntry<'_>]) -> Result<Vec<u8>, ServerError> {
    workbook_from(&[dedup_table(entries)])
}
