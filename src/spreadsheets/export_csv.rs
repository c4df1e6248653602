use crate::domain::DiffResult;
use crate::errors::ServerError;
use crate::spreadsheets::table::{diff_tables, Table};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

fn write_table(path: &Path, table: &Table) -> Result<(), ServerError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| cell.render()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `only_<A>.csv`, `only_<B>.csv` and `mismatches.csv` into `dir`,
/// creating it if needed. Returns the written paths.
pub fn write_diff_csvs(dir: &Path, diff: &DiffResult<'_>) -> Result<Vec<PathBuf>, ServerError> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for table in diff_tables(diff) {
        let path = dir.join(format!("{}.csv", table.name));
        write_table(&path, &table)?;
        written.push(path);
    }

    info!("Wrote {} CSV files to {}", written.len(), dir.display());
    Ok(written)
}
