pub mod export_csv;
pub mod export_xlsx;
pub mod table;

pub use export_csv::write_diff_csvs;
pub use export_xlsx::{diff_workbook, listings_workbook};
