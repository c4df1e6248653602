pub mod dashboard;
pub mod differences;
pub mod duplicates;

pub use dashboard::{dashboard_page, Comparison, DashboardVm};
pub use differences::differences_page;
pub use duplicates::duplicates_page;
