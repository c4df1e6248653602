mod export_tests;
mod overview_tests;
mod populate_tests;
