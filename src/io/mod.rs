/// CSV and JSON export of calculation results.
pub mod export;
/// Load-profile CSV import and export.
pub mod load_csv;
