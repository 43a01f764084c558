pub mod config;
pub mod csv_source;
