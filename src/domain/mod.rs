pub mod diff_result;
pub mod error;
pub mod fingerprint;
pub mod ports;
pub mod report;
pub mod summary;
pub mod table;
pub mod value_objects;
pub mod verdict;
