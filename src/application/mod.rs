pub mod classify;
pub mod compare;
pub mod diff;
pub mod monitoring;
pub mod summary;
