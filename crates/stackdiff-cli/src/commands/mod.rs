pub mod diff;
pub mod records;
