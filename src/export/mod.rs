//! Presentation of a schedule: CSV export and terminal table

pub mod records;
pub mod table;
