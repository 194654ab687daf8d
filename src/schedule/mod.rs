//! Turns a track list into a timed, colored playlist schedule

pub mod assemble;
pub mod color;
pub mod error;
pub mod format;
pub mod operations;
pub mod request;
pub mod timing;
