use crate::cli::run;

pub mod cli;
mod config;
pub mod domain;
pub mod export;
pub mod http;
pub mod schedule;
pub mod source;

fn main() -> anyhow::Result<()> {
    run()
}
