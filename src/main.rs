use crate::cli::run;

pub mod analysis;
pub mod cli;
mod config;
pub mod domain;
pub mod http;
pub mod ingest;

fn main() {
    run();
}
