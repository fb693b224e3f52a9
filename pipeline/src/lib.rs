#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

//! Batch pipeline matching committee proceeding videos to Congress.gov
//! events.
//!
//! The pipeline is a sequence of standalone jobs over JSON files on disk:
//! `fetch-events` collects committee meetings from Congress.gov,
//! `fetch-videos` collects channel videos, `match` pairs them with the
//! `gm-match` core (optionally adjudicating ambiguous cases through
//! `gm-llm`), and `export` flattens the report to CSV.

pub mod config;
pub mod congress;
pub mod progress;
pub mod report;
pub mod runner;
pub mod youtube;
