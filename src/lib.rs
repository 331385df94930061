//! csvseam — stitches windowed time-series CSV exports into continuous,
//! deduplicated datasets.
//!
//! Pipeline: [`scan`] finds CSV files and parses their naming convention,
//! [`group`] partitions them by metric identity, [`merge`] unions schemas and
//! resolves timestamp collisions, [`export`] hands the result to whatever
//! wants to chart it.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod group;
pub mod load;
pub mod merge;
pub mod pattern;
pub mod report;
pub mod scan;
pub mod stats;
pub mod table;
