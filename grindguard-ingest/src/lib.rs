//! grindguard-ingest: curated-sheet and enrichment-metadata CSV parsing.

pub mod metadata;
pub mod sheet;

pub use metadata::{apply_metadata, parse_metadata, parse_metadata_file};
pub use sheet::{parse_sheet, parse_sheet_file};
