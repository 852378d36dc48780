// src/importers/mod.rs

pub mod csv;

pub use csv::{CsvImporter, CsvImportError};
