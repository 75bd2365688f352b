//! Error types for IFC Checker.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading a property graph or a requirements file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read the input file from disk.
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The input is not valid JSON.
    #[error("invalid JSON: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// The JSON is valid but does not have the expected shape.
    #[error("invalid {what}: {message}")]
    InvalidShape { what: &'static str, message: String },
}

/// Errors raised while narrowing the check to a building storey.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// No `IFCBUILDINGSTOREY` has this decoded name.
    #[error("storey '{name}' not found")]
    StoreyNotFound { name: String },

    /// More than one storey has this decoded name.
    #[error("storey name '{name}' is ambiguous (ids {ids:?})")]
    AmbiguousStoreyName { name: String, ids: Vec<u64> },
}

/// A check was requested before its inputs were loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("no model loaded")]
    NoModelLoaded,

    #[error("no requirements loaded")]
    NoRequirementsLoaded,
}

/// Problems in the data itself. These are recovered where they occur and never
/// abort a check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// A relation points at an id that is not in the graph.
    #[error("#{from} references missing element #{missing}")]
    MissingReference { from: u64, missing: u64 },

    /// A requirement entry lacks one of its fields.
    #[error("requirement #{index} is missing '{field}'")]
    MalformedRequirement { index: usize, field: &'static str },
}

/// Errors that abort a check pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Scope(#[from] ScopeError),
}

/// Errors that can occur when exporting data.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write data to the file.
    #[error("failed to write data: {message}")]
    WriteError { message: String },

    /// Failed to serialize data to JSON.
    #[error("JSON serialization failed: {source}")]
    JsonSerialize {
        #[from]
        source: serde_json::Error,
    },

    /// Failed to write CSV data.
    #[error("CSV write failed: {source}")]
    CsvWrite {
        #[from]
        source: csv::Error,
    },
}
