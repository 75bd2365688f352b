use crate::error::LoadError;
use crate::model::Requirement;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Reads a requirements file from disk.
///
/// # Errors
///
/// Returns [`LoadError::FileRead`] if the file cannot be read, and the errors
/// of [`parse_requirements`] otherwise.
pub fn load_requirements<P: AsRef<Path>>(path: P) -> Result<Vec<Requirement>, LoadError> {
    let content = super::read_file(path.as_ref())?;
    parse_requirements(&content)
}

/// Parses a requirements file: a JSON array of
/// `{ "IFCEntity": .., "PropertySet": .., "Property": .. }` objects.
///
/// Entries with missing or non-string fields are kept with those fields
/// empty; an entry that is not an object is kept with every field empty.
///
/// # Errors
///
/// Returns [`LoadError::Json`] for malformed JSON and
/// [`LoadError::InvalidShape`] when the top level is not an array.
pub fn parse_requirements(json: &str) -> Result<Vec<Requirement>, LoadError> {
    let Value::Array(entries) = serde_json::from_str::<Value>(json)? else {
        return Err(LoadError::InvalidShape {
            what: "requirements",
            message: "expected a JSON array".to_string(),
        });
    };

    let requirements: Vec<Requirement> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            Requirement::deserialize(entry).unwrap_or_else(|err| {
                tracing::debug!(index, %err, "Requirement entry is not an object");
                Requirement::default()
            })
        })
        .collect();
    tracing::info!(requirements = requirements.len(), "Loaded requirements");
    Ok(requirements)
}
