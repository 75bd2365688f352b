pub mod graph;
pub mod requirements;

pub use crate::error::LoadError;
pub use graph::{load_property_graph, parse_property_graph, PropertyGraph};
pub use requirements::{load_requirements, parse_requirements};

use std::path::Path;

fn read_file(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}
