//! File collaborators: input loader and JSON writer.

use std::fs;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::hashing::sorted_pretty_json;
use crate::input::RawInput;
use crate::pipeline::PipelineError;

/// Read a raw input mapping from a JSON file.
pub fn load_input(path: &Path) -> Result<RawInput, PipelineError> {
    let content = fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(RawInput::from_json_str(&content)?)
}

/// Write any serializable value as sorted, indented JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PipelineError> {
    let mut content = sorted_pretty_json(value)?;
    content.push('\n');
    fs::write(path, content).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("wrote {}", path.display());
    Ok(())
}
