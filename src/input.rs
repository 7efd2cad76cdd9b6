use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::Profile;

/// Read a plan from `path`, or from stdin when `path` is `-`.
pub fn read_plan(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| io_error(path, source))?;
        return Ok(text);
    }
    std::fs::read_to_string(path).map_err(|source| io_error(path, source))
}

/// Profile JSON as produced by the intake form.
pub fn load_profile(path: &Path) -> Result<Profile> {
    let raw = std::fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    Ok(serde_json::from_str(&raw)?)
}

fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: PathBuf::from(path),
        source,
    }
}
