
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use super::error::*;

pub use serde::{Deserialize, Serialize};
pub use serde::de::DeserializeOwned;

///
/// Reads and parses a TOML document from the given path.
///
pub fn from_toml_file<T: DeserializeOwned> (path: impl AsRef<Path>) -> Result<T>
{
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read '{}'.", path.display()))?;
    let value = toml::from_str(& text).with_context(|| format!("Failed to parse '{}' as TOML.", path.display()))?;

    Ok(value)
}

///
/// Reads and parses a JSON document from the given path.
///
pub fn from_json_file<T: DeserializeOwned> (path: impl AsRef<Path>) -> Result<T>
{
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read '{}'.", path.display()))?;
    let value = serde_json::from_str(& text).with_context(|| format!("Failed to parse '{}' as JSON.", path.display()))?;

    Ok(value)
}

///
/// Writes a value as pretty JSON, creating parent directories as needed.
///
pub fn to_json_file<T: Serialize> (value: & T, path: impl AsRef<Path>) -> Result<()>
{
    let path = path.as_ref();
    if let Some(parent) = path.parent()
    {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create '{}'.", parent.display()))?;
    }

    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text).with_context(|| format!("Failed to write '{}'.", path.display()))?;

    Ok(())
}

///
/// Appends one compact JSON record as a line to the given file.
///
pub fn append_json_line<T: Serialize> (value: & T, path: impl AsRef<Path>) -> Result<()>
{
    let path = path.as_ref();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open '{}' for appending.", path.display()))?;

    let line = serde_json::to_string(value)?;
    writeln!(file, "{}", line)?;

    Ok(())
}
