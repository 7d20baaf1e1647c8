use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::core::Dictionary;

/// Output file for the extracted message dictionary.
pub struct JsonWriter {
    file_path: PathBuf,
}

impl JsonWriter {
    pub fn new(path: &Path) -> Self {
        Self {
            file_path: path.to_path_buf(),
        }
    }

    /// Read the dictionary already stored at the output path.
    ///
    /// Returns an empty dictionary when the file does not exist yet.
    pub fn read_existing(&self) -> Result<Dictionary> {
        if !self.file_path.exists() {
            return Ok(Dictionary::new());
        }

        let content = fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read file: {}", self.file_path.display()))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON: {}", self.file_path.display()))?;
        match value {
            Value::Object(map) => Ok(map),
            _ => bail!(
                "Root of JSON file must be an object: {}",
                self.file_path.display()
            ),
        }
    }

    /// Save the dictionary with pretty formatting.
    ///
    /// Uses 2-space indentation and adds a trailing newline.
    pub fn save(&self, dictionary: &Dictionary) -> Result<()> {
        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(&self.file_path, format!("{}\n", to_pretty_json(dictionary)?))
            .with_context(|| format!("Failed to write file: {}", self.file_path.display()))?;

        Ok(())
    }
}

/// Render a dictionary as 2-space-indented JSON.
pub fn to_pretty_json(dictionary: &Dictionary) -> Result<String> {
    serde_json::to_string_pretty(dictionary).context("Failed to serialize JSON")
}
