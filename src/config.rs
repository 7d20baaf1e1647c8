use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::collect::{
    LibraryApi,
    bindings::{DEFINE_MESSAGES_NAME, FORMAT_FUNCTION_NAMES, LIBRARY_NAME},
};

pub const CONFIG_FILE_NAME: &str = ".intlrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_library")]
    pub library: String,
    #[serde(default = "default_define_messages")]
    pub define_messages: String,
    #[serde(default = "default_format_functions")]
    pub format_functions: Vec<String>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
}

fn default_library() -> String {
    LIBRARY_NAME.to_string()
}

fn default_define_messages() -> String {
    DEFINE_MESSAGES_NAME.to_string()
}

fn default_format_functions() -> Vec<String> {
    FORMAT_FUNCTION_NAMES.iter().map(|s| s.to_string()).collect()
}

fn default_extensions() -> Vec<String> {
    ["svelte", "html"].map(String::from).to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            library: default_library(),
            define_messages: default_define_messages(),
            format_functions: default_format_functions(),
            extensions: default_extensions(),
            ignores: Vec::new(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error for invalid `ignores` globs or an unusable library API.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        if self.library.trim().is_empty() {
            bail!("'library' must not be empty");
        }
        if self.format_functions.is_empty() {
            bail!("'formatFunctions' must list at least one function name");
        }

        Ok(())
    }

    /// The translation library surface to look for.
    pub fn library_api(&self) -> LibraryApi {
        LibraryApi {
            module: self.library.clone(),
            define_messages: self.define_messages.clone(),
            format_functions: self.format_functions.iter().cloned().collect::<HashSet<_>>(),
        }
    }

    /// Whether a path has one of the configured extensions (case-insensitive).
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
