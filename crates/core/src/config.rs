use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding [`Settings::tool_path`].
pub const TOOL_PATH_ENV: &str = "CODEHEALTH_TOOL";

const DEFAULT_TOOL: &str = "cs";

const DEFAULT_EXTENSIONS: &[&str] = &[
    "c", "cc", "cpp", "cs", "cxx", "dart", "erl", "ex", "exs", "go", "groovy", "h", "hh", "hpp",
    "java", "js", "jsx", "kt", "m", "mjs", "php", "py", "rb", "rs", "scala", "swift", "ts", "tsx",
    "vue",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Analysis tool executable.
    pub tool_path: PathBuf,
    /// Arguments placed before the `check` subcommand.
    pub tool_args: Vec<String>,
    /// File extensions to analyze; empty means every file.
    pub supported_extensions: Vec<String>,
    /// Filter used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tool_path: PathBuf::from(DEFAULT_TOOL),
            tool_args: Vec::new(),
            supported_extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            log_filter: None,
        }
    }
}

impl Settings {
    /// Reads settings from a JSON file; missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Applies overrides from the environment.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(tool) = std::env::var_os(TOOL_PATH_ENV).filter(|v| !v.is_empty()) {
            self.tool_path = PathBuf::from(tool);
        }
        self
    }

    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Whether documents at `path` should be analyzed.
    pub fn supports(&self, path: &Path) -> bool {
        if self.supported_extensions.is_empty() {
            return true;
        }
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        self.supported_extensions
            .iter()
            .any(|supported| supported.eq_ignore_ascii_case(ext))
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or("info")
    }
}
