//! Project configuration for chapterdoc.
//!
//! The optional config lives at `<project>/chapterdoc.toml`. Every field has a
//! default, so a project without the file generates with the stock layout.
//! Project metadata (name, description) comes from a separate JSON manifest.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ChapterdocError, Result};
use crate::types::ProjectMeta;

/// Config file name looked up at the project root.
pub const CONFIG_FILE_NAME: &str = "chapterdoc.toml";

// ---------------------------------------------------------------------------
// Config structs (matching chapterdoc.toml schema)
// ---------------------------------------------------------------------------

/// Top-level project config, deserialized from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocConfig {
    /// Where annotated test files are read from.
    #[serde(default)]
    pub input: InputConfig,

    /// Where generated documents are written.
    #[serde(default)]
    pub output: OutputConfig,

    /// Project metadata lookup and fallbacks.
    #[serde(default)]
    pub project: ProjectConfig,
}

/// `[input]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory (relative to the project root) scanned for test files.
    #[serde(default = "default_input_dir")]
    pub dir: String,

    /// File name suffix a test file must end with.
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: default_input_dir(),
            suffix: default_suffix(),
        }
    }
}

fn default_input_dir() -> String {
    "test".into()
}
fn default_suffix() -> String {
    ".test.ts".into()
}

/// `[output]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Overview document, relative to the project root.
    #[serde(default = "default_overview")]
    pub overview: String,

    /// Directory for chapter pages and the index.
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,

    /// Index file name inside `docs_dir`.
    #[serde(default = "default_index")]
    pub index: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            overview: default_overview(),
            docs_dir: default_docs_dir(),
            index: default_index(),
        }
    }
}

fn default_overview() -> String {
    "README.md".into()
}
fn default_docs_dir() -> String {
    "docs".into()
}
fn default_index() -> String {
    "SUMMARY.md".into()
}

/// `[project]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// JSON manifest holding `name` and `description`.
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,

    /// Name used when the manifest has none.
    #[serde(default = "default_name")]
    pub default_name: String,

    /// Description used when the manifest has none.
    #[serde(default = "default_description")]
    pub default_description: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            metadata_file: default_metadata_file(),
            default_name: default_name(),
            default_description: default_description(),
        }
    }
}

fn default_metadata_file() -> String {
    "package.json".into()
}
fn default_name() -> String {
    "Project Documentation".into()
}
fn default_description() -> String {
    "Generated from annotated test suites.".into()
}

impl DocConfig {
    /// Reject values that would make the output layout ambiguous.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("input.dir", &self.input.dir),
            ("input.suffix", &self.input.suffix),
            ("output.overview", &self.output.overview),
            ("output.docs_dir", &self.output.docs_dir),
            ("output.index", &self.output.index),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ChapterdocError::config(format!("{key} must not be empty")));
            }
        }

        if self.output.index.contains(['/', '\\']) {
            return Err(ChapterdocError::config(format!(
                "output.index must be a bare file name, got '{}'",
                self.output.index
            )));
        }

        // Cross links between the documents are computed from these paths, so
        // they must stay inside the project root.
        let layout = [
            ("output.overview", &self.output.overview),
            ("output.docs_dir", &self.output.docs_dir),
        ];
        for (key, value) in layout {
            let escapes = Path::new(value).components().any(|c| {
                matches!(
                    c,
                    Component::ParentDir | Component::RootDir | Component::Prefix(_)
                )
            });
            if escapes {
                return Err(ChapterdocError::config(format!(
                    "{key} must be a path inside the project root, got '{value}'"
                )));
            }
        }

        if normal_parts(Path::new(&self.output.overview)).is_empty() {
            return Err(ChapterdocError::config(format!(
                "output.overview must name a file, got '{}'",
                self.output.overview
            )));
        }

        Ok(())
    }

    /// Relative link from the index file back to the overview document.
    pub fn overview_href(&self) -> String {
        relative_link(
            Path::new(&self.output.docs_dir),
            Path::new(&self.output.overview),
        )
    }

    /// Relative link from the overview document to the index file.
    pub fn index_href(&self) -> String {
        let overview_dir = Path::new(&self.output.overview)
            .parent()
            .unwrap_or(Path::new(""));
        let index = Path::new(&self.output.docs_dir).join(&self.output.index);
        relative_link(overview_dir, &index)
    }
}

fn normal_parts(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// `/`-separated link to `to` from a document in `from_dir`, both relative to
/// the project root.
fn relative_link(from_dir: &Path, to: &Path) -> String {
    let from = normal_parts(from_dir);
    let to = normal_parts(to);
    let shared = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts = vec![String::from(".."); from.len() - shared];
    parts.extend_from_slice(&to[shared..]);
    parts.join("/")
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config file for a project root.
pub fn config_file_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_FILE_NAME)
}

/// Load the project config. Returns defaults if the file does not exist.
pub fn load_config(project_root: &Path) -> Result<DocConfig> {
    let path = config_file_path(project_root);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(DocConfig::default());
    }

    load_config_from(&path)
}

/// Load and validate the config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<DocConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ChapterdocError::io(path, e))?;

    let config: DocConfig = toml::from_str(&content).map_err(|e| {
        ChapterdocError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;

    Ok(config)
}

/// Write a default config file into the project root.
/// Returns the path to the created file.
pub fn init_config(project_root: &Path) -> Result<PathBuf> {
    let path = config_file_path(project_root);
    if path.exists() {
        return Err(ChapterdocError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&DocConfig::default())
        .map_err(|e| ChapterdocError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ChapterdocError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

// ---------------------------------------------------------------------------
// Project metadata
// ---------------------------------------------------------------------------

/// Resolve the project name and description.
///
/// Never fails: a missing, unreadable, or malformed manifest falls back to the
/// configured defaults, field by field.
pub fn load_project_meta(project_root: &Path, config: &DocConfig) -> ProjectMeta {
    let mut meta = ProjectMeta {
        name: config.project.default_name.clone(),
        description: config.project.default_description.clone(),
    };

    let path = project_root.join(&config.project.metadata_file);
    if !path.exists() {
        tracing::debug!(?path, "metadata file not found, using defaults");
        return meta;
    }

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(?path, error = %e, "cannot read metadata file, using defaults");
            return meta;
        }
    };

    let value: serde_json::Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(?path, error = %e, "invalid metadata JSON, using defaults");
            return meta;
        }
    };

    if let Some(name) = non_empty_str(&value, "name") {
        meta.name = name;
    }
    if let Some(description) = non_empty_str(&value, "description") {
        meta.description = description;
    }

    meta
}

fn non_empty_str(value: &serde_json::Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
