//! Shared types, error model, and configuration for chapterdoc.
//!
//! This crate is the foundation depended on by all other chapterdoc crates.
//! It provides:
//! - [`ChapterdocError`] — the unified error type
//! - Domain types ([`DocSection`], [`ChapterMap`], [`ProjectMeta`])
//! - Configuration ([`DocConfig`], config loading and project metadata)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    CONFIG_FILE_NAME, DocConfig, InputConfig, OutputConfig, ProjectConfig, config_file_path,
    init_config, load_config, load_config_from, load_project_meta,
};
pub use error::{ChapterdocError, Result};
pub use types::{ChapterMap, DocSection, OVERVIEW_CHAPTER, ProjectMeta};
