//! Output writer.
//!
//! Takes rendered documents and writes them under the project root, replacing
//! whatever was there before.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use chapterdoc_shared::{ChapterdocError, Result};

/// A rendered document ready to be written.
#[derive(Debug, Clone)]
pub struct RenderedDoc {
    /// Path relative to the project root (e.g., `docs/encryption.md`).
    pub rel_path: PathBuf,
    /// Full Markdown content.
    pub content: String,
}

/// Metadata for one written document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenDoc {
    /// Path relative to the project root.
    pub rel_path: PathBuf,
    /// Hex SHA-256 of the written bytes.
    pub sha256: String,
    pub size_bytes: usize,
}

/// Write every document, creating parent directories as needed.
///
/// Each file is written to a temp sibling first and then renamed over the
/// target, so a reader never sees a half-written document.
#[instrument(skip_all, fields(root = %root.display(), doc_count = docs.len()))]
pub fn write_docs(root: &Path, docs: &[RenderedDoc]) -> Result<Vec<WrittenDoc>> {
    let mut written = Vec::with_capacity(docs.len());

    for doc in docs {
        written.push(write_doc(root, doc)?);
    }

    Ok(written)
}

fn write_doc(root: &Path, doc: &RenderedDoc) -> Result<WrittenDoc> {
    let target = root.join(&doc.rel_path);

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ChapterdocError::io(parent, e))?;
    }

    let file_name = target
        .file_name()
        .ok_or_else(|| {
            ChapterdocError::Render(format!("output path has no file name: {}", target.display()))
        })?
        .to_string_lossy()
        .into_owned();
    let temp = target.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, &doc.content).map_err(|e| ChapterdocError::io(&temp, e))?;
    std::fs::rename(&temp, &target).map_err(|e| ChapterdocError::io(&target, e))?;

    let sha256 = sha256_hex(doc.content.as_bytes());
    debug!(path = %doc.rel_path.display(), size = doc.content.len(), "wrote document");

    Ok(WrittenDoc {
        rel_path: doc.rel_path.clone(),
        sha256,
        size_bytes: doc.content.len(),
    })
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
