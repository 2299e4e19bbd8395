//! Test-group scanning: one `DocSection` per `describe("...", function ()`.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use chapterdoc_shared::{ChapterdocError, DocSection, Result};

use crate::comment::locate_comment;
use crate::tags::extract_tags;

/// Matches a named test-group opener and captures its literal name.
static DESCRIBE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"describe\(['"](.*?)['"],\s*function\s*\(\)"#).expect("describe regex")
});

/// Read a test file and extract its documentation sections in file order.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn parse_file(path: &Path) -> Result<Vec<DocSection>> {
    let content = std::fs::read_to_string(path).map_err(|e| ChapterdocError::io(path, e))?;
    let sections = parse_source(&content);
    debug!(sections = sections.len(), "parsed test file");
    Ok(sections)
}

/// Extract documentation sections from test source text.
pub fn parse_source(content: &str) -> Vec<DocSection> {
    DESCRIBE_RE
        .captures_iter(content)
        .map(|caps| {
            let opener = caps.get(0).map_or(0, |m| m.start());
            let name = &caps[1];
            let tags = extract_tags(locate_comment(content, opener));

            DocSection {
                title: tags.title.unwrap_or_else(|| name.to_string()),
                description: tags.notice.unwrap_or_default(),
                details: tags.dev.unwrap_or_default(),
                chapters: tags.chapters,
            }
        })
        .collect()
}
