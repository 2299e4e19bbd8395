//! Core domain types for chapterdoc documentation sets.

use indexmap::IndexMap;

/// Reserved chapter key holding sections that declare no chapter.
pub const OVERVIEW_CHAPTER: &str = "overview";

// ---------------------------------------------------------------------------
// DocSection
// ---------------------------------------------------------------------------

/// One documentation unit extracted from a named test group and the doc
/// comment directly above it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocSection {
    /// `@title` text, or the literal group name when the tag is absent.
    pub title: String,
    /// `@notice` text (may be empty).
    pub description: String,
    /// `@dev` text with whitespace collapsed (may be empty).
    pub details: String,
    /// `@chapter` identifiers in declaration order, duplicates kept.
    pub chapters: Vec<String>,
}

// ---------------------------------------------------------------------------
// ChapterMap
// ---------------------------------------------------------------------------

/// Sections keyed by chapter identifier, in discovery order.
///
/// The [`OVERVIEW_CHAPTER`] bucket always exists and is always the first key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterMap {
    buckets: IndexMap<String, Vec<DocSection>>,
}

impl ChapterMap {
    /// Create a map holding only the empty overview bucket.
    pub fn new() -> Self {
        let mut buckets = IndexMap::new();
        buckets.insert(OVERVIEW_CHAPTER.to_string(), Vec::new());
        Self { buckets }
    }

    /// Append a section to a bucket, creating the bucket on first use.
    pub fn push(&mut self, chapter: &str, section: DocSection) {
        self.buckets
            .entry(chapter.to_string())
            .or_default()
            .push(section);
    }

    /// Sections without a declared chapter.
    pub fn overview(&self) -> &[DocSection] {
        self.buckets
            .get(OVERVIEW_CHAPTER)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Sections of one bucket, if it exists.
    pub fn get(&self, chapter: &str) -> Option<&[DocSection]> {
        self.buckets.get(chapter).map(Vec::as_slice)
    }

    /// Non-overview chapters with their sections, in discovery order.
    pub fn chapters(&self) -> impl Iterator<Item = (&str, &[DocSection])> {
        self.buckets
            .iter()
            .filter(|(id, _)| id.as_str() != OVERVIEW_CHAPTER)
            .map(|(id, sections)| (id.as_str(), sections.as_slice()))
    }

    /// Non-overview chapter identifiers, in discovery order.
    pub fn chapter_ids(&self) -> Vec<&str> {
        self.chapters().map(|(id, _)| id).collect()
    }

    /// Number of non-overview chapters.
    pub fn chapter_count(&self) -> usize {
        self.buckets.len() - 1
    }
}

impl Default for ChapterMap {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// ProjectMeta
// ---------------------------------------------------------------------------

/// Project name and description shown at the top of the overview document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMeta {
    pub name: String,
    pub description: String,
}
