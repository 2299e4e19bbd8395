//! Chapter grouping.
//!
//! Sections that declare chapters are replicated into every bucket they name;
//! the rest land in the overview bucket.

use tracing::{debug, instrument};

use chapterdoc_shared::{ChapterMap, DocSection, OVERVIEW_CHAPTER};

/// Partition sections into chapter buckets, preserving discovery order.
///
/// A section declaring the same chapter twice appears twice in that bucket.
#[instrument(skip_all, fields(section_count = sections.len()))]
pub fn group_by_chapter(sections: &[DocSection]) -> ChapterMap {
    let mut map = ChapterMap::new();

    for section in sections {
        if section.chapters.is_empty() {
            map.push(OVERVIEW_CHAPTER, section.clone());
            continue;
        }
        for chapter in &section.chapters {
            map.push(chapter, section.clone());
        }
    }

    debug!(
        overview = map.overview().len(),
        chapters = map.chapter_count(),
        "sections grouped"
    );
    map
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
