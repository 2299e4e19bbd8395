//! Overview, chapter, and index document templates.

use tracing::debug;

use chapterdoc_shared::{ChapterMap, DocSection, ProjectMeta};

use crate::cleanup;
use crate::title_case;

/// Render the root overview document.
///
/// Layout: project name and description, a `Features` list of the sections
/// that declare no chapter, a `Key Concepts` digest of every chapter in
/// discovery order, and a pointer to the table of contents at `index_href`.
pub fn render_overview(meta: &ProjectMeta, chapters: &ChapterMap, index_href: &str) -> String {
    let mut md = format!("# {}\n\n", meta.name);
    push_paragraph(&mut md, &meta.description);

    let features = chapters.overview();
    if !features.is_empty() {
        md.push_str("## Features\n\n");
        for section in features {
            if section.description.is_empty() {
                md.push_str(&format!("- **{}**\n", section.title));
            } else {
                md.push_str(&format!(
                    "- **{}**: {}\n",
                    section.title, section.description
                ));
            }
        }
        md.push('\n');
    }

    if chapters.chapter_count() > 0 {
        md.push_str("## Key Concepts\n\n");
        for (id, sections) in chapters.chapters() {
            md.push_str(&format!("### {}\n\n", title_case(id)));
            for section in sections {
                md.push_str(&format!("#### {}\n\n", section.title));
                push_paragraph(&mut md, &section.description);
                push_paragraph(&mut md, &section.details);
            }
        }

        md.push_str("## Documentation\n\n");
        md.push_str(&format!(
            "Each concept has its own page; start from the [table of contents]({index_href}).\n"
        ));
    }

    debug!(
        features = features.len(),
        chapters = chapters.chapter_count(),
        "rendered overview"
    );
    cleanup::run_pipeline(&md)
}

/// Render one chapter page.
pub fn render_chapter(identifier: &str, sections: &[DocSection]) -> String {
    let mut md = format!("# {}\n\n", title_case(identifier));

    for section in sections {
        md.push_str(&format!("## {}\n\n", section.title));
        push_paragraph(&mut md, &section.description);
        if !section.details.is_empty() {
            md.push_str("### Details\n\n");
            push_paragraph(&mut md, &section.details);
        }
    }

    cleanup::run_pipeline(&md)
}

/// Render the table of contents linking every chapter page.
///
/// Chapter links are relative to the index itself; `overview_href` is the
/// relative link back to the overview document.
pub fn render_index(chapters: &ChapterMap, overview_href: &str) -> String {
    let mut md = String::from("# Table of Contents\n\n");
    md.push_str(&format!("* [Introduction]({overview_href})\n\n"));
    md.push_str("## Chapters\n\n");

    for id in chapters.chapter_ids() {
        md.push_str(&format!("* [{}]({id}.md)\n", title_case(id)));
    }

    cleanup::run_pipeline(&md)
}

fn push_paragraph(md: &mut String, text: &str) {
    if !text.is_empty() {
        md.push_str(text);
        md.push_str("\n\n");
    }
}
