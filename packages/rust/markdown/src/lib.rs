//! Markdown rendering for chapterdoc documentation sets.
//!
//! Every renderer is a pure `ChapterMap -> String` function; writing files is
//! the caller's job. All output goes through the [`cleanup`] passes so that
//! documents have no trailing spaces, no runs of blank lines, and exactly one
//! trailing newline.

mod cleanup;
mod render;

pub use render::{render_chapter, render_index, render_overview};

/// Turn a chapter identifier into a display heading.
///
/// Splits on `-`, uppercases the first character of each piece and joins the
/// pieces with spaces: `user-decryption` becomes `User Decryption`.
pub fn title_case(identifier: &str) -> String {
    identifier
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    format!("{upper}{}", chars.as_str())
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
