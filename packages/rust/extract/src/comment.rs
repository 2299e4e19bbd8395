//! Doc-comment lookup anchored to a declaration.

const DOC_OPEN: &str = "/**";
const BLOCK_OPEN: &str = "/*";
const BLOCK_CLOSE: &str = "*/";

/// Return the body of the doc comment that ends directly before `position`.
///
/// Only whitespace may separate the closing `*/` from `position`; a comment
/// followed by any code belongs to that code, not to the declaration. Plain
/// `/* ... */` blocks are not doc comments. Returns `""` when nothing is
/// attached (including when `position` is out of range).
pub fn locate_comment(text: &str, position: usize) -> &str {
    let Some(before) = text.get(..position) else {
        return "";
    };

    let trimmed = before.trim_end();
    let Some(head) = trimmed.strip_suffix(BLOCK_CLOSE) else {
        return "";
    };

    // Block comments do not nest: the opener is the first `/*` after the
    // previous close, so `/*` inside the body is plain text.
    let search_from = head
        .rfind(BLOCK_CLOSE)
        .map_or(0, |close| close + BLOCK_CLOSE.len());
    let Some(open) = head[search_from..]
        .find(BLOCK_OPEN)
        .map(|offset| search_from + offset)
    else {
        return "";
    };

    let body_start = open + DOC_OPEN.len();
    if !head[open..].starts_with(DOC_OPEN) || body_start > head.len() {
        return "";
    }

    &head[body_start..]
}
