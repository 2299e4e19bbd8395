//! Fixed tag vocabulary: `@title`, `@notice`, `@dev`, `@chapter`.

use std::sync::LazyLock;

use regex::Regex;

/// Tags read from one doc comment. Missing tags stay `None` / empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    pub title: Option<String>,
    pub notice: Option<String>,
    pub dev: Option<String>,
    pub chapters: Vec<String>,
}

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// `@title` through end of line.
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@title\b([^\n]*)").expect("title regex"));

/// `@notice` through end of line.
static NOTICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@notice\b([^\n]*)").expect("notice regex"));

/// `@dev` through the next `@` or end of comment.
static DEV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@dev\s+([^@]+)").expect("dev regex"));

/// `@chapter <identifier>`.
static CHAPTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@chapter\s+(\S+)").expect("chapter regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Read the tag vocabulary out of a comment body.
///
/// Only the first `@title`, `@notice` and `@dev` count; every `@chapter`
/// counts, in order, duplicates included. Unknown text is ignored.
pub fn extract_tags(comment: &str) -> Tags {
    let chapters = CHAPTER_RE
        .captures_iter(comment)
        .map(|caps| caps[1].to_string())
        .collect();

    let dev = DEV_RE
        .captures(comment)
        .map(|caps| collapse_whitespace(&caps[1]))
        .filter(|dev| !dev.is_empty());

    Tags {
        title: line_tag(&TITLE_RE, comment),
        notice: line_tag(&NOTICE_RE, comment),
        dev,
        chapters,
    }
}

fn line_tag(re: &Regex, comment: &str) -> Option<String> {
    re.captures(comment)
        .map(|caps| caps[1].trim().to_string())
        .filter(|text| !text.is_empty())
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}
