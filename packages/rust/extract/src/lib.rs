//! Doc-comment extraction from annotated test files.
//!
//! Three layers, each usable on its own:
//! - [`locate_comment`] finds the `/** ... */` block directly above an offset
//! - [`extract_tags`] reads `@title`, `@notice`, `@dev`, `@chapter` from it
//! - [`parse_file`] / [`parse_source`] turn every `describe("...", function ()`
//!   group into a [`DocSection`](chapterdoc_shared::DocSection)

mod comment;
mod sections;
mod tags;

pub use comment::locate_comment;
pub use sections::{parse_file, parse_source};
pub use tags::{Tags, extract_tags};
