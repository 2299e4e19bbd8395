//! Core pipeline orchestration for chapterdoc.
//!
//! This crate ties together extraction, chapter grouping, rendering, and
//! output writing into the end-to-end [`pipeline::generate`] workflow.

pub mod chapters;
pub mod pipeline;
pub mod writer;
