//! End-to-end `generate` pipeline: test files → sections → chapters → Markdown → disk.

use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument};

use chapterdoc_shared::{
    ChapterMap, ChapterdocError, DocConfig, DocSection, ProjectMeta, Result, load_project_meta,
};

use crate::chapters::group_by_chapter;
use crate::writer::{self, RenderedDoc, WrittenDoc};

/// Result of a run that produced documents.
#[derive(Debug)]
pub struct GenerateResult {
    /// Every document written, in write order (overview, chapters, index).
    pub written: Vec<WrittenDoc>,
    /// Number of test files parsed.
    pub files_parsed: usize,
    /// Number of sections extracted across all files.
    pub section_count: usize,
    /// Chapter identifiers in discovery order.
    pub chapters: Vec<String>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// What a run did.
#[derive(Debug)]
pub enum GenerateOutcome {
    /// Documents were rendered and written.
    Generated(GenerateResult),
    /// No matching test files; nothing was written.
    NothingToGenerate {
        /// The directory that was searched.
        input_dir: PathBuf,
    },
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each test file is parsed.
    fn file_parsed(&self, path: &Path, sections: usize, current: usize, total: usize);
    /// Called after each document is written.
    fn document_written(&self, doc: &WrittenDoc);
    /// Called when the pipeline completes.
    fn done(&self, outcome: &GenerateOutcome);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn file_parsed(&self, _path: &Path, _sections: usize, _current: usize, _total: usize) {}
    fn document_written(&self, _doc: &WrittenDoc) {}
    fn done(&self, _outcome: &GenerateOutcome) {}
}

/// Run the full `generate` pipeline for a project root.
///
/// 1. Discover test files (sorted by name)
/// 2. Parse every file into sections
/// 3. Group sections by chapter
/// 4. Resolve project metadata
/// 5. Render overview, chapter pages and index
/// 6. Write them all
///
/// Parsing and rendering finish before the first write, so a failing input
/// file leaves the previous output untouched.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn generate(
    root: &Path,
    config: &DocConfig,
    progress: &dyn ProgressReporter,
) -> Result<GenerateOutcome> {
    let start = Instant::now();

    if !root.is_dir() {
        return Err(ChapterdocError::not_found(root));
    }
    config.validate()?;

    // --- Phase 1: Discovery ---
    progress.phase("Discovering test files");
    let input_dir = root.join(&config.input.dir);
    let files = discover_files(&input_dir, &config.input.suffix)?;

    if files.is_empty() {
        info!(
            input_dir = %input_dir.display(),
            suffix = %config.input.suffix,
            "no test files found, nothing to generate"
        );
        let outcome = GenerateOutcome::NothingToGenerate { input_dir };
        progress.done(&outcome);
        return Ok(outcome);
    }

    info!(files = files.len(), "starting generate pipeline");

    // --- Phase 2: Parse ---
    progress.phase("Parsing test files");
    let mut sections: Vec<DocSection> = Vec::new();
    for (i, path) in files.iter().enumerate() {
        let parsed = chapterdoc_extract::parse_file(path)?;
        progress.file_parsed(path, parsed.len(), i + 1, files.len());
        sections.extend(parsed);
    }

    // --- Phase 3: Group ---
    progress.phase("Grouping chapters");
    let chapters = group_by_chapter(&sections);

    // --- Phase 4: Render ---
    progress.phase("Rendering documents");
    let meta = load_project_meta(root, config);
    let docs = render_all(config, &meta, &chapters)?;

    // --- Phase 5: Write ---
    progress.phase("Writing documents");
    let written = writer::write_docs(root, &docs)?;
    for doc in &written {
        progress.document_written(doc);
    }

    let result = GenerateResult {
        written,
        files_parsed: files.len(),
        section_count: sections.len(),
        chapters: chapters.chapter_ids().into_iter().map(String::from).collect(),
        elapsed: start.elapsed(),
    };

    info!(
        files = result.files_parsed,
        sections = result.section_count,
        chapters = result.chapters.len(),
        documents = result.written.len(),
        elapsed_ms = result.elapsed.as_millis() as u64,
        "documentation generated"
    );

    let outcome = GenerateOutcome::Generated(result);
    progress.done(&outcome);
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// List regular files in `dir` whose name ends with `suffix`, sorted by name.
///
/// A missing directory is not an error; it simply has no files.
fn discover_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "input directory absent");
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(dir).map_err(|e| ChapterdocError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ChapterdocError::io(dir, e))?;
        let path = entry.path();
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(suffix));
        if matches && path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(count = files.len(), "discovered test files");
    Ok(files)
}

/// Render every output document in write order: overview, chapters, index.
fn render_all(
    config: &DocConfig,
    meta: &ProjectMeta,
    chapters: &ChapterMap,
) -> Result<Vec<RenderedDoc>> {
    let docs_dir = PathBuf::from(&config.output.docs_dir);
    let index_rel = docs_dir.join(&config.output.index);
    let index_href = config.index_href();

    let mut docs = Vec::with_capacity(chapters.chapter_count() + 2);

    docs.push(RenderedDoc {
        rel_path: PathBuf::from(&config.output.overview),
        content: chapterdoc_markdown::render_overview(meta, chapters, &index_href),
    });

    for (id, sections) in chapters.chapters() {
        let declared_by = sections
            .iter()
            .map(|s| format!("'{}'", s.title))
            .collect::<Vec<_>>()
            .join(", ");
        let Some(rel_path) = chapter_rel_path(&docs_dir, id) else {
            return Err(ChapterdocError::Render(format!(
                "chapter identifier '{id}' declared by section {declared_by} is not a valid file name"
            )));
        };
        if rel_path == index_rel {
            return Err(ChapterdocError::Render(format!(
                "chapter '{id}' declared by section {declared_by} would overwrite the index file {}",
                index_rel.display()
            )));
        }
        docs.push(RenderedDoc {
            rel_path,
            content: chapterdoc_markdown::render_chapter(id, sections),
        });
    }

    docs.push(RenderedDoc {
        rel_path: index_rel,
        content: chapterdoc_markdown::render_index(chapters, &config.overview_href()),
    });

    Ok(docs)
}

/// `docs/<id>.md`, or `None` for identifiers that would leave the docs directory.
fn chapter_rel_path(docs_dir: &Path, id: &str) -> Option<PathBuf> {
    let file = PathBuf::from(format!("{id}.md"));
    let escapes = file
        .components()
        .any(|c| !matches!(c, Component::Normal(_)));
    (!escapes).then(|| docs_dir.join(file))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const CLAIMS_TEST: &str = r#"import { expect } from "chai";

describe("Privacy Insurance Claims", function () {
  /**
   * @notice Checks setup
   * @chapter access-control
   */
  describe("Deployment", function () {
    it("sets the owner", async function () {});
  });

  describe("Policy Creation", function () {
    it("creates a policy", async function () {});
  });
});
"#;

    const PAYMENTS_TEST: &str = r#"/**
 * @title Claim Payments
 * @notice Pays approved claims
 * @dev Amounts are decrypted
 *      only by the holder
 * @chapter user-decryption
 * @chapter access-control
 */
describe("Payments", function () {});
"#;

    fn temp_project() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cd-pipeline-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(dir.join("test")).unwrap();
        dir
    }

    fn read(root: &Path, rel: &str) -> String {
        std::fs::read_to_string(root.join(rel)).unwrap()
    }

    fn generated(outcome: GenerateOutcome) -> GenerateResult {
        match outcome {
            GenerateOutcome::Generated(result) => result,
            GenerateOutcome::NothingToGenerate { input_dir } => {
                panic!("nothing generated from {}", input_dir.display())
            }
        }
    }

    #[test]
    fn end_to_end_single_file() {
        let root = temp_project();
        std::fs::write(root.join("test/Claims.test.ts"), CLAIMS_TEST).unwrap();

        let result = generated(generate(&root, &DocConfig::default(), &SilentProgress).unwrap());
        assert_eq!(result.files_parsed, 1);
        assert_eq!(result.section_count, 3);
        assert_eq!(result.chapters, vec!["access-control"]);

        let chapter = read(&root, "docs/access-control.md");
        assert!(chapter.starts_with("# Access Control\n"));
        assert!(chapter.contains("## Deployment\n\nChecks setup\n"));

        let readme = read(&root, "README.md");
        assert!(readme.contains("### Access Control\n\n#### Deployment\n\nChecks setup\n"));
        assert!(readme.contains("- **Privacy Insurance Claims**\n"));
        assert!(readme.contains("- **Policy Creation**\n"));
        assert!(!readme.contains("- **Deployment**"));

        let summary = read(&root, "docs/SUMMARY.md");
        assert!(summary.contains("* [Introduction](../README.md)"));
        assert!(summary.contains("* [Access Control](access-control.md)"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn overview_bucket_holds_only_unchaptered_group() {
        let src = "/**\n * @notice Checks setup\n * @chapter access-control\n */\n\
                   describe(\"Deployment\", function () {});\n\n\
                   describe(\"Policy Creation\", function () {});\n";
        let chapters = group_by_chapter(&chapterdoc_extract::parse_source(src));

        assert_eq!(chapters.overview().len(), 1);
        assert_eq!(chapters.overview()[0].title, "Policy Creation");
        assert_eq!(chapters.get("access-control").unwrap()[0].title, "Deployment");

        let root = temp_project();
        std::fs::write(root.join("test/Simple.test.ts"), src).unwrap();
        generated(generate(&root, &DocConfig::default(), &SilentProgress).unwrap());

        let chapter = read(&root, "docs/access-control.md");
        assert_eq!(chapter, "# Access Control\n\n## Deployment\n\nChecks setup\n");
        let readme = read(&root, "README.md");
        assert!(readme.contains("- **Policy Creation**\n"));
        assert!(readme.contains("#### Deployment\n\nChecks setup\n"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn metadata_and_file_order() {
        let root = temp_project();
        std::fs::write(root.join("test/b-claims.test.ts"), CLAIMS_TEST).unwrap();
        std::fs::write(root.join("test/a-payments.test.ts"), PAYMENTS_TEST).unwrap();
        std::fs::write(root.join("test/helpers.ts"), "describe(\"Ignored\", function () {});").unwrap();
        std::fs::write(
            root.join("package.json"),
            r#"{"name": "privacy-claims", "description": "Encrypted claims"}"#,
        )
        .unwrap();

        let result = generated(generate(&root, &DocConfig::default(), &SilentProgress).unwrap());
        assert_eq!(result.files_parsed, 2);
        // a-payments.test.ts is parsed first, so its chapters come first.
        assert_eq!(result.chapters, vec!["user-decryption", "access-control"]);

        let readme = read(&root, "README.md");
        assert!(readme.starts_with("# privacy-claims\n\nEncrypted claims\n"));
        assert!(!readme.contains("Ignored"));

        let access = read(&root, "docs/access-control.md");
        let payments = access.find("## Claim Payments").unwrap();
        let deployment = access.find("## Deployment").unwrap();
        assert!(payments < deployment);
        assert!(access.contains("### Details\n\nAmounts are decrypted * only by the holder *\n"));

        let summary = read(&root, "docs/SUMMARY.md");
        let ud = summary.find("[User Decryption](user-decryption.md)").unwrap();
        let ac = summary.find("[Access Control](access-control.md)").unwrap();
        assert!(ud < ac);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn rerun_is_byte_identical() {
        let root = temp_project();
        std::fs::write(root.join("test/Claims.test.ts"), CLAIMS_TEST).unwrap();
        std::fs::write(root.join("test/Payments.test.ts"), PAYMENTS_TEST).unwrap();

        let first = generated(generate(&root, &DocConfig::default(), &SilentProgress).unwrap());
        let readme = read(&root, "README.md");
        let second = generated(generate(&root, &DocConfig::default(), &SilentProgress).unwrap());

        assert_eq!(first.written, second.written);
        assert_eq!(read(&root, "README.md"), readme);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn no_test_files_writes_nothing() {
        let root = temp_project();
        std::fs::write(root.join("README.md"), "hand written\n").unwrap();
        std::fs::write(root.join("test/notes.md"), "not a test").unwrap();

        let outcome = generate(&root, &DocConfig::default(), &SilentProgress).unwrap();
        assert!(matches!(outcome, GenerateOutcome::NothingToGenerate { .. }));
        assert!(!root.join("docs").exists());
        assert_eq!(read(&root, "README.md"), "hand written\n");

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_input_dir_writes_nothing() {
        let root = temp_project();
        std::fs::remove_dir_all(root.join("test")).unwrap();

        let outcome = generate(&root, &DocConfig::default(), &SilentProgress).unwrap();
        assert!(matches!(outcome, GenerateOutcome::NothingToGenerate { .. }));
        assert!(!root.join("docs").exists());
        assert!(!root.join("README.md").exists());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_root_is_not_found() {
        let root = std::env::temp_dir().join(format!("cd-absent-{}", uuid::Uuid::now_v7()));
        let err = generate(&root, &DocConfig::default(), &SilentProgress).unwrap_err();
        assert!(matches!(err, ChapterdocError::NotFound { .. }));
    }

    #[test]
    fn unreadable_file_aborts_without_output() {
        let root = temp_project();
        std::fs::write(root.join("test/a.test.ts"), CLAIMS_TEST).unwrap();
        // Invalid UTF-8 cannot be read as text.
        std::fs::write(root.join("test/b.test.ts"), [0xff, 0xfe, 0xfd]).unwrap();

        let err = generate(&root, &DocConfig::default(), &SilentProgress).unwrap_err();
        assert!(matches!(err, ChapterdocError::Io { .. }));
        assert!(!root.join("README.md").exists());
        assert!(!root.join("docs").exists());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn custom_layout_from_config() {
        let root = temp_project();
        std::fs::create_dir_all(root.join("spec")).unwrap();
        std::fs::write(root.join("spec/claims.spec.ts"), CLAIMS_TEST).unwrap();

        let mut config = DocConfig::default();
        config.input.dir = "spec".into();
        config.input.suffix = ".spec.ts".into();
        config.output.overview = "OVERVIEW.md".into();
        config.output.docs_dir = "book/src".into();

        generated(generate(&root, &config, &SilentProgress).unwrap());

        assert!(root.join("OVERVIEW.md").exists());
        assert!(root.join("book/src/access-control.md").exists());
        let summary = read(&root, "book/src/SUMMARY.md");
        assert!(summary.contains("* [Introduction](../../OVERVIEW.md)"));
        assert!(read(&root, "OVERVIEW.md").contains("(book/src/SUMMARY.md)"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn nested_overview_links_both_ways() {
        let root = temp_project();
        std::fs::write(root.join("test/claims.test.ts"), CLAIMS_TEST).unwrap();

        let mut config = DocConfig::default();
        config.output.overview = "site/README.md".into();

        generated(generate(&root, &config, &SilentProgress).unwrap());

        assert!(read(&root, "site/README.md").contains("(../docs/SUMMARY.md)"));
        assert!(read(&root, "docs/SUMMARY.md").contains("* [Introduction](../site/README.md)"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn layout_outside_root_is_rejected() {
        let root = temp_project();
        std::fs::write(root.join("test/claims.test.ts"), CLAIMS_TEST).unwrap();

        let mut config = DocConfig::default();
        config.output.docs_dir = "../out".into();

        let err = generate(&root, &config, &SilentProgress).unwrap_err();
        assert!(matches!(err, ChapterdocError::Config { .. }));
        assert!(!root.join("README.md").exists());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn chapter_named_like_index_names_its_section() {
        let root = temp_project();
        std::fs::write(
            root.join("test/summary.test.ts"),
            "/** @chapter SUMMARY */\ndescribe(\"Summary Group\", function () {});",
        )
        .unwrap();

        let err = generate(&root, &DocConfig::default(), &SilentProgress).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'SUMMARY'"), "{msg}");
        assert!(msg.contains("'Summary Group'"), "{msg}");
        assert!(!root.join("README.md").exists());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn escaping_chapter_identifier_is_rejected() {
        let root = temp_project();
        std::fs::write(
            root.join("test/evil.test.ts"),
            "/** @chapter ../../outside */\ndescribe(\"Evil\", function () {});",
        )
        .unwrap();

        let err = generate(&root, &DocConfig::default(), &SilentProgress).unwrap_err();
        assert!(matches!(err, ChapterdocError::Render(_)));
        assert!(err.to_string().contains("'Evil'"));
        assert!(!root.join("README.md").exists());

        let _ = std::fs::remove_dir_all(&root);
    }
}
