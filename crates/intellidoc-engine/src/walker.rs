use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use walkdir::{DirEntry, WalkDir};

use intellidoc_core::{ArtifactKind, GenerationOptions, Prompt, RunContext, TextGenerator};
use intellidoc_store::{FindingsStore, SummaryLog};

use crate::error::EngineError;
use crate::filter::ExclusionFilter;
use crate::generate::generate_or_placeholder;
use crate::prompts;

/// Counters describing what one walk produced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WalkReport {
    pub files_summarized: usize,
    pub files_skipped: usize,
    pub directories_summarized: usize,
    pub placeholders: usize,
}

#[derive(Debug, thiserror::Error)]
enum UnreadableFile {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
}

fn read_text(path: &Path) -> Result<String, UnreadableFile> {
    Ok(String::from_utf8(fs::read(path)?)?)
}

/// Drives the root pass and the directory pass for one run.
///
/// Siblings are visited in lexicographic order so the same tree always
/// yields the same artifact order. Excluded directories are pruned before
/// descending; their children are never visited. Run directories written by
/// this tool are skipped when the output root sits inside the project.
pub struct TreeWalker<'a> {
    ctx: &'a RunContext,
    generator: &'a dyn TextGenerator,
    filter: &'a ExclusionFilter,
    store: &'a FindingsStore,
    log: &'a SummaryLog,
    options: GenerationOptions,
    report: WalkReport,
}

impl<'a> TreeWalker<'a> {
    pub fn new(
        ctx: &'a RunContext,
        generator: &'a dyn TextGenerator,
        filter: &'a ExclusionFilter,
        store: &'a FindingsStore,
        log: &'a SummaryLog,
    ) -> Self {
        Self {
            ctx,
            generator,
            filter,
            store,
            log,
            options: GenerationOptions::default(),
            report: WalkReport::default(),
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Run both passes and return the report.
    #[instrument(skip_all)]
    pub async fn run(mut self) -> Result<WalkReport, EngineError> {
        info!(root = %self.ctx.project_root.display(), "starting project analysis");
        self.root_pass().await?;
        self.directory_pass().await?;
        info!(
            files = self.report.files_summarized,
            skipped = self.report.files_skipped,
            directories = self.report.directories_summarized,
            placeholders = self.report.placeholders,
            "project analysis complete"
        );
        Ok(self.report)
    }

    /// Summarize the project from its flat listing alone.
    pub async fn root_pass(&mut self) -> Result<(), EngineError> {
        info!("analyzing root directory");
        let listing = self.root_listing();
        let prompt =
            prompts::root_prompt(&self.ctx.project_root.display().to_string(), &listing);
        let summary = self.generate(&prompt, "project root").await;
        self.persist(&ArtifactKind::Root, &summary)?;
        info!(entries = listing.len(), "root analysis complete");
        Ok(())
    }

    /// Summarize every in-scope directory, top-down.
    pub async fn directory_pass(&mut self) -> Result<(), EngineError> {
        for dir in self.directories() {
            self.summarize_directory(&dir).await?;
        }
        Ok(())
    }

    /// Every in-scope path under the root (files and directories), relative.
    pub fn root_listing(&self) -> Vec<String> {
        self.walk()
            .filter(|e| e.depth() > 0)
            .filter_map(|e| self.ctx.relative_key(e.path()))
            .collect()
    }

    /// In-scope directories in pre-order, the root first.
    pub fn directories(&self) -> Vec<PathBuf> {
        self.walk()
            .filter(|e| e.file_type().is_dir())
            .map(DirEntry::into_path)
            .collect()
    }

    fn walk(&self) -> impl Iterator<Item = DirEntry> + '_ {
        WalkDir::new(&self.ctx.project_root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |e| self.in_scope(e.path()))
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(err) => {
                    warn!(error = %err, "skipping unreadable entry");
                    None
                }
            })
    }

    fn in_scope(&self, path: &Path) -> bool {
        if path == self.ctx.project_root {
            return true;
        }
        if self.ctx.is_run_dir(path) {
            return false;
        }
        match self.ctx.relative_key(path) {
            Some(rel) => !self.filter.is_excluded_str(&rel),
            None => false,
        }
    }

    /// Direct, non-excluded file children of `dir`, sorted.
    fn direct_files(&self, dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(err) => {
                    warn!(dir = %dir.display(), error = %err, "cannot list directory entry");
                    None
                }
            })
            .filter(|e| e.file_type().is_file() && self.in_scope(e.path()))
            .map(DirEntry::into_path)
            .collect()
    }

    async fn summarize_directory(&mut self, dir: &Path) -> Result<(), EngineError> {
        let Some(rel) = self.ctx.relative_key(dir) else {
            return Ok(());
        };

        let files = self.direct_files(dir);
        if files.is_empty() {
            debug!(path = %rel, "no files, skipping directory");
            return Ok(());
        }
        info!(path = %rel, files = files.len(), "analyzing directory");

        let mut fragments = Vec::with_capacity(files.len());
        for file in &files {
            if let Some(summary) = self.summarize_file(file).await? {
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                fragments.push(format!("{name}: {summary}"));
            }
        }

        if fragments.is_empty() {
            debug!(path = %rel, "no readable files, no directory summary");
            return Ok(());
        }

        let prompt = prompts::directory_prompt(&rel, &fragments);
        let summary = self.generate(&prompt, &rel).await;
        self.persist(&ArtifactKind::Directory(rel.clone()), &summary)?;
        self.report.directories_summarized += 1;
        info!(path = %rel, "completed analysis of directory");
        Ok(())
    }

    async fn summarize_file(&mut self, path: &Path) -> Result<Option<String>, EngineError> {
        let Some(rel) = self.ctx.relative_key(path) else {
            return Ok(None);
        };
        info!(path = %rel, "analyzing file");

        let content = match read_text(path) {
            Ok(content) => content,
            Err(reason) => {
                warn!(path = %rel, %reason, "skipping binary or unreadable file");
                self.report.files_skipped += 1;
                return Ok(None);
            }
        };

        let prompt = prompts::file_prompt(&rel, &content);
        let summary = self.generate(&prompt, &rel).await;
        self.persist(&ArtifactKind::File(rel.clone()), &summary)?;
        self.report.files_summarized += 1;
        info!(path = %rel, "completed analysis of file");
        Ok(Some(summary))
    }

    async fn generate(&mut self, prompt: &Prompt, subject: &str) -> String {
        let generated =
            generate_or_placeholder(self.generator, prompt, &self.options, subject).await;
        if generated.placeholder {
            self.report.placeholders += 1;
        }
        generated.text
    }

    /// Store first, then log: the document never lags the transcript.
    fn persist(&self, kind: &ArtifactKind, summary: &str) -> Result<(), EngineError> {
        self.store.record(kind, summary)?;
        self.log.append_artifact(kind, summary)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intellidoc_core::{GenerationError, RunId};
    use intellidoc_llm::{MockGenerator, MockResponse};

    struct Fixture {
        _tmp: tempfile::TempDir,
        ctx: RunContext,
        store: FindingsStore,
        log: SummaryLog,
    }

    fn fixture() -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let project = tmp.path().join("project");
        fs::create_dir_all(&project).unwrap();
        let ctx = RunContext::new(
            RunId::from_raw("20250101_000000"),
            project,
            tmp.path().join("out"),
        );
        let store = FindingsStore::init(ctx.findings_path()).unwrap();
        let log = SummaryLog::new(ctx.summaries_path());
        Fixture {
            _tmp: tmp,
            ctx,
            store,
            log,
        }
    }

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn echo() -> MockGenerator {
        MockGenerator::with_responder(|p| {
            let first_line = p.user.lines().next().unwrap_or_default().to_string();
            MockResponse::Text(format!("summary of {first_line}"))
        })
    }

    async fn run(
        f: &Fixture,
        generator: &dyn TextGenerator,
        filter: &ExclusionFilter,
    ) -> WalkReport {
        TreeWalker::new(&f.ctx, generator, filter, &f.store, &f.log)
            .run()
            .await
            .unwrap()
    }

    #[test]
    fn root_listing_is_relative_sorted_and_pruned() {
        let f = fixture();
        let root = &f.ctx.project_root;
        write(root, "readme.md", b"# hi");
        write(root, "src/main.rs", b"fn main() {}");
        write(root, "src/.git/config", b"[core]");
        write(root, "node_modules/x/index.js", b"");

        let gen = MockGenerator::new(vec![]);
        let filter = ExclusionFilter::default();
        let walker = TreeWalker::new(&f.ctx, &gen, &filter, &f.store, &f.log);
        assert_eq!(walker.root_listing(), vec!["readme.md", "src", "src/main.rs"]);
        let dirs: Vec<_> = walker
            .directories()
            .iter()
            .map(|d| f.ctx.relative_key(d).unwrap())
            .collect();
        assert_eq!(dirs, vec![".", "src"]);
    }

    #[tokio::test]
    async fn keys_are_relative_and_files_precede_their_directory() {
        let f = fixture();
        let root = &f.ctx.project_root;
        write(root, "b.txt", b"b");
        write(root, "a.txt", b"a");
        write(root, "lib/util.py", b"def f(): pass");

        let gen = echo();
        let report = run(&f, &gen, &ExclusionFilter::default()).await;
        assert_eq!(report.files_summarized, 3);
        assert_eq!(report.directories_summarized, 2);

        let doc = f.store.read().unwrap();
        let root_str = root.to_string_lossy().to_string();
        for key in doc.files.keys().chain(doc.directories.keys()) {
            assert!(!key.contains(&root_str), "absolute key {key}");
            assert!(!key.starts_with('/'), "absolute key {key}");
        }
        assert!(doc.files.contains_key("lib/util.py"));
        assert!(doc.directories.contains_key("."));
        assert!(doc.directories.contains_key("lib"));

        let text = f.log.read_to_string().unwrap();
        let order: Vec<&str> = text
            .lines()
            .filter(|l| {
                l.starts_with("Project Overview:")
                    || l.starts_with("File: ")
                    || l.starts_with("Directory: ")
            })
            .collect();
        assert_eq!(
            order,
            vec![
                "Project Overview:",
                "File: a.txt:",
                "File: b.txt:",
                "Directory: .:",
                "File: lib/util.py:",
                "Directory: lib:",
            ]
        );
    }

    #[tokio::test]
    async fn directory_prompt_concatenates_fragments_in_order() {
        let f = fixture();
        write(&f.ctx.project_root, "pkg/one.rs", b"1");
        write(&f.ctx.project_root, "pkg/two.rs", b"2");

        let gen = MockGenerator::with_responder(|p| {
            if p.user.starts_with("File path: pkg/one.rs") {
                MockResponse::text("ONE")
            } else if p.user.starts_with("File path: pkg/two.rs") {
                MockResponse::text("TWO")
            } else {
                MockResponse::text("other")
            }
        });
        run(&f, &gen, &ExclusionFilter::default()).await;

        let dir_prompt = gen
            .prompts()
            .into_iter()
            .find(|p| p.user.starts_with("Directory path: pkg"))
            .unwrap();
        assert!(dir_prompt.user.contains("File Summaries:\none.rs: ONEtwo.rs: TWO\n\n"));
    }

    #[tokio::test]
    async fn directory_without_files_has_no_entry() {
        let f = fixture();
        write(&f.ctx.project_root, "only_dirs/nested/file.txt", b"x");

        let gen = echo();
        run(&f, &gen, &ExclusionFilter::default()).await;

        let doc = f.store.read().unwrap();
        assert!(!doc.directories.contains_key("only_dirs"));
        assert!(!doc.directories.contains_key("."));
        assert!(doc.directories.contains_key("only_dirs/nested"));
    }

    #[tokio::test]
    async fn unreadable_only_directory_is_skipped_and_siblings_continue() {
        let f = fixture();
        write(&f.ctx.project_root, "assets/logo.bin", &[0xff, 0xfe, 0x00, 0x81]);
        write(&f.ctx.project_root, "assets/icon.bin", &[0xc3, 0x28]);
        write(&f.ctx.project_root, "docs/guide.md", b"# guide");

        let gen = echo();
        let report = run(&f, &gen, &ExclusionFilter::default()).await;
        assert_eq!(report.files_skipped, 2);

        let doc = f.store.read().unwrap();
        assert!(!doc.files.keys().any(|k| k.starts_with("assets/")));
        assert!(!doc.directories.contains_key("assets"));
        assert!(doc.files.contains_key("docs/guide.md"));
        assert!(doc.directories.contains_key("docs"));
    }

    #[tokio::test]
    async fn substring_exclusion_applies_to_file_names() {
        let f = fixture();
        write(&f.ctx.project_root, "notes/my_migrations_notes.txt", b"x");
        write(&f.ctx.project_root, "notes/keep.txt", b"y");

        let gen = echo();
        run(&f, &gen, &ExclusionFilter::default()).await;

        let doc = f.store.read().unwrap();
        assert!(doc.files.contains_key("notes/keep.txt"));
        assert!(!doc.files.contains_key("notes/my_migrations_notes.txt"));
    }

    #[tokio::test]
    async fn one_failed_file_gets_placeholder_others_unaffected() {
        let f = fixture();
        write(&f.ctx.project_root, "src/bad.rs", b"bad");
        write(&f.ctx.project_root, "src/good.rs", b"good");

        let gen = MockGenerator::with_responder(|p| {
            if p.user.starts_with("File path: src/bad.rs") {
                MockResponse::Error(GenerationError::ServerError {
                    status: 503,
                    body: "unavailable".into(),
                })
            } else {
                MockResponse::text("fine")
            }
        });
        let report = run(&f, &gen, &ExclusionFilter::default()).await;
        assert_eq!(report.placeholders, 1);

        let doc = f.store.read().unwrap();
        assert_eq!(doc.files["src/bad.rs"], prompts::PLACEHOLDER);
        assert_eq!(doc.files["src/good.rs"], "fine");
        assert_eq!(doc.directories["src"], "fine");
        assert_eq!(doc.root_summary, "fine");
    }

    #[tokio::test]
    async fn output_tree_inside_project_is_not_walked() {
        let tmp = tempfile::tempdir().unwrap();
        let project = tmp.path().to_path_buf();
        write(&project, "main.go", b"package main");
        let ctx = RunContext::new(RunId::from_raw("20250101_000000"), &project, &project);
        let store = FindingsStore::init(ctx.findings_path()).unwrap();
        let log = SummaryLog::new(ctx.summaries_path());

        let gen = echo();
        let filter = ExclusionFilter::default();
        TreeWalker::new(&ctx, &gen, &filter, &store, &log)
            .run()
            .await
            .unwrap();

        let doc = store.read().unwrap();
        assert_eq!(doc.files.keys().collect::<Vec<_>>(), vec!["main.go"]);
        assert!(!doc.root_summary.is_empty());
        let listing = &gen.prompts()[0].user;
        assert!(!listing.contains("20250101_000000"));
        assert!(!listing.contains("findings.json"));
    }

    #[tokio::test]
    async fn project_findings_directory_is_still_summarized() {
        let tmp = tempfile::tempdir().unwrap();
        let project = tmp.path().to_path_buf();
        write(&project, "main.py", b"print()");
        write(&project, "findings/report.py", b"def report(): pass");
        write(&project, "findings/20240101_000000/findings.json", b"{}");
        let ctx = RunContext::new(RunId::from_raw("20250101_000000"), &project, &project);
        let store = FindingsStore::init(ctx.findings_path()).unwrap();
        let log = SummaryLog::new(ctx.summaries_path());

        let gen = echo();
        let filter = ExclusionFilter::default();
        TreeWalker::new(&ctx, &gen, &filter, &store, &log)
            .run()
            .await
            .unwrap();

        let doc = store.read().unwrap();
        assert_eq!(
            doc.files.keys().collect::<Vec<_>>(),
            vec!["findings/report.py", "main.py"]
        );
        assert!(doc.directories.contains_key("findings"));
        assert!(!doc.directories.keys().any(|k| k.starts_with("findings/")));
        assert!(gen.prompts()[0].user.contains("findings/report.py"));
    }

    #[tokio::test]
    async fn nested_excluded_directory_is_never_visited() {
        let f = fixture();
        write(&f.ctx.project_root, "app/.venv/lib/site.py", b"x");
        write(&f.ctx.project_root, "app/main.py", b"print()");

        let gen = echo();
        run(&f, &gen, &ExclusionFilter::default()).await;

        for p in gen.prompts() {
            assert!(!p.user.contains(".venv"), "excluded path leaked: {}", p.user);
        }
        let doc = f.store.read().unwrap();
        assert!(!doc.directories.keys().any(|k| k.contains(".venv")));
    }
}
