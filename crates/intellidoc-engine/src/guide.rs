use std::fs;
use std::path::PathBuf;

use tracing::{info, instrument};

use intellidoc_core::{GenerationOptions, RunContext, TextGenerator};
use intellidoc_store::{FindingsStore, StoreError, SummaryLog};

use crate::error::EngineError;
use crate::generate::generate_or_placeholder;
use crate::prompts;

/// The final Markdown document of a run.
#[derive(Clone, Debug)]
pub struct Guide {
    pub path: PathBuf,
    pub text: String,
    pub placeholder: bool,
}

/// Combines the finished findings document and summary log into one guide.
pub struct GuideBuilder<'a> {
    ctx: &'a RunContext,
    generator: &'a dyn TextGenerator,
    options: GenerationOptions,
}

impl<'a> GuideBuilder<'a> {
    pub fn new(ctx: &'a RunContext, generator: &'a dyn TextGenerator) -> Self {
        Self {
            ctx,
            generator,
            options: GenerationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Both inputs must already exist on disk. A missing one fails the build
    /// before any request is issued and no guide file is written.
    #[instrument(skip_all)]
    pub async fn build(
        &self,
        store: &FindingsStore,
        log: &SummaryLog,
    ) -> Result<Guide, EngineError> {
        let findings = store.read_raw()?;
        let summaries = log.read_to_string()?;
        let findings_json = serde_json::to_string_pretty(&findings)
            .map_err(StoreError::from)?;

        info!(run = %self.ctx.run_id, "generating developer guide");
        let prompt = prompts::guide_prompt(&summaries, &findings_json);
        let generated =
            generate_or_placeholder(self.generator, &prompt, &self.options, "guide").await;

        let path = self.ctx.guide_path();
        fs::write(&path, &generated.text).map_err(|source| EngineError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "guide written");

        Ok(Guide {
            path,
            text: generated.text,
            placeholder: generated.placeholder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intellidoc_core::{ArtifactKind, RunId};
    use intellidoc_llm::{MockGenerator, MockResponse};

    fn ctx(tmp: &tempfile::TempDir) -> RunContext {
        RunContext::new(
            RunId::from_raw("20250101_000000"),
            tmp.path().join("project"),
            tmp.path().join("out"),
        )
    }

    #[tokio::test]
    async fn guide_embeds_log_and_findings() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = ctx(&tmp);
        let store = FindingsStore::init(ctx.findings_path()).unwrap();
        let log = SummaryLog::new(ctx.summaries_path());
        store.record(&ArtifactKind::Root, "a rust tool").unwrap();
        log.append_artifact(&ArtifactKind::Root, "a rust tool").unwrap();

        let gen = MockGenerator::new(vec![MockResponse::text("# Guide")]);
        let guide = GuideBuilder::new(&ctx, &gen).build(&store, &log).await.unwrap();

        assert_eq!(guide.path, ctx.guide_path());
        assert_eq!(fs::read_to_string(&guide.path).unwrap(), "# Guide");
        assert!(!guide.placeholder);

        let prompt = &gen.prompts()[0];
        assert_eq!(prompt.system, prompts::GUIDE_SYSTEM);
        assert!(prompt.user.contains("Initial Summaries:\nProject Overview:\na rust tool"));
        assert!(prompt.user.contains("\"root_summary\": \"a rust tool\""));
        assert!(prompt.user.contains("7. API Reference"));
    }

    #[tokio::test]
    async fn missing_store_fails_without_writing_a_guide() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = ctx(&tmp);
        fs::create_dir_all(ctx.run_dir()).unwrap();
        let log = SummaryLog::new(ctx.summaries_path());
        log.append("Project Overview:\nx").unwrap();

        let gen = MockGenerator::constant("never");
        let err = GuideBuilder::new(&ctx, &gen)
            .build(&FindingsStore::open(ctx.findings_path()), &log)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::MissingArtifact(ref p) if p.ends_with("findings.json")));
        assert!(!ctx.guide_path().exists());
        assert_eq!(gen.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_log_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = ctx(&tmp);
        let store = FindingsStore::init(ctx.findings_path()).unwrap();

        let gen = MockGenerator::constant("never");
        let err = GuideBuilder::new(&ctx, &gen)
            .build(&store, &SummaryLog::new(ctx.summaries_path()))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingArtifact(_)));
        assert!(!ctx.guide_path().exists());
    }

    #[tokio::test]
    async fn failed_generation_writes_placeholder_guide() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = ctx(&tmp);
        let store = FindingsStore::init(ctx.findings_path()).unwrap();
        let log = SummaryLog::new(ctx.summaries_path());
        log.append("x").unwrap();

        let gen = MockGenerator::new(vec![MockResponse::Error(
            intellidoc_core::GenerationError::RateLimited,
        )]);
        let guide = GuideBuilder::new(&ctx, &gen).build(&store, &log).await.unwrap();
        assert!(guide.placeholder);
        assert_eq!(fs::read_to_string(ctx.guide_path()).unwrap(), prompts::PLACEHOLDER);
    }
}
