use std::path::PathBuf;

use tracing::{info, instrument};

use intellidoc_core::{GenerationOptions, RunContext, TextGenerator};
use intellidoc_store::{FindingsStore, SummaryLog};

use crate::error::EngineError;
use crate::filter::ExclusionFilter;
use crate::guide::{Guide, GuideBuilder};
use crate::walker::{TreeWalker, WalkReport};

/// Knobs for one analysis run.
#[derive(Clone, Debug, Default)]
pub struct AnalyzerConfig {
    pub filter: ExclusionFilter,
    pub options: GenerationOptions,
}

/// Where a finished run left its artifacts.
#[derive(Clone, Debug)]
pub struct AnalysisOutcome {
    pub findings_path: PathBuf,
    pub summaries_path: PathBuf,
    pub guide: Guide,
    pub report: WalkReport,
}

/// Runs the full pipeline: init, root pass, directory pass, guide.
pub struct ProjectAnalyzer<'a> {
    ctx: &'a RunContext,
    generator: &'a dyn TextGenerator,
    config: AnalyzerConfig,
}

impl<'a> ProjectAnalyzer<'a> {
    pub fn new(
        ctx: &'a RunContext,
        generator: &'a dyn TextGenerator,
        config: AnalyzerConfig,
    ) -> Self {
        Self {
            ctx,
            generator,
            config,
        }
    }

    #[instrument(skip_all)]
    pub async fn analyze(&self) -> Result<AnalysisOutcome, EngineError> {
        info!(
            run = %self.ctx.run_id,
            project = %self.ctx.project_root.display(),
            output = %self.ctx.run_dir().display(),
            "analysis started"
        );
        let store = FindingsStore::init(self.ctx.findings_path())?;
        let log = SummaryLog::new(self.ctx.summaries_path());

        let report = TreeWalker::new(self.ctx, self.generator, &self.config.filter, &store, &log)
            .with_options(self.config.options.clone())
            .run()
            .await?;

        let guide = GuideBuilder::new(self.ctx, self.generator)
            .with_options(self.config.options.clone())
            .build(&store, &log)
            .await?;

        info!(guide = %guide.path.display(), "analysis finished");
        Ok(AnalysisOutcome {
            findings_path: store.path().to_path_buf(),
            summaries_path: log.path().to_path_buf(),
            guide,
            report,
        })
    }
}
