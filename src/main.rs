use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;

use intellidoc_core::{DecodingMethod, GenerationOptions, RunContext, RunId, TextGenerator};
use intellidoc_engine::{AnalyzerConfig, ExclusionFilter, InteractiveSession, ProjectAnalyzer};
use intellidoc_llm::{models, WatsonxProvider};
use intellidoc_server::ServerConfig;
use intellidoc_store::SummaryLog;
use intellidoc_telemetry::TelemetryConfig;

mod chat;
mod cli;
mod config;

use cli::Cli;
use config::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // .env first so RUST_LOG from it is honoured; the real environment wins.
    let dotenv = dotenvy::dotenv();

    let telemetry = intellidoc_telemetry::init_telemetry(TelemetryConfig {
        log_level: cli.log_level,
        format: cli.log_format,
        ..TelemetryConfig::default()
    });
    tracing::debug!(filter = telemetry.filter(), "telemetry initialized");
    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "fatal");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let app = AppConfig::from_env()?;
    let project_root = config::resolve_target(&cli.target_folder)?;
    let output_root = config::resolve_output(&cli.output_dir)
        .with_context(|| format!("resolving output directory {}", cli.output_dir.display()))?;

    let provider = WatsonxProvider::connect(app.watsonx)
        .await
        .context("authentication with the generation backend failed")?;
    let generator: Arc<dyn TextGenerator> = Arc::new(provider);
    let model_name = models::find_model(generator.model())
        .map_or(generator.model(), |m| m.display_name);
    tracing::info!(
        model = generator.model(),
        name = model_name,
        context_window = generator.context_window(),
        "generation backend ready"
    );

    let ctx = RunContext::new(RunId::now(), project_root, output_root);
    let options = GenerationOptions {
        decoding_method: DecodingMethod::Greedy,
        max_new_tokens: cli.max_new_tokens,
    };
    let analyzer_config = AnalyzerConfig {
        filter: ExclusionFilter::with_defaults().extend(cli.exclude.iter().cloned()),
        options: options.clone(),
    };

    let outcome = ProjectAnalyzer::new(&ctx, generator.as_ref(), analyzer_config)
        .analyze()
        .await
        .context("project analysis failed")?;

    println!("Findings:  {}", outcome.findings_path.display());
    println!("Summaries: {}", outcome.summaries_path.display());
    println!("Guide:     {}", outcome.guide.path.display());
    tracing::info!(
        files = outcome.report.files_summarized,
        skipped = outcome.report.files_skipped,
        directories = outcome.report.directories_summarized,
        placeholders = outcome.report.placeholders,
        "run complete"
    );

    if !cli.chatbot {
        return Ok(());
    }

    let session = InteractiveSession::from_log(generator, &SummaryLog::new(ctx.summaries_path()))
        .context("starting interactive session")?
        .with_options(options);

    match cli.serve {
        Some(port) => {
            let config = ServerConfig {
                port,
                ..ServerConfig::default()
            };
            let handle = intellidoc_server::start(config, session)
                .await
                .with_context(|| format!("binding chat server on port {port}"))?;
            println!("Chat server listening on port {}", handle.port);
            tokio::signal::ctrl_c()
                .await
                .context("waiting for ctrl+c")?;
            handle.shutdown();
            tracing::info!("shutting down");
        }
        None => {
            let mut session = session;
            chat::run_chat(
                &mut session,
                BufReader::new(tokio::io::stdin()),
                tokio::io::stdout(),
            )
            .await
            .context("terminal chat failed")?;
        }
    }
    Ok(())
}
