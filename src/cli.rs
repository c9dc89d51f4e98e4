use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

use intellidoc_core::provider::DEFAULT_MAX_NEW_TOKENS;
use intellidoc_telemetry::LogFormat;

/// Summarize a project bottom-up and write a developer guide.
#[derive(Debug, Parser)]
#[command(name = "intellidoc", version, about)]
pub struct Cli {
    /// Project directory to analyze.
    #[arg(short = 't', long = "target-folder", alias = "targetFolder", value_name = "DIR")]
    pub target_folder: PathBuf,

    /// Start an interactive session over the summaries after analysis.
    #[arg(long)]
    pub chatbot: bool,

    /// Serve the interactive session over HTTP instead of the terminal.
    #[arg(
        long,
        value_name = "PORT",
        requires = "chatbot",
        num_args = 0..=1,
        default_missing_value = "7860"
    )]
    pub serve: Option<u16>,

    /// Root directory for per-run artifacts.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Extra exclusion token, matched as a substring of relative paths.
    #[arg(long = "exclude", value_name = "TOKEN")]
    pub exclude: Vec<String>,

    #[arg(long, default_value_t = DEFAULT_MAX_NEW_TOKENS)]
    pub max_new_tokens: u32,

    #[arg(long, default_value = "pretty")]
    pub log_format: LogFormat,

    #[arg(long, default_value = "info")]
    pub log_level: Level,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn legacy_flag_spelling_is_accepted() {
        let cli = Cli::try_parse_from(["intellidoc", "--targetFolder", "/tmp/p"]).unwrap();
        assert_eq!(cli.target_folder, PathBuf::from("/tmp/p"));
        assert!(!cli.chatbot);
        assert_eq!(cli.max_new_tokens, 512);
        assert_eq!(cli.log_format, LogFormat::Pretty);
    }

    #[test]
    fn target_is_required() {
        assert!(Cli::try_parse_from(["intellidoc", "--chatbot"]).is_err());
    }

    #[test]
    fn serve_defaults_to_chat_port_and_needs_chatbot() {
        let cli = Cli::try_parse_from(["intellidoc", "-t", ".", "--chatbot", "--serve"]).unwrap();
        assert_eq!(cli.serve, Some(7860));

        let args = ["intellidoc", "-t", ".", "--chatbot", "--serve", "8080"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.serve, Some(8080));

        assert!(Cli::try_parse_from(["intellidoc", "-t", ".", "--serve"]).is_err());
    }

    #[test]
    fn exclude_is_repeatable() {
        let cli = Cli::try_parse_from([
            "intellidoc",
            "-t",
            ".",
            "--exclude",
            "target",
            "--exclude",
            "dist",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.exclude, vec!["target", "dist"]);
        assert_eq!(cli.log_format, LogFormat::Json);
    }
}
