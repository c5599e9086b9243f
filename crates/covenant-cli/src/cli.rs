//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};

/// Covenant CLI - Score business documents for risk.
#[derive(Debug, Parser)]
#[command(name = "covenant")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "COVENANT_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (score and grade only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a document's extracted text
    Analyze(AnalyzeArgs),

    /// Classify a document without analyzing it
    Classify(ClassifyArgs),

    /// Print the effective configuration
    Config,
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Text file to analyze ("-" reads stdin)
    pub file: String,

    /// Original file name, used for classification (defaults to the path's file name)
    #[arg(long)]
    pub filename: Option<String>,

    /// Document type hint (contract, nda, proposal, agreement, invoice, sow, msa)
    #[arg(short, long)]
    pub doc_type: Option<String>,

    /// Upstream text-extraction confidence (0.0-1.0)
    #[arg(long)]
    pub confidence: Option<f64>,

    /// Use rule-based analysis only, even if an API key is configured
    #[arg(long)]
    pub offline: bool,
}

/// Arguments for the classify command.
#[derive(Debug, Parser)]
pub struct ClassifyArgs {
    /// Text file to classify ("-" reads stdin)
    pub file: String,

    /// Original file name (defaults to the path's file name)
    #[arg(long)]
    pub filename: Option<String>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_command() {
        let cli = Cli::parse_from([
            "covenant",
            "analyze",
            "contract.txt",
            "--doc-type",
            "nda",
            "--offline",
        ]);
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.file, "contract.txt");
                assert_eq!(args.doc_type.as_deref(), Some("nda"));
                assert!(args.offline);
                assert!(args.filename.is_none());
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_global_format_after_subcommand() {
        let cli = Cli::parse_from(["covenant", "classify", "MSA-Acme.txt", "--format", "json"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(matches!(cli.command, Command::Classify(_)));
    }

    #[test]
    fn test_missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["covenant"]).is_err());
    }
}
