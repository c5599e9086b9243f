//! Analyze command implementation.

use super::read_document;
use crate::cli::AnalyzeArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use covenant_domain::{DocumentInput, DocumentType};
use covenant_extractor::AnalysisPipeline;
use tracing::debug;

/// Execute the analyze command.
pub async fn execute_analyze(args: AnalyzeArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let (text, default_name) = read_document(&args.file)?;
    let input = build_input(&args, text, default_name, formatter)?;

    let mut analyzer_config = config.analyzer.clone();
    if args.offline {
        analyzer_config.api_key = None;
    }
    let pipeline = AnalysisPipeline::from_config(analyzer_config)?;
    debug!("Using analyzer {}", pipeline.analyzer_name());

    let analysis = pipeline.analyze(&input).await;
    println!("{}", formatter.format_analysis(&analysis)?);

    Ok(())
}

fn build_input(
    args: &AnalyzeArgs,
    text: String,
    default_name: String,
    formatter: &Formatter,
) -> Result<DocumentInput> {
    let filename = args.filename.clone().unwrap_or(default_name);
    let mut input = DocumentInput::new(text, filename);

    if let Some(hint) = &args.doc_type {
        if DocumentType::parse(hint).is_none() {
            eprintln!(
                "{}",
                formatter.warning(&format!("Unrecognised document type '{}', classifying instead", hint))
            );
        }
        input = input.with_document_type(hint.clone());
    }

    if let Some(confidence) = args.confidence {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(CliError::InvalidInput(format!(
                "Confidence must be between 0.0 and 1.0, got {}",
                confidence
            )));
        }
        input = input.with_confidence(confidence);
    }

    Ok(input)
}
