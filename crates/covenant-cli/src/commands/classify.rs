//! Classify command implementation.

use super::read_document;
use crate::cli::ClassifyArgs;
use crate::error::Result;
use crate::output::Formatter;
use covenant_domain::classify;

/// Execute the classify command.
pub fn execute_classify(args: ClassifyArgs, formatter: &Formatter) -> Result<()> {
    let (text, default_name) = read_document(&args.file)?;
    let filename = args.filename.unwrap_or(default_name);

    let document_type = classify(&text, &filename);
    println!("{}", formatter.format_classification(&filename, document_type)?);

    Ok(())
}
