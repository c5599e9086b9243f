//! Command implementations.

pub mod analyze;
pub mod classify;

pub use self::analyze::execute_analyze;
pub use self::classify::execute_classify;

use crate::error::Result;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Read document text from a path, or stdin for "-".
///
/// Returns the text and the file name to classify by when none is given.
pub(crate) fn read_document(path: &str) -> Result<(String, String)> {
    if path == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok((buffer, "stdin".to_string()));
    }

    let text = fs::read_to_string(path)?;
    let filename = Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    Ok((text, filename))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_read_document_uses_file_name() {
        let mut file = Builder::new().prefix("NDA-acme").suffix(".txt").tempfile().unwrap();
        write!(file, "Confidential Information").unwrap();

        let (text, filename) = read_document(file.path().to_str().unwrap()).unwrap();
        assert_eq!(text, "Confidential Information");
        assert!(filename.starts_with("NDA-acme"));
        assert!(!filename.contains('/'));
    }

    #[test]
    fn test_read_missing_document() {
        assert!(read_document("/nonexistent/covenant/doc.txt").is_err());
    }
}
