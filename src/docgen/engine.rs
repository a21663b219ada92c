//! Typst rendering engine.
//!
//! Handles the low-level details of writing Typst source to a temporary
//! file, invoking the compiler, and reading back the output PDF.

use std::fs;
use std::process::Command;

use tempfile::tempdir;

use super::RenderError;

const SOURCE_FILENAME: &str = "procuracao.typ";
const OUTPUT_FILENAME: &str = "procuracao.pdf";

/// Stateless wrapper around the `typst` CLI.
///
/// An absent or broken CLI surfaces as a [`RenderError`], so a deployment
/// without Typst degrades to an error response on PDF generation while the
/// DOCX formats keep working.
pub struct TypstEngine;

impl TypstEngine {
    /// Compile a complete Typst source string to PDF bytes.
    pub fn compile(typst_source: &str) -> Result<Vec<u8>, RenderError> {
        let temp_dir = tempdir().map_err(RenderError::TempDir)?;
        let typ_path = temp_dir.path().join(SOURCE_FILENAME);
        fs::write(&typ_path, typst_source).map_err(RenderError::WriteSource)?;

        let output_path = temp_dir.path().join(OUTPUT_FILENAME);
        let status = Command::new("typst")
            .arg("compile")
            .arg(&typ_path)
            .arg(&output_path)
            .current_dir(temp_dir.path())
            .status()
            .map_err(RenderError::TypstIo)?;

        if !status.success() {
            let code = status.code().unwrap_or(-1);
            return Err(RenderError::TypstExit(code));
        }

        fs::read(&output_path).map_err(RenderError::ReadPdf)
    }
}
