//! Document generation - turns a procuração record into downloadable files.
//!
//! The pipeline is composer-first: [`composer`] builds the one authoritative
//! deed text, and each renderer ([`docx`], [`pdf`]) only lays that text out.
//! Three output encodings are supported: a single-spaced DOCX, an
//! ABNT-styled DOCX with signature blocks, and a flat PDF.

pub mod common;
pub mod composer;
pub mod docx;
pub mod engine;
pub mod pdf;
pub mod validation;

pub use composer::{compose, ComposedProcuracao, TextSpan};
pub use docx::{render_abnt_docx, render_docx};
pub use pdf::render_pdf;
pub use validation::{validate, ValidationStatus};

use thiserror::Error;

/// Errors that can occur while rendering an output file.
///
/// A failure in one format aborts that action only; the other formats stay
/// independently retriable and no held state is touched.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to assemble the .docx package: {0}")]
    DocxBuild(String),
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteSource(#[source] std::io::Error),
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {0}")]
    TypstExit(i32),
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
}

/// Result of a successful document generation.
#[derive(Debug)]
pub struct GeneratedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}
