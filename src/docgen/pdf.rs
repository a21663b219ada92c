//! PDF renderer.
//!
//! Lays the composed deed out as a flat single-font A4 page expressed in
//! Typst markup and compiled through [`TypstEngine`]. The body is the
//! composer's flat text, so the PDF carries exactly the same clause bytes as
//! the DOCX variants and the preview.

use super::common::{document_filename, escape_typst_string};
use super::composer::{compose, ComposedProcuracao};
use super::engine::TypstEngine;
use super::{GeneratedDocument, RenderError};
use crate::procuracao::models::Procuracao;

pub const PDF_MIME: &str = "application/pdf";

/// Render the flat PDF layout.
pub fn render_pdf(record: &Procuracao) -> Result<GeneratedDocument, RenderError> {
    let composed = compose(record);
    let bytes = TypstEngine::compile(&typst_source(&composed))?;

    Ok(GeneratedDocument {
        filename: format!("{}.pdf", document_filename(record, "procuracao")),
        bytes,
        mime: PDF_MIME,
    })
}

/// Assemble the Typst source: centered bold title, justified body at page
/// width, centered closing.
pub fn typst_source(composed: &ComposedProcuracao) -> String {
    format!(
        concat!(
            "#set page(paper: \"a4\", margin: 20mm)\n",
            "#set text(font: \"Helvetica\", size: 11pt, fallback: true)\n",
            "#set par(justify: true)\n",
            "\n",
            "#align(center, text(size: 14pt, weight: \"bold\", \"{title}\"))\n",
            "\n",
            "#v(1.5em)\n",
            "\n",
            "#text(\"{body}\")\n",
            "\n",
            "#v(2em)\n",
            "\n",
            "#align(center, text(\"{closing}\"))\n",
        ),
        title = escape_typst_string(&composed.title),
        body = escape_typst_string(&composed.body_text()),
        closing = escape_typst_string(&composed.closing),
    )
}
