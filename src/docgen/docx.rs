//! DOCX renderers: the single-spaced layout and the ABNT layout.
//!
//! Both consume the composer's span model untouched; only margins, fonts,
//! spacing and the ABNT signature blocks differ between them.

use std::io::Cursor;

use docx_rs::{
    AlignmentType, Docx, LineSpacing, PageMargin, Paragraph, Run, RunFonts, SpecialIndentType,
};

use super::common::document_filename;
use super::composer::{compose, named_procuradores, TextSpan, DIRETOR, OUTORGANTE_ASSINATURA};
use super::{GeneratedDocument, RenderError};
use crate::procuracao::models::Procuracao;

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const SIGNATURE_LINE: &str = "________________________________________";

/// Render the single-spaced layout: 1-inch margins, centered bold title,
/// justified body with first-line indent, centered closing.
pub fn render_docx(record: &Procuracao) -> Result<GeneratedDocument, RenderError> {
    let composed = compose(record);

    let docx = Docx::new()
        .page_margin(
            PageMargin::new()
                .top(1440)
                .right(1440)
                .bottom(1440)
                .left(1440),
        )
        .add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Center)
                .line_spacing(LineSpacing::new().after(400))
                .add_run(Run::new().add_text(composed.title.as_str()).bold().size(24)),
        )
        .add_paragraph(
            body_paragraph(&composed.body).line_spacing(LineSpacing::new().after(600)),
        )
        .add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Center)
                .add_run(Run::new().add_text(composed.closing.as_str())),
        );

    Ok(GeneratedDocument {
        filename: format!("{}.docx", document_filename(record, "procuracao")),
        bytes: pack(docx)?,
        mime: DOCX_MIME,
    })
}

/// Render the ABNT layout: Times New Roman 12pt, 3cm/2cm margins, 1.5 line
/// spacing, uppercase title, and centered signature blocks for the grantor
/// and each named procurator.
pub fn render_abnt_docx(record: &Procuracao) -> Result<GeneratedDocument, RenderError> {
    let composed = compose(record);

    let mut docx = Docx::new()
        .page_margin(
            PageMargin::new()
                .top(1701)
                .right(1134)
                .bottom(1134)
                .left(1701),
        )
        .default_fonts(
            RunFonts::new()
                .ascii("Times New Roman")
                .hi_ansi("Times New Roman"),
        )
        .default_size(24)
        .add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Center)
                .line_spacing(LineSpacing::new().after(800))
                .add_run(Run::new().add_text(composed.title.as_str()).bold().size(28)),
        )
        .add_paragraph(body_paragraph(&composed.body).line_spacing(LineSpacing::new().line(360)))
        .add_paragraph(
            Paragraph::new()
                .line_spacing(LineSpacing::new().after(400))
                .add_run(Run::new().add_text("")),
        )
        .add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Center)
                .line_spacing(LineSpacing::new().after(800))
                .add_run(Run::new().add_text(composed.closing.as_str())),
        );

    for paragraph in signature_blocks(record) {
        docx = docx.add_paragraph(paragraph);
    }

    Ok(GeneratedDocument {
        filename: format!("{}.docx", document_filename(record, "procuracao_ABNT")),
        bytes: pack(docx)?,
        mime: DOCX_MIME,
    })
}

/// The grantor block (company over the representative line), then one block
/// per procurator that has a name.
fn signature_blocks(record: &Procuracao) -> Vec<Paragraph> {
    let mut paragraphs = vec![
        centered(SIGNATURE_LINE),
        Paragraph::new()
            .align(AlignmentType::Center)
            .add_run(Run::new().add_text(OUTORGANTE_ASSINATURA).bold()),
        Paragraph::new()
            .align(AlignmentType::Center)
            .line_spacing(LineSpacing::new().after(400))
            .add_run(Run::new().add_text(format!("p.p. {}", DIRETOR))),
    ];

    for nome in named_procuradores(record) {
        paragraphs.push(centered(SIGNATURE_LINE));
        paragraphs.push(
            Paragraph::new()
                .align(AlignmentType::Center)
                .line_spacing(LineSpacing::new().after(400))
                .add_run(Run::new().add_text(nome).bold()),
        );
    }

    paragraphs
}

fn centered(text: &str) -> Paragraph {
    Paragraph::new()
        .align(AlignmentType::Center)
        .add_run(Run::new().add_text(text))
}

fn body_paragraph(spans: &[TextSpan]) -> Paragraph {
    let mut paragraph = Paragraph::new()
        .align(AlignmentType::Both)
        .indent(None, Some(SpecialIndentType::FirstLine(720)), None, None);
    for span in spans {
        let run = Run::new().add_text(span.text.as_str());
        paragraph = paragraph.add_run(if span.bold { run.bold() } else { run });
    }
    paragraph
}

fn pack(docx: Docx) -> Result<Vec<u8>, RenderError> {
    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| RenderError::DocxBuild(e.to_string()))?;
    Ok(buffer.into_inner())
}
