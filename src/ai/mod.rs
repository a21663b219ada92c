//! AI text-correction and analysis collaborators.
//!
//! The core never depends on the calls succeeding: correction is fail-open
//! (any failure silently keeps the pre-correction record) and analysis is
//! purely advisory. The [`TextCorrector`] port keeps the HTTP client out of
//! the pipeline so tests can swap in a stub.

pub mod gemini;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::procuracao::models::{is_blank, Procuracao};

pub use gemini::GeminiCorrector;

/// The free-text subset sent for correction. Empty strings stand for absent
/// fields on both directions of the call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionFields {
    pub procurador1_nome: String,
    pub procurador1_nacionalidade: String,
    pub procurador1_profissao: String,
    pub procurador1_estado_civil: String,
    pub procurador1_endereco: String,
    pub procurador2_nome: String,
    pub procurador2_nacionalidade: String,
    pub procurador2_profissao: String,
    pub procurador2_estado_civil: String,
    pub procurador2_endereco: String,
    pub obra: String,
    pub cidade_emissao: String,
}

/// Failures talking to the AI collaborator.
#[derive(Debug, Error)]
pub enum AiCallError {
    #[error("GEMINI_API_KEY não configurada")]
    NotConfigured,
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Gemini returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("unexpected Gemini payload: {0}")]
    Malformed(String),
}

/// Capability port over the external text-correction/analysis service.
#[async_trait]
pub trait TextCorrector: Send + Sync {
    /// Return a corrected variant of the given free-text fields.
    async fn correct(&self, input: &CorrectionFields) -> Result<CorrectionFields, AiCallError>;

    /// Free-form advisory review of a full record.
    async fn analyze(&self, record: &Procuracao) -> Result<String, AiCallError>;
}

/// Project the correctable subset out of a record.
pub fn correction_input(record: &Procuracao) -> CorrectionFields {
    let text = |value: &Option<String>| match value {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => String::new(),
    };
    CorrectionFields {
        procurador1_nome: text(&record.procurador1_nome),
        procurador1_nacionalidade: text(&record.procurador1_nacionalidade),
        procurador1_profissao: text(&record.procurador1_profissao),
        procurador1_estado_civil: text(&record.procurador1_estado_civil),
        procurador1_endereco: text(&record.procurador1_endereco),
        procurador2_nome: text(&record.procurador2_nome),
        procurador2_nacionalidade: text(&record.procurador2_nacionalidade),
        procurador2_profissao: text(&record.procurador2_profissao),
        procurador2_estado_civil: text(&record.procurador2_estado_civil),
        procurador2_endereco: text(&record.procurador2_endereco),
        obra: text(&record.obra),
        cidade_emissao: match &record.cidade_emissao {
            Some(s) if !s.trim().is_empty() => s.trim().to_string(),
            _ => "Belo Horizonte".to_string(),
        },
    }
}

/// Merge corrected values back into a record.
///
/// A corrected value lands only where the source field already had content;
/// a field that was blank stays blank no matter what came back.
pub fn apply_correction(record: &Procuracao, corrected: &CorrectionFields) -> Procuracao {
    let mut merged = record.clone();
    let merge = |target: &mut Option<String>, corrected: &str| {
        if !is_blank(target) && !corrected.trim().is_empty() {
            *target = Some(corrected.trim().to_string());
        }
    };
    merge(&mut merged.procurador1_nome, &corrected.procurador1_nome);
    merge(
        &mut merged.procurador1_nacionalidade,
        &corrected.procurador1_nacionalidade,
    );
    merge(
        &mut merged.procurador1_profissao,
        &corrected.procurador1_profissao,
    );
    merge(
        &mut merged.procurador1_estado_civil,
        &corrected.procurador1_estado_civil,
    );
    merge(
        &mut merged.procurador1_endereco,
        &corrected.procurador1_endereco,
    );
    merge(&mut merged.procurador2_nome, &corrected.procurador2_nome);
    merge(
        &mut merged.procurador2_nacionalidade,
        &corrected.procurador2_nacionalidade,
    );
    merge(
        &mut merged.procurador2_profissao,
        &corrected.procurador2_profissao,
    );
    merge(
        &mut merged.procurador2_estado_civil,
        &corrected.procurador2_estado_civil,
    );
    merge(
        &mut merged.procurador2_endereco,
        &corrected.procurador2_endereco,
    );
    merge(&mut merged.obra, &corrected.obra);
    merge(&mut merged.cidade_emissao, &corrected.cidade_emissao);
    merged
}

/// Run the corrector fail-open.
///
/// Records with no procurator name and no obra are not worth a round-trip
/// and come back untouched, as does anything that errors along the way.
/// Returns the effective record and whether a correction was applied.
pub async fn correct_record(
    corrector: &dyn TextCorrector,
    record: &Procuracao,
) -> (Procuracao, bool) {
    let input = correction_input(record);
    if input.procurador1_nome.is_empty()
        && input.procurador2_nome.is_empty()
        && input.obra.is_empty()
    {
        return (record.clone(), false);
    }

    match corrector.correct(&input).await {
        Ok(corrected) => (apply_correction(record, &corrected), true),
        Err(e) => {
            log::warn!("correção com IA indisponível, mantendo dados originais: {e}");
            (record.clone(), false)
        }
    }
}
