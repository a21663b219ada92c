//! Completeness check for procuração records.
//!
//! The check is advisory: generation handlers refuse an incomplete record
//! only until the caller confirms the override, so the status carries the
//! full human-readable list of what is missing.

use serde::Serialize;
use utoipa::ToSchema;

use crate::procuracao::models::{is_blank, Procuracao};

/// Required fields with their user-facing labels, in declaration order. The
/// order is load-bearing: the missing-field message lists labels in exactly
/// this sequence.
const CAMPOS_OBRIGATORIOS: [(&str, &str); 4] = [
    ("obra", "Obra"),
    ("procurador1_nome", "Nome do Procurador 1"),
    ("procurador1_cpf", "CPF do Procurador 1"),
    ("conta_corrente", "Conta Corrente"),
];

/// Outcome of validating the selected record.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ValidationStatus {
    pub valid: bool,
    #[schema(example = "Campos obrigatórios faltando: Obra, Conta Corrente.")]
    pub message: String,
}

/// Validate the selected record, if any.
///
/// `conta_corrente` holding the literal `0` is a present value; only
/// absent/blank-after-trim counts as missing for every required field.
pub fn validate(record: Option<&Procuracao>) -> ValidationStatus {
    let Some(record) = record else {
        return ValidationStatus {
            valid: false,
            message: "Aguardando dados para validação.".to_string(),
        };
    };

    let missing: Vec<&str> = CAMPOS_OBRIGATORIOS
        .iter()
        .filter(|(field, _)| is_blank(field_of(record, field)))
        .map(|(_, label)| *label)
        .collect();

    if missing.is_empty() {
        ValidationStatus {
            valid: true,
            message: "Dados essenciais preenchidos.".to_string(),
        }
    } else {
        ValidationStatus {
            valid: false,
            message: format!("Campos obrigatórios faltando: {}.", missing.join(", ")),
        }
    }
}

fn field_of<'a>(record: &'a Procuracao, field: &str) -> &'a Option<String> {
    match field {
        "obra" => &record.obra,
        "procurador1_nome" => &record.procurador1_nome,
        "procurador1_cpf" => &record.procurador1_cpf,
        "conta_corrente" => &record.conta_corrente,
        _ => unreachable!("unknown required field {field}"),
    }
}
