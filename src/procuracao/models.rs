//! Canonical procuração record model.
//!
//! The record is an explicit struct of optional fields rather than a loose
//! map: any field may be absent, and absent, null and blank-after-trim are
//! all equivalent to "not informed". Every human-facing read goes through
//! [`field_text`] so the placeholder rendering is uniform across the
//! preview, the validator and all three renderers.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Placeholder rendered wherever a field is absent or blank.
pub const NAO_INFORMADO: &str = "[NÃO INFORMADO]";

/// A power-of-attorney request record.
///
/// Field names follow the upload spreadsheet / form contract verbatim, so a
/// record round-trips the wire unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Procuracao {
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub carimbo_data_hora: Option<String>,
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub solicitante: Option<String>,
    #[schema(example = "2024-01-10")]
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub data_solicitacao: Option<String>,
    #[schema(example = "Edifício Serra Azul")]
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub obra: Option<String>,

    #[schema(example = "CAIXA ECONÔMICA FEDERAL")]
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub instituicao_financeira: Option<String>,
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub agencia: Option<String>,
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub operacao: Option<String>,
    #[schema(example = "1000-5")]
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub conta_corrente: Option<String>,

    #[schema(example = "Maria Silva")]
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub procurador1_nome: Option<String>,
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub procurador1_email: Option<String>,
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub procurador1_nacionalidade: Option<String>,
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub procurador1_profissao: Option<String>,
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub procurador1_estado_civil: Option<String>,
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub procurador1_endereco: Option<String>,
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub procurador1_rg: Option<String>,
    #[schema(example = "123.456.789-00")]
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub procurador1_cpf: Option<String>,

    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub procurador2_nome: Option<String>,
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub procurador2_email: Option<String>,
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub procurador2_nacionalidade: Option<String>,
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub procurador2_profissao: Option<String>,
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub procurador2_estado_civil: Option<String>,
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub procurador2_endereco: Option<String>,
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub procurador2_rg: Option<String>,
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub procurador2_cpf: Option<String>,

    #[schema(example = "Belo Horizonte")]
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub cidade_emissao: Option<String>,
    #[serde(deserialize_with = "scalar_opt", skip_serializing_if = "Option::is_none")]
    pub data_ultima_procuracao: Option<String>,
}

/// Borrowed view over one procurator's field group.
#[derive(Debug, Clone, Copy)]
pub struct ProcuradorFields<'a> {
    pub nome: &'a Option<String>,
    pub email: &'a Option<String>,
    pub nacionalidade: &'a Option<String>,
    pub profissao: &'a Option<String>,
    pub estado_civil: &'a Option<String>,
    pub endereco: &'a Option<String>,
    pub rg: &'a Option<String>,
    pub cpf: &'a Option<String>,
}

impl Procuracao {
    /// Both procurator groups, in index order (1 then 2).
    pub fn procuradores(&self) -> [ProcuradorFields<'_>; 2] {
        [
            ProcuradorFields {
                nome: &self.procurador1_nome,
                email: &self.procurador1_email,
                nacionalidade: &self.procurador1_nacionalidade,
                profissao: &self.procurador1_profissao,
                estado_civil: &self.procurador1_estado_civil,
                endereco: &self.procurador1_endereco,
                rg: &self.procurador1_rg,
                cpf: &self.procurador1_cpf,
            },
            ProcuradorFields {
                nome: &self.procurador2_nome,
                email: &self.procurador2_email,
                nacionalidade: &self.procurador2_nacionalidade,
                profissao: &self.procurador2_profissao,
                estado_civil: &self.procurador2_estado_civil,
                endereco: &self.procurador2_endereco,
                rg: &self.procurador2_rg,
                cpf: &self.procurador2_cpf,
            },
        ]
    }
}

/// True when the field is absent or blank after trimming.
pub fn is_blank(value: &Option<String>) -> bool {
    match value {
        Some(s) => s.trim().is_empty(),
        None => true,
    }
}

/// Textual form of a field with an explicit fallback.
///
/// Returns the trimmed value when present and non-blank, otherwise the
/// fallback. Idempotent under repeated application.
pub fn field_text_or(value: &Option<String>, fallback: &str) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => fallback.to_string(),
    }
}

/// Textual form of a field with the shared `[NÃO INFORMADO]` fallback.
pub fn field_text(value: &Option<String>) -> String {
    field_text_or(value, NAO_INFORMADO)
}

/// Accepts a string, number or boolean where a scalar may appear and keeps
/// its decimal string form, so `"conta_corrente": 0` survives as `"0"`.
fn scalar_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_text_fallback() {
        assert_eq!(field_text(&None), NAO_INFORMADO);
        assert_eq!(field_text(&Some(String::new())), NAO_INFORMADO);
        assert_eq!(field_text(&Some("   ".to_string())), NAO_INFORMADO);
        assert_eq!(field_text(&Some("  Maria  ".to_string())), "Maria");
        assert_eq!(field_text_or(&None, "Obra"), "Obra");
    }

    #[test]
    fn test_field_text_idempotent() {
        let once = field_text(&Some(" Rua A ".to_string()));
        let twice = field_text(&Some(once.clone()));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_numeric_conta_corrente_deserializes_as_string() {
        let record: Procuracao =
            serde_json::from_str(r#"{"obra": "Edifício X", "conta_corrente": 0}"#).unwrap();
        assert_eq!(record.conta_corrente.as_deref(), Some("0"));
        assert!(!is_blank(&record.conta_corrente));
    }

    #[test]
    fn test_missing_fields_default_to_none() {
        let record: Procuracao = serde_json::from_str(r#"{"procurador1_nome": "Ana"}"#).unwrap();
        assert_eq!(record.procurador1_nome.as_deref(), Some("Ana"));
        assert!(record.obra.is_none());
        assert!(is_blank(&record.obra));
    }

    #[test]
    fn test_procuradores_view_order() {
        let record = Procuracao {
            procurador1_nome: Some("Primeiro".into()),
            procurador2_nome: Some("Segundo".into()),
            ..Default::default()
        };
        let [p1, p2] = record.procuradores();
        assert_eq!(p1.nome.as_deref(), Some("Primeiro"));
        assert_eq!(p2.nome.as_deref(), Some("Segundo"));
    }
}
