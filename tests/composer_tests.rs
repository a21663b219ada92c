//! End-to-end composition properties shared by every output format.

use procuracao_server::docgen::common::document_filename;
use procuracao_server::docgen::composer::{
    compose, procuradores_text, PROCURADORES_NAO_INFORMADOS,
};
use procuracao_server::docgen::pdf::typst_source;
use procuracao_server::procuracao::models::Procuracao;

fn scenario_record() -> Procuracao {
    Procuracao {
        obra: Some("Edifício X".into()),
        procurador1_nome: Some("Maria Silva".into()),
        procurador1_cpf: Some("123.456.789-00".into()),
        conta_corrente: Some("1000-5".into()),
        data_solicitacao: Some("2024-01-10".into()),
        ..Default::default()
    }
}

#[test]
fn test_closing_line_and_filename_scenario() {
    let composed = compose(&scenario_record());
    assert_eq!(composed.closing, "Belo Horizonte, 10 de janeiro de 2024.");

    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d");
    assert_eq!(
        document_filename(&scenario_record(), "procuracao"),
        format!("procuracao_edificio_x_{today}")
    );
}

#[test]
fn test_placeholder_clause_for_unnamed_procuradores() {
    assert_eq!(
        procuradores_text(&Procuracao::default()),
        PROCURADORES_NAO_INFORMADOS
    );
}

#[test]
fn test_single_procurador_clause_has_no_separator() {
    assert!(!procuradores_text(&scenario_record()).contains("; "));
}

/// The preview text and the PDF body must carry byte-identical
/// procurators-clause and banking-clause substrings; only layout differs.
#[test]
fn test_preview_and_pdf_share_clause_bytes() {
    let record = scenario_record();
    let composed = compose(&record);
    let preview_text = composed.body_text();
    let pdf_source = typst_source(&composed);

    let clause = procuradores_text(&record);
    assert!(preview_text.contains(&clause));
    assert!(pdf_source.contains(&clause));

    let banking = "Agência: [NÃO INFORMADO] - Operação: [NÃO INFORMADO] - Conta 1000-5";
    assert!(preview_text.contains(banking));
    assert!(pdf_source.contains(banking));
}

#[test]
fn test_rich_and_flat_body_agree() {
    let mut record = scenario_record();
    record.procurador2_nome = Some("João Souza".into());
    record.procurador2_cpf = Some("987.654.321-00".into());
    let composed = compose(&record);

    // The flat text is exactly the concatenation of the styled spans.
    let concatenated: String = composed.body.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(concatenated, composed.body_text());
    assert!(composed.body_text().contains("MARIA SILVA"));
    assert!(composed.body_text().contains("; JOÃO SOUZA"));
}

#[test]
fn test_request_date_with_timestamp_suffix() {
    let mut record = scenario_record();
    record.data_solicitacao = Some("2024-01-10T08:30:00.000Z".into());
    let composed = compose(&record);
    assert_eq!(composed.formatted_date, "10 de janeiro de 2024");
}
