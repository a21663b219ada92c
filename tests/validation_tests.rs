//! Validator behaviour over the public API.

use procuracao_server::docgen::validation::validate;
use procuracao_server::procuracao::models::Procuracao;

fn complete() -> Procuracao {
    Procuracao {
        obra: Some("Edifício X".into()),
        procurador1_nome: Some("Maria Silva".into()),
        procurador1_cpf: Some("123.456.789-00".into()),
        conta_corrente: Some("1000-5".into()),
        ..Default::default()
    }
}

#[test]
fn test_missing_cpf_names_exactly_that_label() {
    let mut record = complete();
    record.procurador1_cpf = Some("".into());
    let status = validate(Some(&record));
    assert!(!status.valid);
    assert_eq!(
        status.message,
        "Campos obrigatórios faltando: CPF do Procurador 1."
    );
}

#[test]
fn test_conta_corrente_zero_counts_as_present() {
    let record: Procuracao = serde_json::from_str(
        r#"{
            "obra": "Edifício X",
            "procurador1_nome": "Maria Silva",
            "procurador1_cpf": "123.456.789-00",
            "conta_corrente": 0
        }"#,
    )
    .unwrap();
    let status = validate(Some(&record));
    assert!(status.valid, "conta_corrente = 0 must not be flagged: {}", status.message);
}

#[test]
fn test_all_fields_missing_lists_every_label_in_order() {
    let status = validate(Some(&Procuracao::default()));
    assert_eq!(
        status.message,
        "Campos obrigatórios faltando: Obra, Nome do Procurador 1, CPF do Procurador 1, Conta Corrente."
    );
}

#[test]
fn test_no_record_is_awaiting_data() {
    let status = validate(None);
    assert!(!status.valid);
    assert_eq!(status.message, "Aguardando dados para validação.");
}
