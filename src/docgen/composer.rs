//! Canonical legal-text composition.
//!
//! Builds the single authoritative deed text from a record. Every renderer
//! (plain DOCX, ABNT DOCX, PDF) and the text preview consume this output;
//! none of them re-derives wording on its own, which is what keeps the three
//! artifacts textually identical for the same record.

use serde::Serialize;

use super::common::{format_portuguese_date, resolve_request_date};
use crate::procuracao::models::{field_text, field_text_or, is_blank, Procuracao};

pub const TITULO: &str = "PROCURAÇÃO";
pub const OUTORGANTE: &str = "LCM CONSTRUÇÃO E COMERCIO S/A";
/// The signature block spells the company name with the acute accent.
pub const OUTORGANTE_ASSINATURA: &str = "LCM CONSTRUÇÃO E COMÉRCIO S/A";
pub const DIRETOR: &str = "LUIZ OTÁVIO FONTES JUNQUEIRA";
pub const PROCURADORES_NAO_INFORMADOS: &str = "[PROCURADORES NÃO INFORMADOS]";
pub const INSTITUICAO_PADRAO: &str = "CAIXA ECONÔMICA FEDERAL";
pub const CIDADE_PADRAO: &str = "Belo Horizonte";

/// One styled run of the deed body. Renderers that support rich text apply
/// bold to exactly the spans marked here and to nothing else.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TextSpan {
    pub text: String,
    pub bold: bool,
}

impl TextSpan {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// The composed deed: title, styled body, closing line.
#[derive(Debug, Clone, Serialize)]
pub struct ComposedProcuracao {
    pub title: String,
    pub body: Vec<TextSpan>,
    pub closing: String,
    pub formatted_date: String,
}

impl ComposedProcuracao {
    /// Flat body text, used by the preview and the PDF renderer.
    pub fn body_text(&self) -> String {
        self.body.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Compose the deed for a record.
pub fn compose(record: &Procuracao) -> ComposedProcuracao {
    let formatted_date = format_portuguese_date(resolve_request_date(record));

    let mut body = Vec::new();
    body.push(TextSpan::plain(format!(
        "Pelo presente instrumento particular de procuração, firmado em {}, \
         subscreve este documento a outorgante ",
        formatted_date
    )));
    body.push(TextSpan::bold(OUTORGANTE));
    body.push(TextSpan::plain(
        ", CNPJ 19.758.842/0001-35, com sede nesta capital, na Rua Polos , \
         nº 150 – sala 201, representada por seu diretor ",
    ));
    body.push(TextSpan::bold(DIRETOR));
    body.push(TextSpan::plain(concat!(
        ", brasileiro, separado judicialmente, engenheiro civil, CPF 303.269.316-00, ",
        "CI M-738.694 (SSP/MG), residente em Nova Lima/MG, à rua cinco, 445, ",
        "Condomínio Riviera; parte(s) que se identificou(ram) ser(em) a(s) própria(s), ",
        "conforme documentação apresentada do que dou fé. E, pelo(a-s) outorgante(s) me ",
        "foi dito que nomeia(m) e constitui(em) seu(a-s) bastante(s) procurador(a-es): "
    )));
    body.extend(procuradores_spans(record));
    body.push(TextSpan::plain(format!(
        ", a quem confere poderes especiais para representar a outorgante perante a {}, \
         Agência: {} - Operação: {} - Conta {}, podendo ",
        field_text_or(&record.instituicao_financeira, INSTITUICAO_PADRAO),
        field_text(&record.agencia),
        field_text(&record.operacao),
        field_text(&record.conta_corrente),
    )));
    body.push(TextSpan::bold("SEMPRE EM CONJUNTO"));
    body.push(TextSpan::plain(concat!(
        " abrir , fechar, movimentá-la, emitir e endossar cheques, desde que tenham o ",
        "necessário saldo, fazer retiradas mediante recibos, autorizar débitos e ",
        "pagamentos por qualquer meio , inclusive eletrônico, requisitar talões de ",
        "cheques, fazer movimentações eletrônicas , cadastrar , alterar , desbloquear e ",
        "utilizar senhas eletrônicas no internet banking e, enfim, praticar todos os ",
        "demais atos necessários ao bom, fiel e completo desempenho deste mandato, "
    )));
    body.push(TextSpan::bold("NÃO PODENDO SUBSTABELECER"));
    body.push(TextSpan::plain(
        ". O qual terá prazo de validade de 01 (um) ano, a contar da presente data.",
    ));

    let closing = format!(
        "{}, {}.",
        field_text_or(&record.cidade_emissao, CIDADE_PADRAO),
        formatted_date
    );

    ComposedProcuracao {
        title: TITULO.to_string(),
        body,
        closing,
        formatted_date,
    }
}

/// The procurators clause: one fragment per procurator whose name is present,
/// names bold, fragments joined with `"; "`. With no named procurator the
/// clause is the fixed placeholder, bold.
pub fn procuradores_spans(record: &Procuracao) -> Vec<TextSpan> {
    let mut spans = Vec::new();
    for fields in record
        .procuradores()
        .iter()
        .filter(|p| !is_blank(p.nome))
    {
        if !spans.is_empty() {
            spans.push(TextSpan::plain("; "));
        }
        spans.push(TextSpan::bold(field_text(fields.nome).to_uppercase()));
        spans.push(TextSpan::plain(format!(
            ", {}, maior, {}, {}, CPF nº {} e carteira de identidade nº {}, \
             residente e domiciliado a {}",
            field_text(fields.nacionalidade),
            field_text(fields.estado_civil),
            field_text(fields.profissao),
            field_text(fields.cpf),
            field_text(fields.rg),
            field_text(fields.endereco),
        )));
    }
    if spans.is_empty() {
        spans.push(TextSpan::bold(PROCURADORES_NAO_INFORMADOS));
    }
    spans
}

/// Flat form of the procurators clause, convenient for assertions and logs.
pub fn procuradores_text(record: &Procuracao) -> String {
    procuradores_spans(record)
        .iter()
        .map(|s| s.text.as_str())
        .collect()
}

/// Uppercased names of the procurators that are present, in index order.
/// The ABNT layout derives one signature block from each.
pub fn named_procuradores(record: &Procuracao) -> Vec<String> {
    record
        .procuradores()
        .iter()
        .filter(|p| !is_blank(p.nome))
        .map(|p| field_text(p.nome).to_uppercase())
        .collect()
}
