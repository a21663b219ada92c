//! `mailto:` link assembly.
//!
//! The server only resolves which procurator email to address and builds the
//! link; opening it (and any actual sending) is the caller's business.

use serde::Serialize;
use utoipa::ToSchema;

use super::models::{field_text_or, is_blank, Procuracao};

const CORPO_PADRAO: &str =
    "Prezados, \n\nSegue em anexo a procuração gerada pelo sistema. \n\nAtenciosamente.";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MailtoLink {
    #[schema(example = "mailto:maria@example.com?subject=Procura%C3%A7%C3%A3o...")]
    pub href: String,
    pub recipient: String,
    pub subject: String,
}

/// Build the mail link for a record: first procurator's email, else the
/// second's, else an empty recipient.
pub fn mailto_link(record: &Procuracao) -> MailtoLink {
    let recipient = if !is_blank(&record.procurador1_email) {
        field_text_or(&record.procurador1_email, "")
    } else {
        field_text_or(&record.procurador2_email, "")
    };
    let subject = format!(
        "Procuração - Obra {}",
        field_text_or(&record.obra, "Documento")
    );
    let href = format!(
        "mailto:{}?subject={}&body={}",
        recipient,
        encode_component(&subject),
        encode_component(CORPO_PADRAO)
    );
    MailtoLink {
        href,
        recipient,
        subject,
    }
}

/// Percent-encode a query component the way `encodeURIComponent` does:
/// ASCII alphanumerics and `-_.!~*'()` pass through, every other byte is
/// `%XX`-escaped.
fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => {
                out.push('%');
                out.push_str(&format!("{:02X}", byte));
            }
        }
    }
    out
}
