//! Procuração domain: record model, spreadsheet extraction, mail link and
//! the HTTP handlers that drive the pipeline.

pub mod handlers;
pub mod mailto;
pub mod models;
pub mod spreadsheet;

pub use mailto::{mailto_link, MailtoLink};
pub use models::{field_text, field_text_or, is_blank, Procuracao, NAO_INFORMADO};
pub use spreadsheet::{parse_spreadsheet, ParseError};
