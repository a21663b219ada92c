//! Common utilities for document generation.
//!
//! Shared helpers for date resolution and formatting, derived filenames, and
//! Typst source escaping.

use chrono::{Datelike, NaiveDate, Utc};

use crate::procuracao::models::{field_text_or, Procuracao};

const MESES: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Format a calendar date the long Brazilian way, e.g. "15 de março de 2024".
pub fn format_portuguese_date(date: NaiveDate) -> String {
    let month = MESES[(date.month0() as usize).min(MESES.len() - 1)];
    format!("{} de {} de {}", date.day(), month, date.year())
}

/// Resolve the request date of a record.
///
/// Takes `data_solicitacao`, defaulting to today (UTC) when absent. The value
/// may be a full timestamp, so it is split on `T` and the `YYYY-MM-DD`
/// components are turned into a plain calendar date; parsing from the
/// year/month/day parts keeps the calendar day stable regardless of any time
/// or offset suffix. Values that do not form a real date also fall back to
/// today.
pub fn resolve_request_date(record: &Procuracao) -> NaiveDate {
    let today = Utc::now().date_naive();
    let raw = field_text_or(&record.data_solicitacao, "");
    if raw.is_empty() {
        return today;
    }
    parse_calendar_date(&raw).unwrap_or(today)
}

fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split('T').next()?;
    let mut parts = date_part.splitn(3, '-');
    let year: i32 = parts.next()?.trim().parse().ok()?;
    let month: u32 = parts.next()?.trim().parse().ok()?;
    let day: u32 = parts.next()?.trim().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Derived download filename: `{prefix}_{obra}_{YYYY-MM-DD}`.
///
/// The obra is folded to ASCII, every remaining non-alphanumeric byte becomes
/// an underscore and the result is lowercased; "Obra" stands in when the
/// field is absent.
pub fn document_filename(record: &Procuracao, prefix: &str) -> String {
    let obra = field_text_or(&record.obra, "Obra");
    let mut sanitized = String::with_capacity(obra.len());
    for ch in obra.chars() {
        for folded in fold_accent(ch).chars() {
            if folded.is_ascii_alphanumeric() {
                sanitized.push(folded.to_ascii_lowercase());
            } else {
                sanitized.push('_');
            }
        }
    }
    let date = Utc::now().date_naive().format("%Y-%m-%d");
    format!("{}_{}_{}", prefix, sanitized, date)
}

/// Map the Portuguese diacritics to their base letter; anything else passes
/// through unchanged.
fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        other => other,
    }
}

/// Escape special characters for Typst string literals.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\n', r"\n")
}
