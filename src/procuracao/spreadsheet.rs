//! Spreadsheet extraction.
//!
//! Maps the fixed 28-column upload layout into [`Procuracao`] records. The
//! header row is skipped, all-blank rows are discarded, native date cells
//! become `YYYY-MM-DD` strings and each procurator address is synthesized
//! once from its four fragment columns.

use std::io::Cursor;

use calamine::{Data, DataType, Reader, Xlsx};
use thiserror::Error;

use super::models::Procuracao;

/// Column positions of the upload contract. Columns 14-21 interleave the two
/// procurators' address fragments (even = procurator 1, odd = procurator 2).
const COL_CARIMBO: usize = 0;
const COL_SOLICITANTE: usize = 1;
const COL_DATA_SOLICITACAO: usize = 2;
const COL_OBRA: usize = 3;
const COL_P1_NOME: usize = 4;
const COL_P2_NOME: usize = 5;
const COL_P1_EMAIL: usize = 6;
const COL_P2_EMAIL: usize = 7;
const COL_P1_NACIONALIDADE: usize = 8;
const COL_P2_NACIONALIDADE: usize = 9;
const COL_P1_PROFISSAO: usize = 10;
const COL_P2_PROFISSAO: usize = 11;
const COL_P1_ESTADO_CIVIL: usize = 12;
const COL_P2_ESTADO_CIVIL: usize = 13;
const COLS_P1_ENDERECO: [usize; 4] = [14, 16, 18, 20];
const COLS_P2_ENDERECO: [usize; 4] = [15, 17, 19, 21];
const COL_P1_RG: usize = 22;
const COL_P2_RG: usize = 23;
const COL_P1_CPF: usize = 24;
const COL_P2_CPF: usize = 25;
const COL_DATA_ULTIMA_PROCURACAO: usize = 26;
const COL_CONTA_CORRENTE: usize = 27;

/// Extraction failures, already phrased for the end user.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("A planilha parece estar vazia ou não contém dados nas linhas após o cabeçalho.")]
    NoDataRows,
    #[error(
        "Falha ao ler o arquivo. Verifique se o formato está correto e corresponde ao modelo esperado."
    )]
    Unreadable(#[source] calamine::XlsxError),
}

/// Parse an uploaded spreadsheet into records, in row order.
///
/// Deterministic: parsing the same bytes twice yields the same sequence. Any
/// lower-level read failure is re-signaled as [`ParseError::Unreadable`]; an
/// upload with no data rows after the header is [`ParseError::NoDataRows`].
pub fn parse_spreadsheet(bytes: &[u8]) -> Result<Vec<Procuracao>, ParseError> {
    let mut workbook =
        Xlsx::new(Cursor::new(bytes.to_vec())).map_err(ParseError::Unreadable)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => range,
        Some(Err(e)) => return Err(ParseError::Unreadable(e)),
        None => return Err(ParseError::NoDataRows),
    };

    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    let mut records = Vec::new();
    for (offset, row) in range.rows().enumerate() {
        // Absolute row 0 is the header.
        if start_row as usize + offset == 0 {
            continue;
        }
        if let Some(record) = extract_row(row, start_col as usize) {
            records.push(record);
        }
    }

    if records.is_empty() {
        return Err(ParseError::NoDataRows);
    }
    Ok(records)
}

/// Map one data row to a record; `None` when every cell is blank.
fn extract_row(row: &[Data], start_col: usize) -> Option<Procuracao> {
    if row.iter().all(|cell| cell_string(cell).is_empty()) {
        return None;
    }

    let at = |col: usize| col.checked_sub(start_col).and_then(|i| row.get(i));
    let text = |col: usize| optional(at(col).map(cell_string).unwrap_or_default());
    let date = |col: usize| optional(at(col).map(cell_date_string).unwrap_or_default());
    let endereco = |cols: &[usize; 4]| {
        let joined = cols
            .iter()
            .filter_map(|&col| at(col).map(cell_string))
            .filter(|fragment| !fragment.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        optional(joined)
    };

    Some(Procuracao {
        carimbo_data_hora: date(COL_CARIMBO),
        solicitante: text(COL_SOLICITANTE),
        data_solicitacao: date(COL_DATA_SOLICITACAO),
        obra: text(COL_OBRA),
        procurador1_nome: text(COL_P1_NOME),
        procurador2_nome: text(COL_P2_NOME),
        procurador1_email: text(COL_P1_EMAIL),
        procurador2_email: text(COL_P2_EMAIL),
        procurador1_nacionalidade: text(COL_P1_NACIONALIDADE),
        procurador2_nacionalidade: text(COL_P2_NACIONALIDADE),
        procurador1_profissao: text(COL_P1_PROFISSAO),
        procurador2_profissao: text(COL_P2_PROFISSAO),
        procurador1_estado_civil: text(COL_P1_ESTADO_CIVIL),
        procurador2_estado_civil: text(COL_P2_ESTADO_CIVIL),
        procurador1_endereco: endereco(&COLS_P1_ENDERECO),
        procurador2_endereco: endereco(&COLS_P2_ENDERECO),
        procurador1_rg: text(COL_P1_RG),
        procurador2_rg: text(COL_P2_RG),
        procurador1_cpf: text(COL_P1_CPF),
        procurador2_cpf: text(COL_P2_CPF),
        data_ultima_procuracao: date(COL_DATA_ULTIMA_PROCURACAO),
        conta_corrente: text(COL_CONTA_CORRENTE),
        ..Default::default()
    })
}

fn optional(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Trimmed textual form of a cell. Integral floats drop the decimal point so
/// account numbers read back the way they were typed.
fn cell_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Error(e) => e.to_string(),
    }
}

/// Date cells become a plain `YYYY-MM-DD` calendar string. Calamine yields
/// naive date-times, so the calendar day is preserved no matter the host
/// timezone. Non-date cells fall back to the trimmed string form.
fn cell_date_string(cell: &Data) -> String {
    match cell {
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| dt.date().format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        other => cell_string(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> Data {
        Data::String(value.to_string())
    }

    fn row_with(cells: Vec<(usize, Data)>) -> Vec<Data> {
        let mut row = vec![Data::Empty; 28];
        for (col, cell) in cells {
            row[col] = cell;
        }
        row
    }

    #[test]
    fn test_blank_row_is_discarded() {
        let row = vec![Data::Empty; 28];
        assert!(extract_row(&row, 0).is_none());
        let whitespace = row_with(vec![(3, s("   "))]);
        assert!(extract_row(&whitespace, 0).is_none());
    }

    #[test]
    fn test_address_synthesis_skips_blank_fragments() {
        let row = row_with(vec![
            (3, s("Obra Y")),
            (14, s("Rua A")),
            (16, s("")),
            (18, s("Bairro B")),
            (20, s("Cidade C")),
        ]);
        let record = extract_row(&row, 0).unwrap();
        assert_eq!(
            record.procurador1_endereco.as_deref(),
            Some("Rua A, Bairro B, Cidade C")
        );
        assert!(record.procurador2_endereco.is_none());
    }

    #[test]
    fn test_numeric_account_keeps_integral_form() {
        let row = row_with(vec![(3, s("Obra Z")), (27, Data::Float(104532.0))]);
        let record = extract_row(&row, 0).unwrap();
        assert_eq!(record.conta_corrente.as_deref(), Some("104532"));
    }

    #[test]
    fn test_column_mapping() {
        let row = row_with(vec![
            (1, s("Fulano")),
            (3, s("Edifício X")),
            (4, s("Maria Silva")),
            (5, s("João Souza")),
            (24, s("123.456.789-00")),
            (25, s("987.654.321-00")),
        ]);
        let record = extract_row(&row, 0).unwrap();
        assert_eq!(record.solicitante.as_deref(), Some("Fulano"));
        assert_eq!(record.obra.as_deref(), Some("Edifício X"));
        assert_eq!(record.procurador1_nome.as_deref(), Some("Maria Silva"));
        assert_eq!(record.procurador2_nome.as_deref(), Some("João Souza"));
        assert_eq!(record.procurador1_cpf.as_deref(), Some("123.456.789-00"));
        assert_eq!(record.procurador2_cpf.as_deref(), Some("987.654.321-00"));
    }

    #[test]
    fn test_garbage_bytes_are_unreadable() {
        let err = parse_spreadsheet(b"definitely not a zip").unwrap_err();
        assert!(matches!(err, ParseError::Unreadable(_)));
        assert!(err.to_string().starts_with("Falha ao ler o arquivo."));
    }
}
