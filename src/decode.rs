// 🧾 Tabular Decoding - Parser framework for reference files
// Raw bytes -> header row + string cells, format picked from the identifier

use crate::error::{GrowthError, GrowthResult};
use csv::ReaderBuilder;
use tracing::debug;

// ============================================================================
// CORE TYPES
// ============================================================================

/// RawTable - Output of decoder.decode()
/// First sheet, header row as column names, cells as text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        RawTable { headers, rows }
    }

    /// Position of a column by exact (trimmed) header name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Cell text, empty when the row is shorter than the header
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// TableDecoder - Core trait for turning bytes into a RawTable
pub trait TableDecoder {
    /// `identifier` is only used to label errors
    fn decode(&self, identifier: &str, bytes: &[u8]) -> GrowthResult<RawTable>;

    fn format_name(&self) -> &str;
}

// ============================================================================
// DELIMITED TEXT
// ============================================================================

/// Delimited text tables (.csv with commas, WHO .txt tables with tabs)
pub struct DelimitedDecoder {
    delimiter: u8,
}

impl DelimitedDecoder {
    pub fn csv() -> Self {
        DelimitedDecoder { delimiter: b',' }
    }

    pub fn tsv() -> Self {
        DelimitedDecoder { delimiter: b'\t' }
    }
}

impl TableDecoder for DelimitedDecoder {
    fn decode(&self, identifier: &str, bytes: &[u8]) -> GrowthResult<RawTable> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| GrowthError::malformed(identifier, format!("unreadable header row: {}", e)))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (line_num, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                GrowthError::malformed(identifier, format!("line {}: {}", line_num + 2, e))
            })?;
            rows.push(record.iter().map(|c| c.trim().to_string()).collect());
        }

        debug!(identifier, columns = headers.len(), rows = rows.len(), "decoded delimited table");
        Ok(RawTable { headers, rows })
    }

    fn format_name(&self) -> &str {
        if self.delimiter == b'\t' {
            "tsv"
        } else {
            "csv"
        }
    }
}

// ============================================================================
// SPREADSHEET
// ============================================================================

/// Excel workbooks: first sheet, first row is the header
#[cfg(feature = "xlsx")]
pub struct SpreadsheetDecoder;

#[cfg(feature = "xlsx")]
impl TableDecoder for SpreadsheetDecoder {
    fn decode(&self, identifier: &str, bytes: &[u8]) -> GrowthResult<RawTable> {
        use calamine::{open_workbook_auto_from_rs, Data, Reader};
        use std::io::Cursor;

        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| GrowthError::malformed(identifier, format!("unreadable workbook: {}", e)))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| GrowthError::malformed(identifier, "workbook has no sheets"))?
            .map_err(|e| GrowthError::malformed(identifier, format!("unreadable sheet: {}", e)))?;

        let cell_text = |cell: &Data| -> String {
            match cell {
                Data::Empty => String::new(),
                Data::String(s) => s.trim().to_string(),
                Data::Float(f) => f.to_string(),
                Data::Int(i) => i.to_string(),
                other => other.to_string(),
            }
        };

        let mut rows_iter = range.rows();
        let headers: Vec<String> = rows_iter
            .next()
            .map(|row| row.iter().map(cell_text).collect())
            .unwrap_or_default();
        let rows: Vec<Vec<String>> = rows_iter
            .map(|row| row.iter().map(cell_text).collect())
            .collect();

        debug!(identifier, columns = headers.len(), rows = rows.len(), "decoded spreadsheet");
        Ok(RawTable { headers, rows })
    }

    fn format_name(&self) -> &str {
        "xlsx"
    }
}

// ============================================================================
// FACTORY
// ============================================================================

/// Pick a decoder from the identifier's extension (query string ignored).
/// Unknown extensions are treated as spreadsheets, the format WHO publishes.
pub fn decoder_for(identifier: &str) -> GrowthResult<Box<dyn TableDecoder>> {
    let path = identifier.split('?').next().unwrap_or(identifier).to_lowercase();

    if path.ends_with(".csv") {
        return Ok(Box::new(DelimitedDecoder::csv()));
    }
    if path.ends_with(".txt") || path.ends_with(".tsv") {
        return Ok(Box::new(DelimitedDecoder::tsv()));
    }

    spreadsheet_decoder(identifier)
}

#[cfg(feature = "xlsx")]
fn spreadsheet_decoder(_identifier: &str) -> GrowthResult<Box<dyn TableDecoder>> {
    Ok(Box::new(SpreadsheetDecoder))
}

#[cfg(not(feature = "xlsx"))]
fn spreadsheet_decoder(identifier: &str) -> GrowthResult<Box<dyn TableDecoder>> {
    Err(GrowthError::malformed(
        identifier,
        "spreadsheet decoding is not available in this build",
    ))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_decode() {
        let bytes = b"Month,L,M,S,SD0\n0,1,3.3464,0.14602,3.3\n1,1,4.4709,0.13395,4.5\n";
        let table = DelimitedDecoder::csv().decode("wfa.csv", bytes).unwrap();

        assert_eq!(table.headers, vec!["Month", "L", "M", "S", "SD0"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, 4), "4.5");
        assert_eq!(table.column_index("SD0"), Some(4));
    }

    #[test]
    fn test_tsv_decode_trims_cells() {
        let bytes = b"Month \tP50\n0\t 34.46\n";
        let table = DelimitedDecoder::tsv().decode("hcfa.txt", bytes).unwrap();

        assert_eq!(table.column_index("Month"), Some(0));
        assert_eq!(table.cell(0, 1), "34.46");
    }

    #[test]
    fn test_short_rows_read_as_empty() {
        let bytes = b"Month,P3,P50\n0,2.4\n";
        let table = DelimitedDecoder::csv().decode("short.csv", bytes).unwrap();

        assert_eq!(table.cell(0, 2), "");
        assert_eq!(table.cell(5, 0), "");
    }

    #[test]
    fn test_decoder_for_extension() {
        assert_eq!(decoder_for("a/b/table.csv").unwrap().format_name(), "csv");
        assert_eq!(decoder_for("table.TXT").unwrap().format_name(), "tsv");
        assert_eq!(decoder_for("https://x.org/t.csv?sfvrsn=1").unwrap().format_name(), "csv");
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_workbook_first_sheet_decode() {
        use rust_xlsxwriter::Workbook;

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in ["Month", "L", "M", "S", "SD0"].iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        sheet.write_number(1, 0, 0).unwrap();
        sheet.write_number(1, 1, 1).unwrap();
        sheet.write_number(1, 2, 3.3464).unwrap();
        sheet.write_number(1, 3, 0.14602).unwrap();
        sheet.write_number(1, 4, 3.3).unwrap();
        sheet.write_number(2, 0, 1).unwrap();
        sheet.write_number(2, 4, 4.5).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = SpreadsheetDecoder.decode("wfa-boys-zscore.xlsx", &bytes).unwrap();

        assert_eq!(table.headers, vec!["Month", "L", "M", "S", "SD0"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 2), "3.3464");
        assert_eq!(table.cell(0, 4), "3.3");
        assert_eq!(table.cell(1, 0), "1");
        assert_eq!(table.cell(1, 2), "");
        assert_eq!(table.cell(1, 4), "4.5");
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_garbage_workbook_is_malformed() {
        let result = SpreadsheetDecoder.decode("broken.xlsx", b"not a workbook");
        assert!(matches!(result, Err(GrowthError::MalformedTable { .. })));
    }
}
