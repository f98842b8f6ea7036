//! Sales CSV parser
//!
//! Column names are the Vietnamese headers of the source export and are
//! treated as the wire contract. Field coercion never drops a row: bad
//! numbers become `0.0`, bad timestamps become `None`.

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, Trim};
use rayon::prelude::*;
use tracing::debug;

use crate::types::{OrderLine, Result, SalesvizError};

use super::TableParser;

pub const COL_ORDER_CODE: &str = "Mã đơn hàng";
pub const COL_CREATED_AT: &str = "Thời gian tạo đơn";
pub const COL_CUSTOMER_CODE: &str = "Mã khách hàng";
pub const COL_ITEM_CODE: &str = "Mã mặt hàng";
pub const COL_ITEM_NAME: &str = "Tên mặt hàng";
pub const COL_GROUP_CODE: &str = "Mã nhóm hàng";
pub const COL_GROUP_NAME: &str = "Tên nhóm hàng";
pub const COL_QUANTITY: &str = "SL";
pub const COL_AMOUNT: &str = "Thành tiền";

/// Columns that must be present in the header row
pub const REQUIRED_COLUMNS: &[&str] = &[
    COL_ORDER_CODE,
    COL_CREATED_AT,
    COL_CUSTOMER_CODE,
    COL_ITEM_CODE,
    COL_ITEM_NAME,
    COL_GROUP_CODE,
    COL_GROUP_NAME,
    COL_QUANTITY,
    COL_AMOUNT,
];

/// Accepted timestamp layouts, tried in order
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Raw CSV row before type coercion
#[derive(Debug)]
struct RawOrderLine {
    order_code: String,
    created_at: String,
    customer_code: String,
    item_code: String,
    item_name: String,
    group_code: String,
    group_name: String,
    quantity: String,
    amount: String,
}

/// Position of each required column in the header row
struct ColumnIndex {
    positions: [usize; REQUIRED_COLUMNS.len()],
}

impl ColumnIndex {
    /// Fails with a load error naming every missing column
    fn from_headers(headers: &csv::ByteRecord) -> Result<Self> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .collect();

        let mut positions = [0usize; REQUIRED_COLUMNS.len()];
        let mut missing = Vec::new();
        for (slot, col) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            match names.iter().position(|n| n.as_str() == *col) {
                Some(pos) => *slot = pos,
                None => missing.push(*col),
            }
        }

        if missing.is_empty() {
            Ok(Self { positions })
        } else {
            Err(SalesvizError::Load(format!(
                "missing column(s): {}",
                missing.join(", ")
            )))
        }
    }

    /// Invalid UTF-8 is replaced with U+FFFD; short rows yield empty fields
    fn read(&self, record: &csv::ByteRecord) -> RawOrderLine {
        let field = |i: usize| {
            record
                .get(self.positions[i])
                .map(|b| String::from_utf8_lossy(b).into_owned())
                .unwrap_or_default()
        };

        RawOrderLine {
            order_code: field(0),
            created_at: field(1),
            customer_code: field(2),
            item_code: field(3),
            item_name: field(4),
            group_code: field(5),
            group_name: field(6),
            quantity: field(7),
            amount: field(8),
        }
    }
}

impl RawOrderLine {
    fn coerce(self, row: usize) -> OrderLine {
        let created_at = parse_timestamp(&self.created_at);
        if created_at.is_none() && !self.created_at.is_empty() {
            debug!(row, value = %self.created_at, "unparseable timestamp, using unknown bucket");
        }

        OrderLine {
            order_code: self.order_code,
            created_at,
            customer_code: self.customer_code,
            item_code: self.item_code,
            item_name: self.item_name,
            group_code: self.group_code,
            group_name: self.group_name,
            quantity: coerce_number(&self.quantity, COL_QUANTITY, row),
            amount: coerce_number(&self.amount, COL_AMOUNT, row),
        }
    }
}

/// Parse a numeric-looking field. Returns `None` for empty or non-numeric text.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an ISO-like local date-time (`YYYY-MM-DD HH:MM:SS`)
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
}

fn coerce_number(raw: &str, column: &str, row: usize) -> f64 {
    match parse_number(raw) {
        Some(v) => v,
        None => {
            let err = SalesvizError::Parse(format!("{} = {:?}", column, raw));
            debug!(row, %err, "falling back to 0");
            0.0
        }
    }
}

/// Parser for the sales export CSV
pub struct SalesCsvParser {
    delimiter: u8,
}

impl SalesCsvParser {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for SalesCsvParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TableParser for SalesCsvParser {
    fn name(&self) -> &str {
        "sales-csv"
    }

    fn parse_bytes(&self, bytes: &[u8]) -> Result<Vec<OrderLine>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(bytes);

        let headers = reader
            .byte_headers()
            .map_err(|e| SalesvizError::Load(format!("unreadable header row: {}", e)))?
            .clone();
        if headers.is_empty() {
            return Err(SalesvizError::Load("empty table".into()));
        }
        let columns = ColumnIndex::from_headers(&headers)?;

        let mut raw_rows: Vec<RawOrderLine> = Vec::new();
        for (idx, record) in reader.byte_records().enumerate() {
            // Header is row 1, so data rows start at 2
            let record = record.map_err(|e| {
                SalesvizError::Load(format!("unreadable row {}: {}", idx + 2, e))
            })?;
            raw_rows.push(columns.read(&record));
        }

        // Coercion is per-row and order-preserving
        let lines: Vec<OrderLine> = raw_rows
            .into_par_iter()
            .enumerate()
            .map(|(idx, raw)| raw.coerce(idx + 2))
            .collect();

        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Mã đơn hàng,Thời gian tạo đơn,Mã khách hàng,Mã mặt hàng,Tên mặt hàng,Mã nhóm hàng,Tên nhóm hàng,SL,Thành tiền";

    fn parse(body: &str) -> Result<Vec<OrderLine>> {
        let csv = format!("{}\n{}", HEADER, body);
        SalesCsvParser::new().parse_bytes(csv.as_bytes())
    }

    // ========== parse_number() ==========

    #[test]
    fn test_parse_number_integer_and_decimal() {
        assert_eq!(parse_number("150000"), Some(150000.0));
        assert_eq!(parse_number(" 2.5 "), Some(2.5));
    }

    #[test]
    fn test_parse_number_rejects_text() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    // ========== parse_timestamp() ==========

    #[test]
    fn test_parse_timestamp_standard_format() {
        let ts = parse_timestamp("2023-05-14 09:30:00").unwrap();
        assert_eq!(ts.to_string(), "2023-05-14 09:30:00");
    }

    #[test]
    fn test_parse_timestamp_iso_t_separator() {
        assert!(parse_timestamp("2023-05-14T09:30:00").is_some());
    }

    #[test]
    fn test_parse_timestamp_invalid_is_none() {
        assert!(parse_timestamp("14/05/2023").is_none());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("2023-13-40 00:00:00").is_none());
    }

    // ========== parse_bytes() ==========

    #[test]
    fn test_parse_bytes_typed_fields() {
        let lines =
            parse("DH001,2023-01-02 10:15:00,KH01,SET01,Set trà A,SET,Set Trà,2,300000").unwrap();

        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line.order_code, "DH001");
        assert_eq!(line.customer_code, "KH01");
        assert_eq!(line.item_name, "Set trà A");
        assert_eq!(line.group_code, "SET");
        assert!((line.quantity - 2.0).abs() < f64::EPSILON);
        assert!((line.amount - 300000.0).abs() < f64::EPSILON);
        assert!(line.created_at.is_some());
    }

    #[test]
    fn test_parse_bytes_bad_fields_fall_back() {
        let lines = parse("DH001,not-a-date,KH01,SET01,Set trà A,SET,Set Trà,x,").unwrap();

        assert_eq!(lines.len(), 1);
        assert!(lines[0].created_at.is_none());
        assert!((lines[0].quantity - 0.0).abs() < f64::EPSILON);
        assert!((lines[0].amount - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_bytes_preserves_row_order() {
        let body = (1..=50)
            .map(|i| format!("DH{:03},2023-01-02 10:15:00,KH01,A,A,G,G,1,{}", i, i))
            .collect::<Vec<_>>()
            .join("\n");
        let lines = parse(&body).unwrap();

        assert_eq!(lines.len(), 50);
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(line.order_code, format!("DH{:03}", i + 1));
        }
    }

    #[test]
    fn test_parse_bytes_missing_column_is_load_error() {
        let csv = "Mã đơn hàng,SL\nDH001,1";
        let err = SalesCsvParser::new().parse_bytes(csv.as_bytes()).unwrap_err();

        assert!(matches!(err, SalesvizError::Load(_)));
        assert!(err.to_string().contains("Thành tiền"));
    }

    #[test]
    fn test_parse_bytes_empty_input_is_load_error() {
        let err = SalesCsvParser::new().parse_bytes(b"").unwrap_err();
        assert!(err.is_load_failure());
    }

    #[test]
    fn test_parse_bytes_header_only() {
        let lines = SalesCsvParser::new().parse_bytes(HEADER.as_bytes()).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_parse_bytes_semicolon_delimiter() {
        let csv = format!(
            "{}\nDH001;2023-01-02 10:15:00;KH01;A;A;G;G;1;1000",
            HEADER.replace(',', ";")
        );
        let lines = SalesCsvParser::with_delimiter(b';')
            .parse_bytes(csv.as_bytes())
            .unwrap();
        assert_eq!(lines.len(), 1);
        assert!((lines[0].amount - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_bytes_invalid_utf8_row_is_kept() {
        let mut csv = format!("{}\nDH001,2023-01-02 10:15:00,KH01,A,Good name,G,G,1,100\n", HEADER)
            .into_bytes();
        csv.extend_from_slice(b"DH002,2023-01-02 11:00:00,KH02,B,bad\xff name,G,G,2,250\n");

        let lines = SalesCsvParser::new().parse_bytes(&csv).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].item_name, "bad\u{FFFD} name");
        assert!((lines[1].amount - 250.0).abs() < f64::EPSILON);
        let total: f64 = lines.iter().map(|l| l.amount).sum();
        assert!((total - 350.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_bytes_reordered_columns() {
        let csv = "Thành tiền,SL,Tên nhóm hàng,Mã nhóm hàng,Tên mặt hàng,Mã mặt hàng,Mã khách hàng,Thời gian tạo đơn,Mã đơn hàng\n\
                   700,3,G name,G,Item,I1,KH9,2023-02-01 08:00:00,DH9";
        let lines = SalesCsvParser::new().parse_bytes(csv.as_bytes()).unwrap();

        assert_eq!(lines[0].order_code, "DH9");
        assert_eq!(lines[0].customer_code, "KH9");
        assert!((lines[0].quantity - 3.0).abs() < f64::EPSILON);
        assert!((lines[0].amount - 700.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_bytes_short_row_keeps_empty_fields() {
        let lines = parse("DH001,2023-01-02 10:15:00,KH01").unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].item_code, "");
        assert!((lines[0].amount - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_bytes_extra_columns_ignored() {
        let csv = format!(
            "{},Ghi chú\nDH001,2023-01-02 10:15:00,KH01,A,A,G,G,1,1000,hello",
            HEADER
        );
        let lines = SalesCsvParser::new().parse_bytes(csv.as_bytes()).unwrap();
        assert_eq!(lines.len(), 1);
    }
}
