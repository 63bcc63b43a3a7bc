/// Employee spreadsheet import: parsing and validation
///
/// Reads an `.xlsx` workbook and validates it into a batch of
/// [`NewEmployee`] rows. Validation is strict and fails the whole file:
///
/// - the header row must exactly equal the 11 expected column names, in
///   order, case-sensitively;
/// - required fields must be non-empty (Fname, Minit, Lname, Ssn, Address,
///   Sex, Salary, Dno);
/// - Minit and Sex must be exactly one character;
/// - Salary and Dno must parse as integers;
/// - BDate and EmpDate, when present, must be `YYYY-MM-DD` dates.
///
/// Error messages carry the 1-based spreadsheet row number, counting the
/// header as row 1, so "row 3" points at the second data row in the file
/// the user uploaded. An empty Super_ssn cell means "no supervisor", never
/// an empty-string supervisor.
///
/// Persistence is separate: the caller hands the parsed batch to
/// [`crate::models::employee::EmployeeRow::insert_batch`], which wraps all
/// inserts in one transaction.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use chrono::NaiveDate;

use crate::models::employee::NewEmployee;

/// Expected header row of the employee sheet, order- and case-sensitive
pub const EXPECTED_HEADER: [&str; 11] = [
    "Fname", "Minit", "Lname", "Ssn", "Address", "Sex", "Salary", "Super_ssn", "Dno", "BDate",
    "EmpDate",
];

/// Validation failure for an uploaded employee sheet
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SheetError {
    /// The workbook could not be opened or read
    #[error("could not read workbook: {0}")]
    Workbook(String),

    /// The workbook contains no worksheets
    #[error("workbook contains no worksheets")]
    NoWorksheet,

    /// The header row does not match the expected column names
    #[error("row 1: header must be exactly: {0}")]
    Header(String),

    /// A data row failed a field constraint
    #[error("row {row}: {message}")]
    Row {
        /// 1-based row number; the header is row 1
        row: usize,
        message: String,
    },
}

impl SheetError {
    fn row(row: usize, message: impl Into<String>) -> Self {
        SheetError::Row {
            row,
            message: message.into(),
        }
    }
}

/// Parses and validates an uploaded `.xlsx` employee sheet
///
/// Returns the parsed rows in sheet order, or the first validation failure.
/// Nothing is persisted here; a failed parse means zero rows reach the store.
pub fn parse_employee_sheet(bytes: &[u8]) -> Result<Vec<NewEmployee>, SheetError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| SheetError::Workbook(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::NoWorksheet)?
        .map_err(|e| SheetError::Workbook(e.to_string()))?;

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    parse_rows(&rows)
}

/// Validates pre-extracted rows (header first) into employee records
///
/// Fully-empty rows are skipped; spreadsheets routinely carry trailing blank
/// rows and they are not data.
pub fn parse_rows(rows: &[Vec<String>]) -> Result<Vec<NewEmployee>, SheetError> {
    let expected = EXPECTED_HEADER.join(", ");

    let header = rows.first().ok_or_else(|| SheetError::Header(expected.clone()))?;
    if header.len() != EXPECTED_HEADER.len()
        || header.iter().zip(EXPECTED_HEADER).any(|(got, want)| got != want)
    {
        return Err(SheetError::Header(expected));
    }

    let mut parsed = Vec::new();
    for (idx, row) in rows.iter().enumerate().skip(1) {
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        // Header is row 1, so the first data row reports as row 2.
        parsed.push(parse_row(idx + 1, row)?);
    }

    Ok(parsed)
}

fn field<'a>(row: &'a [String], idx: usize) -> &'a str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

fn required<'a>(row_no: usize, row: &'a [String], idx: usize) -> Result<&'a str, SheetError> {
    let value = field(row, idx);
    if value.is_empty() {
        return Err(SheetError::row(
            row_no,
            format!("{} must not be empty", EXPECTED_HEADER[idx]),
        ));
    }
    Ok(value)
}

fn single_char(row_no: usize, name: &str, value: &str) -> Result<(), SheetError> {
    if value.chars().count() != 1 {
        return Err(SheetError::row(
            row_no,
            format!("{} must be exactly one character", name),
        ));
    }
    Ok(())
}

fn parse_int(row_no: usize, name: &str, value: &str) -> Result<i32, SheetError> {
    value.parse::<i32>().map_err(|_| {
        SheetError::row(row_no, format!("{} must be an integer, got '{}'", name, value))
    })
}

fn parse_date(row_no: usize, name: &str, value: &str) -> Result<Option<NaiveDate>, SheetError> {
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| {
            SheetError::row(
                row_no,
                format!("{} must be a YYYY-MM-DD date, got '{}'", name, value),
            )
        })
}

fn parse_row(row_no: usize, row: &[String]) -> Result<NewEmployee, SheetError> {
    let fname = required(row_no, row, 0)?;
    let minit = required(row_no, row, 1)?;
    let lname = required(row_no, row, 2)?;
    let ssn = required(row_no, row, 3)?;
    let address = required(row_no, row, 4)?;
    let sex = required(row_no, row, 5)?;
    let salary = required(row_no, row, 6)?;
    let dno = required(row_no, row, 8)?;

    single_char(row_no, "Minit", minit)?;
    single_char(row_no, "Sex", sex)?;

    let salary = parse_int(row_no, "Salary", salary)?;
    let dno = parse_int(row_no, "Dno", dno)?;

    // Empty supervisor means "no supervisor", not an empty-string value.
    let super_ssn = match field(row, 7) {
        "" => None,
        value => Some(value.to_string()),
    };

    let bdate = parse_date(row_no, "BDate", field(row, 9))?;
    let empdate = parse_date(row_no, "EmpDate", field(row, 10))?;

    Ok(NewEmployee {
        ssn: ssn.to_string(),
        fname: fname.to_string(),
        minit: Some(minit.to_string()),
        lname: lname.to_string(),
        address: address.to_string(),
        sex: sex.to_string(),
        salary,
        super_ssn,
        dno,
        bdate,
        empdate,
    })
}

/// Renders a spreadsheet cell as trimmed text
///
/// Numeric cells lose a spurious `.0` (xlsx stores integers as floats) and
/// date cells render as `YYYY-MM-DD`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|ndt| ndt.date().to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) => s.split('T').next().unwrap_or("").trim().to_string(),
        Data::DurationIso(s) => s.trim().to_string(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_row() -> Vec<String> {
        EXPECTED_HEADER.iter().map(|s| s.to_string()).collect()
    }

    fn valid_row() -> Vec<String> {
        vec![
            "John", "B", "Smith", "123456789", "731 Fondren, Houston TX", "M", "30000",
            "333445555", "5", "1965-01-09", "2020-06-01",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    #[test]
    fn test_parse_valid_sheet() {
        let rows = vec![header_row(), valid_row()];
        let parsed = parse_rows(&rows).expect("Parse should succeed");
        assert_eq!(parsed.len(), 1);

        let emp = &parsed[0];
        assert_eq!(emp.ssn, "123456789");
        assert_eq!(emp.fname, "John");
        assert_eq!(emp.minit.as_deref(), Some("B"));
        assert_eq!(emp.salary, 30000);
        assert_eq!(emp.dno, 5);
        assert_eq!(emp.super_ssn.as_deref(), Some("333445555"));
        assert_eq!(emp.bdate, NaiveDate::from_ymd_opt(1965, 1, 9));
    }

    #[test]
    fn test_wrong_header_rejected() {
        let mut header = header_row();
        header[3] = "SSN".to_string(); // case matters
        let err = parse_rows(&[header, valid_row()]).unwrap_err();
        assert!(matches!(err, SheetError::Header(_)));
    }

    #[test]
    fn test_reordered_header_rejected() {
        let mut header = header_row();
        header.swap(0, 2);
        let err = parse_rows(&[header, valid_row()]).unwrap_err();
        assert!(matches!(err, SheetError::Header(_)));
    }

    #[test]
    fn test_missing_required_field_reports_row_number() {
        let mut bad = valid_row();
        bad[2] = String::new(); // Lname
        let rows = vec![header_row(), valid_row(), bad];
        let err = parse_rows(&rows).unwrap_err();
        assert_eq!(
            err,
            SheetError::row(3, "Lname must not be empty".to_string())
        );
        assert!(err.to_string().starts_with("row 3:"));
    }

    #[test]
    fn test_multichar_minit_rejected() {
        let mut bad = valid_row();
        bad[1] = "BB".to_string();
        let err = parse_rows(&[header_row(), bad]).unwrap_err();
        assert_eq!(
            err,
            SheetError::row(2, "Minit must be exactly one character".to_string())
        );
    }

    #[test]
    fn test_non_integer_salary_rejected() {
        let mut bad = valid_row();
        bad[6] = "thirty grand".to_string();
        let err = parse_rows(&[header_row(), bad]).unwrap_err();
        assert!(matches!(err, SheetError::Row { row: 2, .. }));
        assert!(err.to_string().contains("Salary"));
    }

    #[test]
    fn test_empty_supervisor_normalizes_to_none() {
        let mut row = valid_row();
        row[7] = String::new();
        let parsed = parse_rows(&[header_row(), row]).expect("Parse should succeed");
        assert_eq!(parsed[0].super_ssn, None);
    }

    #[test]
    fn test_optional_dates_may_be_empty() {
        let mut row = valid_row();
        row[9] = String::new();
        row[10] = String::new();
        let parsed = parse_rows(&[header_row(), row]).expect("Parse should succeed");
        assert_eq!(parsed[0].bdate, None);
        assert_eq!(parsed[0].empdate, None);
    }

    #[test]
    fn test_bad_date_rejected() {
        let mut row = valid_row();
        row[9] = "01/09/1965".to_string();
        let err = parse_rows(&[header_row(), row]).unwrap_err();
        assert!(err.to_string().contains("BDate"));
    }

    #[test]
    fn test_blank_trailing_rows_skipped() {
        let rows = vec![header_row(), valid_row(), vec![String::new(); 11]];
        let parsed = parse_rows(&rows).expect("Parse should succeed");
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_empty_file_is_header_error() {
        let err = parse_rows(&[]).unwrap_err();
        assert!(matches!(err, SheetError::Header(_)));
    }

    #[test]
    fn test_cell_text_numeric_cells() {
        assert_eq!(cell_text(&Data::Float(30000.0)), "30000");
        assert_eq!(cell_text(&Data::Float(32.5)), "32.5");
        assert_eq!(cell_text(&Data::Int(5)), "5");
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("  John ".into())), "John");
    }

    #[test]
    fn test_cell_text_iso_datetime_keeps_date_part() {
        assert_eq!(
            cell_text(&Data::DateTimeIso("1965-01-09T00:00:00".into())),
            "1965-01-09"
        );
    }
}
