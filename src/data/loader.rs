use std::path::{Path, PathBuf};
use std::str::FromStr;

use calamine::{Data, Reader, open_workbook_auto};
use serde::Deserialize;
use thiserror::Error;

use super::model::{
    COL_AVG_SLIDE_MINUTES, COL_GRADE, COL_GRADE_PERCENT, COL_MAJOR, COL_SEMESTER,
    COL_STUDY_HOURS, Dataset, Record, SLIDE_MARKER,
};

// ---------------------------------------------------------------------------
// Errors and options
// ---------------------------------------------------------------------------

/// Anything that stops the sheet from becoming a [`Dataset`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("opening workbook {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("reading CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{} has no worksheets", .0.display())]
    NoWorksheet(PathBuf),
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing expected column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}, column '{column}': '{value}' is not a recognised value")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("row {row}, column '{column}': '{value}' is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
}

/// Order of the slide columns handed to the charts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideOrder {
    /// Left-to-right as laid out in the sheet.
    #[default]
    Source,
    /// By the number following `Slide #`.
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Data rows consumed after the header.
    pub max_rows: usize,
    /// Leading columns considered (21 = A through U).
    pub max_columns: usize,
    pub slide_order: SlideOrder,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_rows: 100,
            max_columns: 21,
            slide_order: SlideOrder::Source,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the classroom sheet from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first worksheet
/// * `.csv` – comma separated, header on the first line
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path, options)?,
        "csv" => read_csv(path, options)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    let mut dataset = build_dataset(&table)?;
    if options.slide_order == SlideOrder::Numeric {
        dataset.sort_slides_numerically();
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Raw table – header plus cells, independent of the file format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    fn text(s: &str) -> Cell {
        if s.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.trim().to_string(),
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::String(s) => Cell::text(s),
            Data::Bool(b) => Cell::Text(b.to_string()),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s),
            Data::Error(_) | Data::Empty => Cell::Empty,
        }
    }
}

#[derive(Debug)]
struct RawRow {
    /// 1-based line in the source file, for error messages.
    line: usize,
    cells: Vec<Cell>,
}

#[derive(Debug, Default)]
struct RawTable {
    headers: Vec<String>,
    rows: Vec<RawRow>,
}

// ---------------------------------------------------------------------------
// Workbook reader
// ---------------------------------------------------------------------------

/// Header is the first row of the used range; columns are counted from A.
fn read_workbook(path: &Path, options: &LoadOptions) -> Result<RawTable, LoadError> {
    let open_err = |source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(open_err)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::NoWorksheet(path.to_path_buf()))?
        .map_err(open_err)?;

    let (Some((first_row, _)), Some((last_row, last_col))) = (range.start(), range.end()) else {
        return Ok(RawTable::default());
    };

    // Blank rows still use up the row budget.
    let row_budget = u32::try_from(options.max_rows).unwrap_or(u32::MAX);
    let last_row = last_row.min(first_row.saturating_add(row_budget));
    let columns = u32::try_from(options.max_columns)
        .unwrap_or(u32::MAX)
        .min(last_col.saturating_add(1));
    let row_cells = |row: u32| -> Vec<Cell> {
        (0..columns)
            .map(|col| range.get_value((row, col)).map(Cell::from).unwrap_or(Cell::Empty))
            .collect()
    };

    let headers = row_cells(first_row).iter().map(Cell::to_text).collect();

    let mut rows = Vec::new();
    for row in first_row + 1..=last_row {
        let cells = row_cells(row);
        if cells.iter().all(Cell::is_empty) {
            continue;
        }
        rows.push(RawRow {
            line: row as usize + 1,
            cells,
        });
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path, options: &LoadOptions) -> Result<RawTable, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let headers = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .take(options.max_columns)
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records().take(options.max_rows) {
        let record = result.map_err(csv_err)?;
        let cells: Vec<Cell> = record.iter().take(options.max_columns).map(Cell::text).collect();
        if cells.iter().all(Cell::is_empty) {
            continue;
        }
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows.len() + 2);
        rows.push(RawRow { line, cells });
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// Schema scan and row conversion
// ---------------------------------------------------------------------------

fn build_dataset(table: &RawTable) -> Result<Dataset, LoadError> {
    let column = |name: &'static str| {
        table
            .headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn(name))
    };

    let semester = column(COL_SEMESTER)?;
    let major = column(COL_MAJOR)?;
    let grade = column(COL_GRADE)?;
    let grade_percent = column(COL_GRADE_PERCENT)?;
    let study_hours = column(COL_STUDY_HOURS)?;
    let avg_slide = column(COL_AVG_SLIDE_MINUTES)?;

    let slide_indices: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.contains(SLIDE_MARKER))
        .map(|(i, _)| i)
        .collect();
    let slide_columns: Vec<String> = slide_indices
        .iter()
        .map(|&i| table.headers[i].clone())
        .collect();

    let mut records = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let slide_minutes = slide_indices
            .iter()
            .map(|&i| number_cell(row, i, &table.headers[i]))
            .collect::<Result<Vec<_>, _>>()?;

        records.push(Record {
            semester: category_cell(row, semester, COL_SEMESTER)?,
            major: category_cell(row, major, COL_MAJOR)?,
            grade: category_cell(row, grade, COL_GRADE)?,
            grade_percent: number_cell(row, grade_percent, COL_GRADE_PERCENT)?,
            study_hours: number_cell(row, study_hours, COL_STUDY_HOURS)?,
            avg_slide_minutes: number_cell(row, avg_slide, COL_AVG_SLIDE_MINUTES)?,
            slide_minutes,
        });
    }

    Ok(Dataset::new(records, slide_columns))
}

fn category_cell<T: FromStr>(
    row: &RawRow,
    idx: usize,
    column: &'static str,
) -> Result<T, LoadError> {
    let value = row.cells.get(idx).map(Cell::to_text).unwrap_or_default();
    value.parse().map_err(|_| LoadError::InvalidValue {
        row: row.line,
        column,
        value,
    })
}

fn number_cell(row: &RawRow, idx: usize, column: &str) -> Result<Option<f64>, LoadError> {
    match row.cells.get(idx) {
        None | Some(Cell::Empty) => Ok(None),
        Some(Cell::Number(n)) => Ok(Some(*n)),
        Some(Cell::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| LoadError::InvalidNumber {
                row: row.line,
                column: column.to_string(),
                value: s.clone(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Grade, Major, Semester};
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    const HEADERS: &[&str] = &[
        "Semester",
        "Major",
        "Grade",
        "Grade (Percentage)",
        "Study Time Avg (Hrs)",
        "Avg Time Spent Per Slide (Mins)",
        "Slide #10 (Mins)",
        "Slide #2 (Mins)",
    ];

    /// Writes numbers as numeric cells, blanks as nothing, the rest as text.
    fn write_xlsx(dir: &TempDir, headers: &[&str], rows: &[Vec<&str>]) -> PathBuf {
        let path = dir.path().join("data.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (c, h) in headers.iter().enumerate() {
            sheet.write_string(0, c as u16, *h).unwrap();
        }
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                let (r, c) = (r as u32 + 1, c as u16);
                if value.is_empty() {
                    continue;
                }
                match value.parse::<f64>() {
                    Ok(n) => sheet.write_number(r, c, n).unwrap(),
                    Err(_) => sheet.write_string(r, c, *value).unwrap(),
                };
            }
        }
        workbook.save(&path).unwrap();
        path
    }

    fn sample_rows() -> Vec<Vec<&'static str>> {
        vec![
            vec!["Fall", "CPS", "A", "95", "3.5", "2.0", "1.5", "2.5"],
            vec!["Spring", "IT", "B", "84", "2.25", "1.5", "", "1.0"],
            vec!["Summer", "Other", "F", "41", "0.5", "0.25", "0.1", "0.2"],
        ]
    }

    #[test]
    fn loads_xlsx_records_and_slide_columns_in_sheet_order() {
        let dir = TempDir::new().unwrap();
        let path = write_xlsx(&dir, HEADERS, &sample_rows());

        let ds = load_file(&path, &LoadOptions::default()).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.slide_columns, vec!["Slide #10 (Mins)", "Slide #2 (Mins)"]);
        let first = &ds.records[0];
        assert_eq!(first.semester, Semester::Fall);
        assert_eq!(first.major, Major::Cps);
        assert_eq!(first.grade, Grade::A);
        assert_eq!(first.grade_percent, Some(95.0));
        assert_eq!(first.slide_minutes, vec![Some(1.5), Some(2.5)]);
        assert_eq!(ds.records[1].slide_minutes, vec![None, Some(1.0)]);
        assert_eq!(ds.records[2].major, Major::Other);
    }

    #[test]
    fn numeric_slide_order_is_opt_in() {
        let dir = TempDir::new().unwrap();
        let path = write_xlsx(&dir, HEADERS, &sample_rows());
        let options = LoadOptions {
            slide_order: SlideOrder::Numeric,
            ..LoadOptions::default()
        };

        let ds = load_file(&path, &options).unwrap();

        assert_eq!(ds.slide_columns, vec!["Slide #2 (Mins)", "Slide #10 (Mins)"]);
        assert_eq!(ds.records[0].slide_minutes, vec![Some(2.5), Some(1.5)]);
    }

    #[test]
    fn caps_rows_at_limit() {
        let dir = TempDir::new().unwrap();
        let rows: Vec<Vec<&str>> = (0..120).map(|_| sample_rows()[0].clone()).collect();
        let path = write_xlsx(&dir, HEADERS, &rows);

        let ds = load_file(&path, &LoadOptions::default()).unwrap();

        assert_eq!(ds.len(), 100);
    }

    #[test]
    fn ignores_columns_past_u() {
        let dir = TempDir::new().unwrap();
        let mut headers: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
        while headers.len() < 21 {
            headers.push(format!("Notes {}", headers.len()));
        }
        headers.push("Slide #99 (Mins)".to_string());
        let headers: Vec<&str> = headers.iter().map(String::as_str).collect();
        let path = write_xlsx(&dir, &headers, &sample_rows());

        let ds = load_file(&path, &LoadOptions::default()).unwrap();

        assert_eq!(ds.slide_columns.len(), 2);
        assert!(!ds.slide_columns.iter().any(|c| c.contains("#99")));
    }

    #[test]
    fn blank_rows_count_toward_the_row_cap() {
        let dir = TempDir::new().unwrap();
        let mut rows: Vec<Vec<&str>> = vec![vec![""; HEADERS.len()]];
        rows.extend((0..100).map(|_| sample_rows()[0].clone()));
        let path = write_xlsx(&dir, HEADERS, &rows);

        let ds = load_file(&path, &LoadOptions::default()).unwrap();

        assert_eq!(ds.len(), 99);
    }

    #[test]
    fn blank_csv_records_count_toward_the_row_cap() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        let mut text = HEADERS.join(",");
        text.push('\n');
        text.push_str(&",".repeat(HEADERS.len() - 1));
        text.push('\n');
        for _ in 0..100 {
            text.push_str(&sample_rows()[0].join(","));
            text.push('\n');
        }
        std::fs::write(&path, text).unwrap();

        let ds = load_file(&path, &LoadOptions::default()).unwrap();

        assert_eq!(ds.len(), 99);
    }

    #[test]
    fn huge_column_limit_is_clamped_to_the_sheet() {
        let dir = TempDir::new().unwrap();
        let path = write_xlsx(&dir, HEADERS, &sample_rows());
        let options = LoadOptions {
            max_columns: usize::MAX,
            ..LoadOptions::default()
        };

        let ds = load_file(&path, &options).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.slide_columns.len(), 2);
    }

    #[test]
    fn skips_blank_rows() {
        let dir = TempDir::new().unwrap();
        let mut rows = sample_rows();
        rows.insert(1, vec![""; HEADERS.len()]);
        let path = write_xlsx(&dir, HEADERS, &rows);

        let ds = load_file(&path, &LoadOptions::default()).unwrap();

        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn missing_column_is_reported() {
        let dir = TempDir::new().unwrap();
        let headers: Vec<&str> = HEADERS.iter().copied().filter(|h| *h != "Major").collect();
        let path = write_xlsx(&dir, &headers, &[]);

        let err = load_file(&path, &LoadOptions::default()).unwrap_err();

        assert!(matches!(err, LoadError::MissingColumn("Major")));
    }

    #[test]
    fn unknown_grade_names_the_row() {
        let dir = TempDir::new().unwrap();
        let mut rows = sample_rows();
        rows[1][2] = "E";
        let path = write_xlsx(&dir, HEADERS, &rows);

        let err = load_file(&path, &LoadOptions::default()).unwrap_err();

        match err {
            LoadError::InvalidValue { row, column, value } => {
                assert_eq!(row, 3);
                assert_eq!(column, "Grade");
                assert_eq!(value, "E");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn text_in_numeric_column_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut rows = sample_rows();
        rows[0][4] = "lots";
        let path = write_xlsx(&dir, HEADERS, &rows);

        let err = load_file(&path, &LoadOptions::default()).unwrap_err();

        assert!(matches!(err, LoadError::InvalidNumber { row: 2, .. }));
    }

    #[test]
    fn loads_csv_with_the_same_schema() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        let mut text = HEADERS.join(",");
        text.push('\n');
        for row in sample_rows() {
            text.push_str(&row.join(","));
            text.push('\n');
        }
        std::fs::write(&path, text).unwrap();

        let ds = load_file(&path, &LoadOptions::default()).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[1].grade, Grade::B);
        assert_eq!(ds.records[1].study_hours, Some(2.25));
        assert_eq!(ds.records[1].slide_minutes, vec![None, Some(1.0)]);
    }

    #[test]
    fn missing_file_and_unknown_extension_fail() {
        let dir = TempDir::new().unwrap();

        let err = load_file(&dir.path().join("absent.xlsx"), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));

        let err = load_file(&dir.path().join("data.txt"), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(ext) if ext == "txt"));
    }
}
