use crate::error::{Result, TourneyError};
use calamine::{open_workbook_auto, Data, Reader};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// A single cell value as read from the source
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed text; integral numbers render without decimals
    pub fn text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => format_number(*n),
            Cell::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        }
    }

    /// Numeric value of a number cell or of numeric text ("4,5" allowed)
    pub fn number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                s.replace(',', ".").parse::<f64>().ok().filter(|n| n.is_finite())
            }
            _ => None,
        }
    }

    /// Whole-number value; fractional numbers are rejected
    pub fn integer(&self) -> Option<i64> {
        self.number()
            .filter(|n| n.fract() == 0.0 && n.abs() < 1e15)
            .map(|n| n as i64)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(n) => Cell::Number(*n),
            Data::Int(n) => Cell::Number(*n as f64),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::Error(_) => Cell::Empty,
            other => Cell::Text(other.to_string()),
        }
    }
}

/// One data row keyed by header text
#[derive(Debug, Clone, Default)]
pub struct Row {
    cells: HashMap<String, Cell>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used by tests and in-memory sources
    pub fn with(mut self, header: &str, cell: impl Into<Cell>) -> Self {
        self.cells.insert(header.trim().to_string(), cell.into());
        self
    }

    pub fn insert(&mut self, header: &str, cell: Cell) {
        self.cells.insert(header.trim().to_string(), cell);
    }

    pub fn get(&self, header: &str) -> Option<&Cell> {
        self.cells.get(header)
    }

    /// Trimmed text of a column, empty when the column is absent
    pub fn text(&self, header: &str) -> String {
        self.get(header).map(Cell::text).unwrap_or_default()
    }

    /// Trimmed text, None when blank or absent
    pub fn opt_text(&self, header: &str) -> Option<String> {
        Some(self.text(header)).filter(|s| !s.is_empty())
    }

    pub fn number(&self, header: &str) -> Option<f64> {
        self.get(header).and_then(Cell::number)
    }

    pub fn integer(&self, header: &str) -> Option<i64> {
        self.get(header).and_then(Cell::integer)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.values().all(Cell::is_empty)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n as f64)
    }
}

/// Named sheets of header-keyed rows
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: HashMap<String, Vec<Row>>,
}

impl Workbook {
    /// Open a spreadsheet file (xlsx, xls, xlsb, ods) or a directory of
    /// `<sheet name>.csv` exports
    pub fn open(path: &Path) -> Result<Self> {
        if path.is_dir() {
            read_csv_dir(path)
        } else {
            read_spreadsheet(path)
        }
    }

    pub fn from_sheets<I, S>(sheets: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<Row>)>,
        S: Into<String>,
    {
        Self {
            sheets: sheets.into_iter().map(|(n, rows)| (n.into(), rows)).collect(),
        }
    }

    /// Rows of a sheet; a missing sheet reads as empty
    pub fn rows(&self, sheet: &str) -> &[Row] {
        self.sheets.get(sheet).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_sheet(&self, sheet: &str) -> bool {
        self.sheets.contains_key(sheet)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sheets.keys().map(String::as_str).collect();
        names.sort();
        names
    }
}

/// Turn a header row plus data rows into keyed rows, dropping blank rows
fn rows_from_grid<I>(headers: &[String], grid: I) -> Vec<Row>
where
    I: IntoIterator<Item = Vec<Cell>>,
{
    let mut rows = Vec::new();
    for cells in grid {
        let mut row = Row::new();
        for (header, cell) in headers.iter().zip(cells) {
            if !header.is_empty() {
                row.insert(header, cell);
            }
        }
        if !row.is_blank() {
            rows.push(row);
        }
    }
    rows
}

fn read_spreadsheet(path: &Path) -> Result<Workbook> {
    let mut workbook = open_workbook_auto(path)?;
    let mut sheets = HashMap::new();

    for name in workbook.sheet_names().to_vec() {
        let range = workbook.worksheet_range(&name)?;
        let mut grid = range.rows();

        let headers: Vec<String> = match grid.next() {
            Some(header_row) => header_row.iter().map(|c| Cell::from(c).text()).collect(),
            None => {
                sheets.insert(name, Vec::new());
                continue;
            }
        };

        let rows = rows_from_grid(&headers, grid.map(|r| r.iter().map(Cell::from).collect()));
        log::debug!("Sheet '{}': {} rows", name, rows.len());
        sheets.insert(name, rows);
    }

    Ok(Workbook { sheets })
}

fn read_csv_dir(dir: &Path) -> Result<Workbook> {
    let mut sheets = HashMap::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if !is_csv {
            continue;
        }
        let name = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem.to_string(),
            None => continue,
        };

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(&path)?;
        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

        let mut grid = Vec::new();
        for record in reader.records() {
            let record = record?;
            grid.push(
                record
                    .iter()
                    .map(|v| if v.trim().is_empty() { Cell::Empty } else { Cell::Text(v.to_string()) })
                    .collect(),
            );
        }

        let rows = rows_from_grid(&headers, grid);
        log::debug!("CSV sheet '{}': {} rows", name, rows.len());
        sheets.insert(name, rows);
    }

    if sheets.is_empty() {
        return Err(TourneyError::Workbook(format!(
            "no .csv sheets found in {}",
            dir.display()
        )));
    }

    Ok(Workbook { sheets })
}
