// ==========================================
// BOM 对账工具 - 工作簿读取器
// ==========================================
// 支持: Excel (.xlsx/.xlsm/.xls/.ods) / CSV (.csv)
// 输出: 按工作表名读取的 RawGrid（绝对坐标）
// ==========================================

use crate::domain::cell::CellValue;
use crate::domain::grid::RawGrid;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

// ==========================================
// WorkbookSource Trait
// ==========================================
// 用途: 工作簿读取接口（工作表列表 + 单表网格）
// 实现者: ExcelWorkbook, CsvWorkbook, InMemoryWorkbook
pub trait WorkbookSource {
    /// 工作表名称列表（保持文件内顺序）
    fn sheet_names(&self) -> Vec<String>;

    /// 将指定工作表整体读入内存
    fn read_grid(&mut self, sheet: &str) -> ImportResult<RawGrid>;

    /// 读取第一张工作表
    fn read_first_grid(&mut self) -> ImportResult<(String, RawGrid)> {
        let first = self
            .sheet_names()
            .into_iter()
            .next()
            .ok_or_else(|| ImportError::NoSheets("工作簿为空".to_string()))?;
        let grid = self.read_grid(&first)?;
        Ok((first, grid))
    }
}

// ==========================================
// WorkbookOpener Trait
// ==========================================
// 用途: 按路径打开工作簿（流程层通过该接口取数，便于替换）
pub trait WorkbookOpener {
    fn open(&self, path: &Path) -> ImportResult<Box<dyn WorkbookSource>>;
}

/// 按扩展名分派的文件打开器
pub struct FileWorkbookOpener;

impl WorkbookOpener for FileWorkbookOpener {
    fn open(&self, path: &Path) -> ImportResult<Box<dyn WorkbookSource>> {
        open_workbook(path)
    }
}

/// 根据扩展名打开工作簿
pub fn open_workbook<P: AsRef<Path>>(file_path: P) -> ImportResult<Box<dyn WorkbookSource>> {
    let path = file_path.as_ref();

    // 检查文件存在
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => Ok(Box::new(CsvWorkbook::open(path)?)),
        "xlsx" | "xlsm" | "xls" | "ods" => Ok(Box::new(ExcelWorkbook::open(path)?)),
        _ => Err(ImportError::UnsupportedFormat(ext)),
    }
}

// ==========================================
// Excel 工作簿
// ==========================================
pub struct ExcelWorkbook {
    path: String,
    sheets: Sheets<BufReader<File>>,
}

impl ExcelWorkbook {
    pub fn open(path: &Path) -> ImportResult<Self> {
        let sheets = open_workbook_auto(path)?;
        Ok(Self {
            path: path.display().to_string(),
            sheets,
        })
    }
}

impl WorkbookSource for ExcelWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn read_grid(&mut self, sheet: &str) -> ImportResult<RawGrid> {
        if !self.sheet_names().iter().any(|s| s == sheet) {
            return Err(ImportError::SheetNotFound(sheet.to_string()));
        }
        let range = self.sheets.worksheet_range(sheet)?;
        let grid = grid_from_range(&range);
        debug!(
            file = %self.path,
            sheet = sheet,
            height = grid.height(),
            width = grid.width(),
            "工作表读取完成"
        );
        Ok(grid)
    }
}

/// calamine Range → RawGrid（补齐 Range 起点前的空行/空列）
fn grid_from_range(range: &Range<Data>) -> RawGrid {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let (start_row, start_col) = (start_row as usize, start_col as usize);

    let mut rows = vec![Vec::new(); start_row];
    for data_row in range.rows() {
        let mut row = vec![CellValue::Empty; start_col];
        row.extend(data_row.iter().map(cell_from_data));
        rows.push(row);
    }
    RawGrid::new(rows)
}

/// calamine 单元格 → CellValue
fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::text(if *b { "TRUE" } else { "FALSE" }),
        // 日期按 Excel 序列号保存
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
    }
}

// ==========================================
// CSV 工作簿（单表，表名取文件名）
// ==========================================
pub struct CsvWorkbook {
    sheet_name: String,
    grid: RawGrid,
}

impl CsvWorkbook {
    pub fn open(path: &Path) -> ImportResult<Self> {
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(parse_csv_field).collect());
        }

        let sheet_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Sheet1")
            .to_string();

        Ok(Self {
            sheet_name,
            grid: RawGrid::new(rows),
        })
    }
}

impl WorkbookSource for CsvWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        vec![self.sheet_name.clone()]
    }

    fn read_grid(&mut self, sheet: &str) -> ImportResult<RawGrid> {
        if sheet != self.sheet_name {
            return Err(ImportError::SheetNotFound(sheet.to_string()));
        }
        Ok(self.grid.clone())
    }
}

/// CSV 字段：空 → Empty，可解析的有限数值 → Number，其余 → Text
///
/// 前导零（`0402`）与指数写法（`1E3`）按编号处理，保留原文本。
fn parse_csv_field(field: &str) -> CellValue {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    if looks_like_code(trimmed) {
        return CellValue::Text(field.to_string());
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(field.to_string()),
    }
}

fn looks_like_code(field: &str) -> bool {
    let digits = field.trim_start_matches(['+', '-']);
    let integer_part = digits.split('.').next().unwrap_or("");
    let leading_zero = integer_part.len() > 1 && integer_part.starts_with('0');
    leading_zero || digits.contains(['e', 'E'])
}

// ==========================================
// 内存工作簿
// ==========================================
// 用于嵌入调用方已持有网格数据的场景
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkbook {
    sheets: Vec<(String, RawGrid)>,
}

impl InMemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, name: impl Into<String>, grid: RawGrid) -> Self {
        self.sheets.push((name.into(), grid));
        self
    }
}

impl WorkbookSource for InMemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn read_grid(&mut self, sheet: &str) -> ImportResult<RawGrid> {
        self.sheets
            .iter()
            .find(|(name, _)| name == sheet)
            .map(|(_, grid)| grid.clone())
            .ok_or_else(|| ImportError::SheetNotFound(sheet.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_csv_workbook_parses_numbers_and_blanks() {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "Component,数量,备注").unwrap();
        writeln!(temp_file, "A,2,").unwrap();
        writeln!(temp_file, "B,3.5,ok").unwrap();

        let mut workbook = open_workbook(temp_file.path()).unwrap();
        let names = workbook.sheet_names();
        assert_eq!(names.len(), 1);

        let (_, grid) = workbook.read_first_grid().unwrap();
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.get(0, 1), &CellValue::text("数量"));
        assert_eq!(grid.get(1, 1), &CellValue::Number(2.0));
        assert_eq!(grid.get(1, 2), &CellValue::Empty);
        assert_eq!(grid.get(2, 2), &CellValue::text("ok"));
    }

    #[test]
    fn test_csv_keeps_code_like_fields_as_text() {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "Component,数量").unwrap();
        writeln!(temp_file, "0402,2").unwrap();
        writeln!(temp_file, "1E3,0.5").unwrap();
        writeln!(temp_file, "0.25,10.50").unwrap();

        let mut workbook = open_workbook(temp_file.path()).unwrap();
        let (_, grid) = workbook.read_first_grid().unwrap();
        assert_eq!(grid.get(1, 0), &CellValue::text("0402"));
        assert_eq!(grid.get(2, 0), &CellValue::text("1E3"));
        // 普通小数仍为数值
        assert_eq!(grid.get(2, 1), &CellValue::Number(0.5));
        assert_eq!(grid.get(3, 0), &CellValue::Number(0.25));
        assert_eq!(grid.get(3, 1), &CellValue::Number(10.5));
    }

    #[test]
    fn test_open_missing_file() {
        let result = open_workbook("non_existent.xlsx");
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_open_unsupported_extension() {
        let temp_file = Builder::new().suffix(".txt").tempfile().unwrap();
        let result = open_workbook(temp_file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_in_memory_workbook_sheet_lookup() {
        let mut workbook = InMemoryWorkbook::new()
            .with_sheet("价格", RawGrid::new(vec![vec![CellValue::text("JPN")]]));
        assert_eq!(workbook.sheet_names(), vec!["价格".to_string()]);
        assert!(workbook.read_grid("价格").is_ok());
        assert!(matches!(
            workbook.read_grid("BOM"),
            Err(ImportError::SheetNotFound(_))
        ));
    }

    #[test]
    fn test_cell_from_data_conversions() {
        assert_eq!(cell_from_data(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(cell_from_data(&Data::Bool(true)), CellValue::text("TRUE"));
        assert_eq!(cell_from_data(&Data::Empty), CellValue::Empty);
    }
}
