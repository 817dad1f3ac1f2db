// ==========================================
// BOM 对账工具 - 表格写出
// ==========================================
// 支持: .xlsx（rust_xlsxwriter，单表 Sheet1） / .csv
// 格式: 首行表头，其后数据行；数值写数值，文本写字符串，Empty 留空
// ==========================================

use crate::domain::cell::CellValue;
use crate::domain::table::Table;
use crate::exporter::error::{ExportError, ExportResult};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::info;

/// 输出工作表名
pub const OUTPUT_SHEET: &str = "Sheet1";

const XLSX_MAX_ROWS: usize = 1_048_576;
const XLSX_MAX_COLUMNS: usize = 16_384;

// ==========================================
// TableWriter Trait
// ==========================================
// 用途: 流程层的保存接口，测试中可替换为内存实现
pub trait TableWriter {
    fn write(&self, table: &Table, path: &Path) -> ExportResult<()>;
}

/// 按扩展名选择格式的文件写出器
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTableWriter;

impl TableWriter for FileTableWriter {
    fn write(&self, table: &Table, path: &Path) -> ExportResult<()> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "xlsx" => write_xlsx(table, path)?,
            "csv" => write_csv(table, path)?,
            _ => return Err(ExportError::UnsupportedFormat(ext)),
        }
        info!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "结果已写出"
        );
        Ok(())
    }
}

/// 写出 .xlsx
pub fn write_xlsx(table: &Table, path: &Path) -> ExportResult<()> {
    let display = path.display().to_string();
    // 表头行占用一行
    if table.row_count() + 1 > XLSX_MAX_ROWS || table.column_count() > XLSX_MAX_COLUMNS {
        return Err(ExportError::TooLarge {
            rows: table.row_count(),
            columns: table.column_count(),
        });
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook
        .add_worksheet()
        .set_name(OUTPUT_SHEET)
        .map_err(|e| ExportError::write(&display, e))?;

    for (col, name) in table.columns().iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, name, &header_format)
            .map_err(|e| ExportError::write(&display, e))?;
    }

    for (r, row) in table.rows().iter().enumerate() {
        let xlsx_row = r as u32 + 1;
        for (c, value) in row.iter().enumerate() {
            let xlsx_col = c as u16;
            match value {
                CellValue::Number(n) if !n.is_nan() => {
                    worksheet
                        .write_number(xlsx_row, xlsx_col, *n)
                        .map_err(|e| ExportError::write(&display, e))?;
                }
                CellValue::Text(s) if !s.is_empty() => {
                    worksheet
                        .write_string(xlsx_row, xlsx_col, s)
                        .map_err(|e| ExportError::write(&display, e))?;
                }
                _ => {}
            }
        }
    }

    workbook
        .save(path)
        .map_err(|e| ExportError::write(&display, e))?;
    Ok(())
}

/// 写出 .csv（UTF-8）
pub fn write_csv(table: &Table, path: &Path) -> ExportResult<()> {
    let display = path.display().to_string();
    let mut writer = csv::Writer::from_path(path).map_err(|e| ExportError::write(&display, e))?;

    writer
        .write_record(table.columns())
        .map_err(|e| ExportError::write(&display, e))?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(CellValue::to_string))
            .map_err(|e| ExportError::write(&display, e))?;
    }
    writer.flush().map_err(|e| ExportError::write(&display, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::workbook_reader::open_workbook;
    use tempfile::TempDir;

    fn sample() -> Table {
        Table::new(
            vec!["Component".into(), "数量".into(), "备注".into()],
            vec![
                vec![CellValue::text("A"), CellValue::Number(2.5), CellValue::Empty],
                vec![CellValue::text("B"), CellValue::Number(0.0), CellValue::text("新增")],
            ],
        )
    }

    #[test]
    fn test_write_xlsx_round_trip_through_reader() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.xlsx");
        FileTableWriter.write(&sample(), &path).unwrap();

        let mut workbook = open_workbook(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec![OUTPUT_SHEET.to_string()]);
        let grid = workbook.read_grid(OUTPUT_SHEET).unwrap();
        assert_eq!(grid.get(0, 1), &CellValue::text("数量"));
        assert_eq!(grid.get(1, 1), &CellValue::Number(2.5));
        assert_eq!(grid.get(1, 2), &CellValue::Empty);
        assert_eq!(grid.get(2, 2), &CellValue::text("新增"));
    }

    #[test]
    fn test_write_csv_blank_for_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        FileTableWriter.write(&sample(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Component,数量,备注");
        assert_eq!(lines[1], "A,2.5,");
        assert_eq!(lines[2], "B,0,新增");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        let result = FileTableWriter.write(&sample(), &path);
        assert!(matches!(result, Err(ExportError::UnsupportedFormat(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_path() {
        let result = FileTableWriter.write(&sample(), Path::new("/nonexistent/dir/out.csv"));
        assert!(matches!(result, Err(ExportError::FileWriteError { .. })));
    }
}
