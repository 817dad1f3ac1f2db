// ==========================================
// BOM 对账工具 - 导入层
// ==========================================
// 职责: 打开工作簿，按工作表读取原始网格
// 支持: Excel (calamine), CSV
// ==========================================

pub mod error;
pub mod workbook_reader;

pub use error::{ImportError, ImportResult};
pub use workbook_reader::{
    open_workbook, CsvWorkbook, ExcelWorkbook, FileWorkbookOpener, InMemoryWorkbook,
    WorkbookOpener, WorkbookSource,
};
