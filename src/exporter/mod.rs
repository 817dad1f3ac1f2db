// ==========================================
// BOM 对账工具 - 导出层
// ==========================================
// 职责: 将结果表写为单个 .xlsx / .csv 文件
// ==========================================

pub mod error;
pub mod table_writer;

pub use error::{ExportError, ExportResult};
pub use table_writer::{write_csv, write_xlsx, FileTableWriter, TableWriter, OUTPUT_SHEET};
