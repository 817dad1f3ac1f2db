// ==========================================
// BOM 对账工具 - 导出模块错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("文件写入失败: {path}: {message}")]
    FileWriteError { path: String, message: String },

    #[error("导出格式不支持: {0}（仅支持 .xlsx/.csv）")]
    UnsupportedFormat(String),

    #[error("表格超出 Excel 行列上限: {rows} 行 × {columns} 列")]
    TooLarge { rows: usize, columns: usize },
}

impl ExportError {
    pub fn write(path: &str, err: impl std::fmt::Display) -> Self {
        ExportError::FileWriteError {
            path: path.to_string(),
            message: err.to_string(),
        }
    }
}

pub type ExportResult<T> = Result<T, ExportError>;
