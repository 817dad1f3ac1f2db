// ==========================================
// BOM 对账工具 - 应用层错误类型
// ==========================================
// 职责: 汇总导入/引擎/导出/配置各层错误
// ==========================================

use crate::config::ConfigError;
use crate::engine::EngineError;
use crate::exporter::ExportError;
use crate::importer::ImportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("请先选择文件！")]
    NoTableLoaded,

    #[error("请先完成计算再导出")]
    NothingToExport,

    #[error("终端读写失败: {0}")]
    Console(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;
