// ==========================================
// BOM 对账工具 - 引擎层错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// 连接键在某一侧缺失，整条流水线中止
    #[error("{table} 缺少'{key}'列（{side}侧）")]
    MissingKeyColumn {
        side: String,
        table: String,
        key: String,
    },

    /// 当前列找不到对应历史列，整次计算中止
    #[error("未找到 {column} 对应的历史列")]
    HistoricalColumnNotFound { column: String },

    #[error("请至少选择一个当前数据列")]
    EmptySelection,

    #[error("列不存在: {0}")]
    UnknownColumn(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
