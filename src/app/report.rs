// ==========================================
// BOM 对账工具 - 运行结果
// ==========================================
// 职责: 流程结束状态与运行报告（可序列化，写入日志）
// ==========================================

use crate::domain::types::SheetRole;
use crate::engine::ColumnPair;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 取消发生的环节
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "stage", content = "role")]
pub enum CancelStage {
    InputFile,
    Sheet(SheetRole),
    SavePath,
}

impl fmt::Display for CancelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelStage::InputFile => write!(f, "input_file"),
            CancelStage::Sheet(role) => write!(f, "sheet:{}", role),
            CancelStage::SavePath => write!(f, "save_path"),
        }
    }
}

/// 流程结束状态
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome<T> {
    Completed(T),
    /// 已取消，未写入任何文件
    Cancelled { stage: CancelStage },
}

impl<T> RunOutcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunOutcome::Cancelled { .. })
    }

    pub fn completed(self) -> Option<T> {
        match self {
            RunOutcome::Completed(value) => Some(value),
            RunOutcome::Cancelled { .. } => None,
        }
    }
}

/// 单张工作表的选择与抽取结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetChoice {
    pub role: SheetRole,
    pub sheet: String,
    pub rows: usize,
}

/// 合并工具运行报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Local>,
    pub input: String,
    pub output: String,
    pub sheets: Vec<SheetChoice>,
    pub old_rows: usize,
    pub new_rows: usize,
    pub rows: usize,
    pub columns: Vec<String>,
}

/// 差异工具导出报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaReport {
    pub run_id: Uuid,
    pub exported_at: DateTime<Local>,
    pub input: String,
    pub output: String,
    pub pairs: Vec<ColumnPair>,
    pub derived_columns: Vec<String>,
    pub rows: usize,
}
