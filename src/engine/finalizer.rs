// ==========================================
// BOM 对账工具 - 结果整理 (Finalizer)
// ==========================================
// 职责: 按键列稳定排序 + 缺失值填充
// 排序: 数值升序 → 文本按码点升序 → 缺失排最后
// ==========================================

use crate::domain::cell::CellValue;
use crate::domain::table::Table;
use crate::domain::types::FillPolicy;
use tracing::debug;

/// 整理选项
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalizeOptions {
    /// 排序键；None 或表中不存在时保持原顺序
    pub sort_key: Option<String>,
    pub fill: FillPolicy,
}

impl FinalizeOptions {
    pub fn sorted_by(key: impl Into<String>, fill: FillPolicy) -> Self {
        Self {
            sort_key: Some(key.into()),
            fill,
        }
    }

    pub fn fill_only(fill: FillPolicy) -> Self {
        Self {
            sort_key: None,
            fill,
        }
    }
}

pub fn finalize(table: &Table, options: &FinalizeOptions) -> Table {
    let sorted = match options
        .sort_key
        .as_deref()
        .and_then(|key| table.column_index(key))
    {
        Some(idx) => {
            let mut order: Vec<usize> = (0..table.row_count()).collect();
            // sort_by_key 为稳定排序
            order.sort_by_key(|&r| table.rows()[r][idx].join_key());
            table.reorder_rows(&order)
        }
        None => table.clone(),
    };

    let numeric: Vec<bool> = (0..sorted.column_count())
        .map(|c| match options.fill {
            FillPolicy::All => true,
            FillPolicy::NumericOnly => sorted
                .rows()
                .iter()
                .all(|row| row[c].is_blank() || row[c].as_number().is_some()),
        })
        .collect();

    debug!(
        rows = sorted.row_count(),
        filled_columns = numeric.iter().filter(|n| **n).count(),
        "结果整理完成"
    );

    sorted.map_cells(|c, value| {
        if value.is_blank() {
            if numeric[c] {
                CellValue::Number(0.0)
            } else {
                CellValue::Empty
            }
        } else {
            value.clone()
        }
    })
}
