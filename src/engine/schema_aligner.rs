// ==========================================
// BOM 对账工具 - 表结构对齐 (Schema Aligner)
// ==========================================
// 职责: 精确重命名 + 白名单投影，使两代表格共享键列与语义列名
// 说明: 白名单中缺失的列直接忽略，不在此层报错；
//       键列缺失会在连接阶段以 MissingKeyColumn 暴露
// ==========================================

use crate::config::AlignmentPlan;
use crate::domain::table::Table;
use std::collections::HashMap;
use tracing::debug;

/// 重命名后投影
///
/// # 参数
/// - table: 抽取得到的表格
/// - rename_map: 精确匹配的列名映射
/// - keep_columns: 保留列（按此顺序）；None 表示保留全部
pub fn align(
    table: &Table,
    rename_map: &HashMap<String, String>,
    keep_columns: Option<&[String]>,
) -> Table {
    let renamed = table.rename_columns(rename_map);
    let aligned = match keep_columns {
        Some(keep) => renamed.select_columns(keep),
        None => renamed,
    };

    if let Some(keep) = keep_columns {
        let dropped = keep.iter().filter(|k| !aligned.has_column(k)).count();
        if dropped > 0 {
            debug!(missing = dropped, "白名单中有列不存在，已忽略");
        }
    }
    aligned
}

/// 按对齐方案执行
pub fn align_with_plan(table: &Table, plan: &AlignmentPlan) -> Table {
    align(table, &plan.rename, plan.keep.as_deref())
}
