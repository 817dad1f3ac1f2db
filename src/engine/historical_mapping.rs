// ==========================================
// BOM 对账工具 - 当前列 → 历史列映射
// ==========================================
// 职责: 在任何计算开始前，一次性解析并校验全部配对
// 规则:
// 1. 显式配置（historical_overrides）优先
// 2. 价格列：其余含价格标记且未被选中的列中，取列顺序最后一个
// 3. 其他列：去尾后等于当前列名（或为 当前列+历史标记）且未被选中的列中，取最后一个
// 红线: 任一列无法配对即整体失败，不产生部分结果
// ==========================================

use crate::config::NamingConfig;
use crate::domain::selection::SelectedColumnSet;
use crate::domain::types::ColumnKind;
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 一组 当前列 / 历史列 配对
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPair {
    pub current: String,
    pub historical: String,
    pub kind: ColumnKind,
}

/// 已校验的配对表（按选择顺序）
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistoricalMapping {
    pairs: Vec<ColumnPair>,
}

impl HistoricalMapping {
    /// 解析配对
    ///
    /// # 参数
    /// - table_columns: 表格列（按列顺序）
    /// - selection: 已选当前列
    /// - naming: 命名约定
    ///
    /// # 返回
    /// - Err(EmptySelection): 未选择任何列
    /// - Err(UnknownColumn): 选中列不在表中
    /// - Err(HistoricalColumnNotFound): 某列找不到历史列
    pub fn resolve(
        table_columns: &[String],
        selection: &SelectedColumnSet,
        naming: &NamingConfig,
    ) -> EngineResult<Self> {
        if selection.is_empty() {
            return Err(EngineError::EmptySelection);
        }
        if let Some(unknown) = selection
            .columns()
            .iter()
            .find(|c| !table_columns.contains(c))
        {
            return Err(EngineError::UnknownColumn(unknown.clone()));
        }

        let mut pairs = Vec::with_capacity(selection.len());
        for current in selection.columns() {
            let kind = if naming.is_price(current) {
                ColumnKind::Price
            } else {
                ColumnKind::Generic
            };

            let historical = match naming.historical_overrides.get(current) {
                Some(explicit) => table_columns
                    .iter()
                    .find(|c| *c == explicit && !selection.contains(c)),
                None => table_columns.iter().rev().find(|candidate| {
                    !selection.contains(candidate)
                        && match kind {
                            ColumnKind::Price => naming.is_price(candidate),
                            ColumnKind::Generic => naming.is_generic_counterpart(current, candidate),
                        }
                }),
            };

            let historical = historical.ok_or_else(|| EngineError::HistoricalColumnNotFound {
                column: current.clone(),
            })?;
            debug!(current = %current, historical = %historical, ?kind, "历史列配对");
            pairs.push(ColumnPair {
                current: current.clone(),
                historical: historical.clone(),
                kind,
            });
        }
        Ok(Self { pairs })
    }

    pub fn pairs(&self) -> &[ColumnPair] {
        &self.pairs
    }

    pub fn price_pairs(&self) -> impl Iterator<Item = &ColumnPair> {
        self.pairs.iter().filter(|p| p.kind == ColumnKind::Price)
    }

    pub fn generic_pairs(&self) -> impl Iterator<Item = &ColumnPair> {
        self.pairs.iter().filter(|p| p.kind == ColumnKind::Generic)
    }

    /// 汇总计算使用的价格配对：最后一个被选中的价格列
    pub fn rollup_price(&self) -> Option<&ColumnPair> {
        self.price_pairs().last()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
