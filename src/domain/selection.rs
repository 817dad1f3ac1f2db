// ==========================================
// BOM 对账工具 - 列选择
// ==========================================
// 职责: 维护"当前列"勾选状态，并产出不可变的 SelectedColumnSet
// 红线: 含历史标记的列永远不可被选中
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// SelectedColumnSet - 已选当前列（不可变）
// ==========================================
/// 按表格列顺序排列的已选当前列
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectedColumnSet {
    columns: Vec<String>,
}

impl SelectedColumnSet {
    /// 由表格列顺序 + 勾选判定构造；带历史标记的列被剔除
    pub fn from_table_order<F>(table_columns: &[String], historical_marker: &str, is_chosen: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        let columns = table_columns
            .iter()
            .filter(|c| is_chosen(c) && !c.contains(historical_marker))
            .cloned()
            .collect();
        Self { columns }
    }

    /// 直接指定列（调用方保证顺序）；带历史标记的列被剔除
    pub fn new(columns: Vec<String>, historical_marker: &str) -> Self {
        Self {
            columns: columns
                .into_iter()
                .filter(|c| !c.contains(historical_marker))
                .collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }
}

// ==========================================
// SelectionOutcome - 单次勾选结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOutcome {
    Selected,
    Deselected,
    /// 历史列被拒绝，保持未选中（界面应提示警告）
    RejectedHistorical,
    UnknownColumn,
}

// ==========================================
// ColumnSelector - 勾选状态
// ==========================================
#[derive(Debug, Clone)]
pub struct ColumnSelector {
    columns: Vec<String>,
    selected: HashMap<String, bool>,
    historical_marker: String,
}

impl ColumnSelector {
    pub fn new(columns: Vec<String>, historical_marker: impl Into<String>) -> Self {
        let selected = columns.iter().map(|c| (c.clone(), false)).collect();
        Self {
            columns,
            selected,
            historical_marker: historical_marker.into(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    fn is_historical(&self, column: &str) -> bool {
        column.contains(&self.historical_marker)
    }

    pub fn is_selected(&self, column: &str) -> bool {
        self.selected.get(column).copied().unwrap_or(false)
    }

    /// 设置单列勾选状态
    pub fn set(&mut self, column: &str, selected: bool) -> SelectionOutcome {
        let historical = self.is_historical(column);
        let Some(state) = self.selected.get_mut(column) else {
            return SelectionOutcome::UnknownColumn;
        };
        if selected && historical {
            *state = false;
            return SelectionOutcome::RejectedHistorical;
        }
        *state = selected;
        if selected {
            SelectionOutcome::Selected
        } else {
            SelectionOutcome::Deselected
        }
    }

    /// 批量应用勾选映射，返回每列的结果（按表格列顺序）
    pub fn apply(&mut self, mapping: &HashMap<String, bool>) -> Vec<(String, SelectionOutcome)> {
        let mut outcomes = Vec::new();
        for column in self.columns.clone() {
            if let Some(&flag) = mapping.get(&column) {
                outcomes.push((column.clone(), self.set(&column, flag)));
            }
        }
        for column in mapping.keys() {
            if !self.selected.contains_key(column) {
                outcomes.push((column.clone(), SelectionOutcome::UnknownColumn));
            }
        }
        outcomes
    }

    /// 当前勾选的快照
    pub fn selection(&self) -> SelectedColumnSet {
        SelectedColumnSet::from_table_order(&self.columns, &self.historical_marker, |c| {
            self.is_selected(c)
        })
    }
}
