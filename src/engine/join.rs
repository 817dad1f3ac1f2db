// ==========================================
// BOM 对账工具 - 连接引擎 (Join Engine)
// ==========================================
// 职责: 按键列做内连接 / 外连接
// 规则:
// 1. 输出列 = 左表全部列 + 右表除键列外的列
// 2. 两侧同名非键列分别追加左/右后缀
// 3. 左行按序输出，每个左行与所有匹配右行配对（多对多为笛卡尔积）
// 4. 外连接：未匹配左行原位保留，仅右侧存在的行追加在末尾
// 5. 缺失键永不匹配；内连接直接丢弃
// ==========================================

use crate::domain::cell::{CellValue, JoinKey};
use crate::domain::table::Table;
use crate::domain::types::JoinMode;
use crate::engine::error::{EngineError, EngineResult};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// 连接选项
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOptions {
    pub mode: JoinMode,
    /// (左后缀, 右后缀)
    pub suffixes: (String, String),
}

impl JoinOptions {
    pub fn inner() -> Self {
        Self {
            mode: JoinMode::Inner,
            suffixes: ("_x".to_string(), "_y".to_string()),
        }
    }

    pub fn outer() -> Self {
        Self {
            mode: JoinMode::Outer,
            suffixes: (String::new(), ".1".to_string()),
        }
    }

    pub fn with_suffixes(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.suffixes = (left.into(), right.into());
        self
    }
}

/// 带标签的表格引用（用于错误信息）
#[derive(Debug, Clone, Copy)]
pub struct LabeledTable<'a> {
    pub label: &'a str,
    pub table: &'a Table,
}

impl<'a> LabeledTable<'a> {
    pub fn new(label: &'a str, table: &'a Table) -> Self {
        Self { label, table }
    }
}

/// 按键列连接两张表
///
/// # 返回
/// - Err(MissingKeyColumn): 任一侧缺少键列
pub fn join(
    left: LabeledTable<'_>,
    right: LabeledTable<'_>,
    key: &str,
    options: &JoinOptions,
) -> EngineResult<Table> {
    let left_key = left
        .table
        .column_index(key)
        .ok_or_else(|| missing_key("left", left.label, key))?;
    let right_key = right
        .table
        .column_index(key)
        .ok_or_else(|| missing_key("right", right.label, key))?;

    let columns = output_columns(left.table, right.table, right_key, &options.suffixes);
    let right_width = right.table.column_count() - 1;

    // 右表键 → 行下标（保持右表顺序）
    let mut right_index: HashMap<JoinKey, Vec<usize>> = HashMap::new();
    for (i, row) in right.table.rows().iter().enumerate() {
        let k = row[right_key].join_key();
        if !k.is_missing() {
            right_index.entry(k).or_default().push(i);
        }
    }

    let mut out = Table::with_columns(columns);
    let mut matched_right: HashSet<usize> = HashSet::new();

    for left_row in left.table.rows() {
        let k = left_row[left_key].join_key();
        match right_index.get(&k) {
            Some(indices) => {
                for &ri in indices {
                    matched_right.insert(ri);
                    let mut row = left_row.clone();
                    row.extend(right_non_key(&right.table.rows()[ri], right_key));
                    out.push_row(row);
                }
            }
            None if options.mode == JoinMode::Outer => {
                let mut row = left_row.clone();
                row.extend(std::iter::repeat(CellValue::Empty).take(right_width));
                out.push_row(row);
            }
            None => {}
        }
    }

    if options.mode == JoinMode::Outer {
        for (ri, right_row) in right.table.rows().iter().enumerate() {
            if matched_right.contains(&ri) {
                continue;
            }
            let mut row = vec![CellValue::Empty; left.table.column_count()];
            row[left_key] = right_row[right_key].clone();
            row.extend(right_non_key(right_row, right_key));
            out.push_row(row);
        }
    }

    debug!(
        left = left.label,
        right = right.label,
        mode = %options.mode,
        left_rows = left.table.row_count(),
        right_rows = right.table.row_count(),
        out_rows = out.row_count(),
        "连接完成"
    );
    Ok(out)
}

fn missing_key(side: &str, table: &str, key: &str) -> EngineError {
    EngineError::MissingKeyColumn {
        side: side.to_string(),
        table: table.to_string(),
        key: key.to_string(),
    }
}

fn right_non_key(row: &[CellValue], right_key: usize) -> impl Iterator<Item = CellValue> + '_ {
    row.iter()
        .enumerate()
        .filter(move |(i, _)| *i != right_key)
        .map(|(_, v)| v.clone())
}

/// 计算输出列名；同名非键列追加后缀
fn output_columns(
    left: &Table,
    right: &Table,
    right_key: usize,
    suffixes: &(String, String),
) -> Vec<String> {
    let key = &right.columns()[right_key];
    let right_names: HashSet<&String> = right
        .columns()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != right_key)
        .map(|(_, c)| c)
        .collect();
    let left_names: HashSet<&String> = left.columns().iter().filter(|c| *c != key).collect();

    let mut columns: Vec<String> = left
        .columns()
        .iter()
        .map(|c| {
            if c != key && right_names.contains(c) {
                format!("{}{}", c, suffixes.0)
            } else {
                c.clone()
            }
        })
        .collect();

    for (i, c) in right.columns().iter().enumerate() {
        if i == right_key {
            continue;
        }
        if left_names.contains(c) {
            columns.push(format!("{}{}", c, suffixes.1));
        } else {
            columns.push(c.clone());
        }
    }
    columns
}
