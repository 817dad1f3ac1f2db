// ==========================================
// BOM 对账工具 - 带表头的表格
// ==========================================
// 职责: 抽取/对齐/连接/差异计算之间流转的统一表格结构
// 不变量: 每行长度恒等于列数
// ==========================================

use crate::domain::cell::CellValue;
use std::collections::HashMap;

/// 带表头的表格（行优先存储）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// 创建表格；行长度不足补 `Empty`，超出截断
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// 按列名取整列（克隆）
    pub fn column(&self, name: &str) -> Option<Vec<CellValue>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r[idx].clone()).collect())
    }

    /// 追加一行；长度按列数补齐或截断
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(row);
    }

    /// 写入整列：同名列原位覆盖，否则追加到末尾
    ///
    /// `values` 长度与行数不一致时按行数补齐或截断。
    pub fn set_column(&mut self, name: &str, mut values: Vec<CellValue>) {
        values.resize(self.rows.len(), CellValue::Empty);
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }

    /// 精确重命名列；映射中不存在的列保持原名
    pub fn rename_columns(&self, rename_map: &HashMap<String, String>) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| rename_map.get(c).cloned().unwrap_or_else(|| c.clone()))
            .collect();
        Table {
            columns,
            rows: self.rows.clone(),
        }
    }

    /// 按给定顺序投影列；不存在的列直接跳过
    pub fn select_columns(&self, keep: &[String]) -> Table {
        let indices: Vec<usize> = keep
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect();
        let columns = indices.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Table { columns, rows }
    }

    /// 对每个单元格应用变换（列下标 + 值）
    pub fn map_cells<F>(&self, mut f: F) -> Table
    where
        F: FnMut(usize, &CellValue) -> CellValue,
    {
        let rows = self
            .rows
            .iter()
            .map(|row| row.iter().enumerate().map(|(i, v)| f(i, v)).collect())
            .collect();
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// 按给定行下标顺序重排
    pub fn reorder_rows(&self, order: &[usize]) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: order.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec!["Component".into(), "Qty".into(), "Price".into()],
            vec![
                vec![CellValue::text("A"), CellValue::Number(2.0), CellValue::Number(10.0)],
                vec![CellValue::text("B"), CellValue::Number(3.0)],
            ],
        )
    }

    #[test]
    fn test_rows_padded_to_width() {
        let table = sample();
        assert_eq!(table.rows()[1].len(), 3);
        assert_eq!(table.cell(1, "Price"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_set_column_append_and_overwrite() {
        let mut table = sample();
        table.set_column("Diff", vec![CellValue::Number(1.0), CellValue::Number(2.0)]);
        assert_eq!(table.columns().last().map(String::as_str), Some("Diff"));

        table.set_column("Qty", vec![CellValue::Number(9.0)]);
        assert_eq!(table.column_count(), 4);
        assert_eq!(table.cell(0, "Qty"), Some(&CellValue::Number(9.0)));
        assert_eq!(table.cell(1, "Qty"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_select_columns_follows_keep_order_and_skips_absent() {
        let table = sample();
        let keep = vec!["Price".to_string(), "Missing".to_string(), "Component".to_string()];
        let projected = table.select_columns(&keep);
        assert_eq!(projected.columns(), &["Price".to_string(), "Component".to_string()]);
        assert_eq!(projected.cell(0, "Price"), Some(&CellValue::Number(10.0)));
    }

    #[test]
    fn test_rename_columns_exact_match_only() {
        let table = sample();
        let mut map = HashMap::new();
        map.insert("Price".to_string(), "平台化单价".to_string());
        map.insert("price".to_string(), "ignored".to_string());
        let renamed = table.rename_columns(&map);
        assert_eq!(renamed.columns()[2], "平台化单价");
        assert!(!renamed.has_column("ignored"));
    }
}
