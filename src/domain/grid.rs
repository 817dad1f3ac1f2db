// ==========================================
// BOM 对账工具 - 原始网格
// ==========================================
// 职责: 工作表的无类型二维表示（绝对坐标，0 起始）
// 生命周期: 读取一次，只读，抽取后丢弃
// ==========================================

use crate::domain::cell::CellValue;

/// 原始网格（行优先）
///
/// 各行长度可以不同；越界读取一律视为 `Empty`。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGrid {
    rows: Vec<Vec<CellValue>>,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl RawGrid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// 行数
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// 最宽行的列数
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn row(&self, row: usize) -> &[CellValue] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 行优先遍历所有实际存在的单元格
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &CellValue)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, v)| (r, c, v)))
    }

    /// 在 (row, col) 处写入，必要时补齐空行/空列
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let target = &mut self.rows[row];
        if target.len() <= col {
            target.resize(col + 1, CellValue::Empty);
        }
        target[col] = value;
    }
}

impl From<Vec<Vec<CellValue>>> for RawGrid {
    fn from(rows: Vec<Vec<CellValue>>) -> Self {
        Self::new(rows)
    }
}
