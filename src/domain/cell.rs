// ==========================================
// BOM 对账工具 - 单元格值与连接键
// ==========================================
// 职责: 定义无类型表格中的单元格取值及其算术语义
// 红线: 缺失值在算术中传播，不抛错
// ==========================================

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// ==========================================
// CellValue - 单元格值
// ==========================================
/// 单元格取值：文本 / 数值 / 缺失
///
/// 数值为 NaN 时在所有判断中等同于缺失。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// 是否缺失（Empty 或 NaN）
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Number(n) => n.is_nan(),
            CellValue::Text(_) => false,
        }
    }

    /// 是否空白（缺失或空字符串）
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Text(s) => s.is_empty(),
            other => other.is_missing(),
        }
    }

    /// 取数值；文本与缺失一律返回 None
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if !n.is_nan() => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// 逐元素减法，任一操作数非数值则结果缺失
    pub fn minus(&self, other: &CellValue) -> CellValue {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => CellValue::Number(a - b),
            _ => CellValue::Empty,
        }
    }

    /// 逐元素乘法，任一操作数非数值则结果缺失
    pub fn times(&self, other: &CellValue) -> CellValue {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => CellValue::Number(a * b),
            _ => CellValue::Empty,
        }
    }

    /// 作为表头文本渲染：整数值不带小数点
    pub fn header_text(&self) -> Option<String> {
        if self.is_blank() {
            return None;
        }
        Some(self.to_string())
    }

    /// 连接/排序用的键
    pub fn join_key(&self) -> JoinKey {
        match self {
            CellValue::Text(s) => JoinKey::Text(s.clone()),
            CellValue::Number(n) if !n.is_nan() => {
                // -0.0 与 0.0 视为同一键
                let normalized = if *n == 0.0 { 0.0 } else { *n };
                JoinKey::Number(normalized.to_bits())
            }
            _ => JoinKey::Missing,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => {
                if n.is_nan() {
                    Ok(())
                } else if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

// ==========================================
// JoinKey - 可哈希、可排序的连接键
// ==========================================
// 数值与文本互不相等；缺失键永不匹配
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JoinKey {
    Number(u64), // f64 位模式
    Text(String),
    Missing,
}

impl JoinKey {
    pub fn is_missing(&self) -> bool {
        matches!(self, JoinKey::Missing)
    }

    fn rank(&self) -> u8 {
        match self {
            JoinKey::Number(_) => 0,
            JoinKey::Text(_) => 1,
            JoinKey::Missing => 2,
        }
    }
}

impl Ord for JoinKey {
    /// 数值升序 → 文本按码点升序 → 缺失排最后
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (JoinKey::Number(a), JoinKey::Number(b)) => {
                f64::from_bits(*a).total_cmp(&f64::from_bits(*b))
            }
            (JoinKey::Text(a), JoinKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for JoinKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
