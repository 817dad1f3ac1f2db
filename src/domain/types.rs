// ==========================================
// BOM 对账工具 - 领域类型定义
// ==========================================
// 职责: 工作表角色、连接方式、列分类、备注等级及各类策略枚举
// ==========================================

use crate::domain::cell::CellValue;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 代际 (Generation)
// ==========================================
// Old = 平台化（历史），New = 定点（当前）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Generation {
    Old,
    New,
}

impl Generation {
    /// 合并后表格的标签（用于错误信息）
    pub fn label(&self) -> &'static str {
        match self {
            Generation::Old => "旧表",
            Generation::New => "新表",
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Generation::Old => write!(f, "old"),
            Generation::New => write!(f, "new"),
        }
    }
}

// ==========================================
// 工作表角色 (Sheet Role)
// ==========================================
// 合并工具按固定顺序依次询问四张表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetRole {
    OldPrice,
    OldBom,
    NewPrice,
    NewBom,
}

impl SheetRole {
    /// 询问顺序：旧价格表 → 旧BOM表 → 新价格表 → 新BOM表
    pub const PROMPT_ORDER: [SheetRole; 4] = [
        SheetRole::OldPrice,
        SheetRole::OldBom,
        SheetRole::NewPrice,
        SheetRole::NewBom,
    ];

    pub fn generation(&self) -> Generation {
        match self {
            SheetRole::OldPrice | SheetRole::OldBom => Generation::Old,
            SheetRole::NewPrice | SheetRole::NewBom => Generation::New,
        }
    }

    /// 在询问顺序中的位置
    pub fn index(&self) -> usize {
        match self {
            SheetRole::OldPrice => 0,
            SheetRole::OldBom => 1,
            SheetRole::NewPrice => 2,
            SheetRole::NewBom => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SheetRole::OldPrice => "旧价格表",
            SheetRole::OldBom => "旧BOM表",
            SheetRole::NewPrice => "新价格表",
            SheetRole::NewBom => "新BOM表",
        }
    }

    /// i18n 消息键
    pub fn prompt_key(&self) -> &'static str {
        match self {
            SheetRole::OldPrice => "merge.prompt_old_price",
            SheetRole::OldBom => "merge.prompt_old_bom",
            SheetRole::NewPrice => "merge.prompt_new_price",
            SheetRole::NewBom => "merge.prompt_new_bom",
        }
    }
}

impl fmt::Display for SheetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetRole::OldPrice => write!(f, "old_price"),
            SheetRole::OldBom => write!(f, "old_bom"),
            SheetRole::NewPrice => write!(f, "new_price"),
            SheetRole::NewBom => write!(f, "new_bom"),
        }
    }
}

// ==========================================
// 连接方式 (Join Mode)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinMode {
    Inner,
    Outer,
}

impl fmt::Display for JoinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinMode::Inner => write!(f, "inner"),
            JoinMode::Outer => write!(f, "outer"),
        }
    }
}

// ==========================================
// 列分类 (Column Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Price,   // 列名含价格标记
    Generic, // 其余属性列（数量等）
}

// ==========================================
// 备注等级 (Remark)
// ==========================================
// 由差值符号派生；零值判断为精确相等，无容差
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Remark {
    Increase,
    Unchanged,
    Decrease,
    Empty,
}

impl Remark {
    /// 根据差值单元格判定备注
    ///
    /// - 差值 > 0 → Increase
    /// - 差值 == 0 → Unchanged
    /// - 缺失 / 空字符串 → Empty
    /// - 其他 → Decrease
    pub fn from_diff(diff: &CellValue) -> Remark {
        if diff.is_blank() {
            return Remark::Empty;
        }
        match diff.as_number() {
            Some(x) if x > 0.0 => Remark::Increase,
            Some(x) if x == 0.0 => Remark::Unchanged,
            _ => Remark::Decrease,
        }
    }
}

// ==========================================
// 重复表头策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateHeaderPolicy {
    /// 按位置改名：第二次出现记为 `name.1`，依此类推
    #[default]
    Disambiguate,
    /// 直接报错
    Reject,
}

// ==========================================
// 缺失值填充策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    /// 仅数值列缺失补 0，文本列保持空白
    #[default]
    NumericOnly,
    /// 全表缺失补 0
    All,
}

// ==========================================
// 平台化总价所乘单价
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlatformPriceBasis {
    /// 乘当前（定点）单价
    #[default]
    Current,
    /// 乘历史（平台化）单价
    Historical,
}
