// ==========================================
// BOM 对账工具 - 对账配置 (Reconcile Profile)
// ==========================================
// 职责: 锚点、对齐方案、连接后缀、派生列命名、策略枚举
// 存储: JSON 文件（缺省字段一律取内置默认值）
// ==========================================

use crate::domain::types::{
    DuplicateHeaderPolicy, FillPolicy, Generation, PlatformPriceBasis, Remark, SheetRole,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 模板中的列名占位符
pub const COLUMN_PLACEHOLDER: &str = "{col}";

/// 对账配置（持久化对象）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileProfile {
    /// 连接键列名
    pub key_column: String,

    pub anchors: AnchorConfig,

    pub old_price: AlignmentPlan,
    pub old_bom: AlignmentPlan,
    pub new_price: AlignmentPlan,
    pub new_bom: AlignmentPlan,

    /// 价格表 ⨝ BOM表 时的后缀
    pub inner_suffixes: (String, String),

    /// 新 ⟗ 旧 合并时的后缀（旧侧重名列追加 ".1"）
    pub outer_suffixes: (String, String),

    pub naming: NamingConfig,

    pub remark_labels: RemarkLabels,

    pub platform_price_basis: PlatformPriceBasis,

    pub duplicate_headers: DuplicateHeaderPolicy,

    pub fill_policy: FillPolicy,
}

impl Default for ReconcileProfile {
    fn default() -> Self {
        Self {
            key_column: "Component".to_string(),
            anchors: AnchorConfig::default(),
            old_price: AlignmentPlan::new(
                &[("JPN", "Component"), ("Price", "平台化单价")],
                Some(&["Component", "平台化单价"]),
            ),
            old_bom: AlignmentPlan::new(&[("JPN", "Component")], None),
            new_price: AlignmentPlan::new(&[("单价", "定点单价")], Some(&["Component", "定点单价"])),
            new_bom: AlignmentPlan::default(),
            inner_suffixes: ("_x".to_string(), "_y".to_string()),
            outer_suffixes: (String::new(), ".1".to_string()),
            naming: NamingConfig::default(),
            remark_labels: RemarkLabels::default(),
            platform_price_basis: PlatformPriceBasis::default(),
            duplicate_headers: DuplicateHeaderPolicy::default(),
            fill_policy: FillPolicy::default(),
        }
    }
}

impl ReconcileProfile {
    /// 该代际表格的锚点文字
    pub fn anchor(&self, generation: Generation) -> &str {
        match generation {
            Generation::Old => &self.anchors.old_generation,
            Generation::New => &self.anchors.new_generation,
        }
    }

    /// 该工作表角色的对齐方案
    pub fn plan(&self, role: SheetRole) -> &AlignmentPlan {
        match role {
            SheetRole::OldPrice => &self.old_price,
            SheetRole::OldBom => &self.old_bom,
            SheetRole::NewPrice => &self.new_price,
            SheetRole::NewBom => &self.new_bom,
        }
    }
}

/// 两代表格的锚点文字
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorConfig {
    pub new_generation: String,
    pub old_generation: String,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            new_generation: "Component".to_string(),
            old_generation: "JPN".to_string(),
        }
    }
}

/// 对齐方案：精确重命名 + 可选白名单
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentPlan {
    pub rename: HashMap<String, String>,
    /// None = 保留全部列
    pub keep: Option<Vec<String>>,
}

impl AlignmentPlan {
    pub fn new(rename: &[(&str, &str)], keep: Option<&[&str]>) -> Self {
        Self {
            rename: rename
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            keep: keep.map(|cols| cols.iter().map(|c| c.to_string()).collect()),
        }
    }
}

/// 差异计算中的列名约定与派生列模板
///
/// 模板中 `{col}` 替换为当前列名。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub price_marker: String,
    pub historical_marker: String,
    /// 历史列名去掉末尾若干字符后等于当前列名
    pub strip_chars: usize,
    /// 显式指定的 当前列 → 历史列，优先于命名规则
    pub historical_overrides: HashMap<String, String>,
    /// 仅选中一个价格列时的差值列名
    pub price_diff_single: String,
    pub price_diff_template: String,
    pub diff_template: String,
    pub remark_template: String,
    pub fixed_total_template: String,
    pub platform_total_template: String,
    pub cost_diff_template: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            price_marker: "单价".to_string(),
            historical_marker: "_历史".to_string(),
            strip_chars: 2,
            historical_overrides: HashMap::new(),
            price_diff_single: "价格差值".to_string(),
            price_diff_template: "{col}_价格差值".to_string(),
            diff_template: "{col}_差值".to_string(),
            remark_template: "{col}_remark".to_string(),
            fixed_total_template: "{col}定点总价".to_string(),
            platform_total_template: "{col}平台化总价".to_string(),
            cost_diff_template: "{col} BOM Cost 差异".to_string(),
        }
    }
}

impl NamingConfig {
    /// 列名是否含价格标记
    pub fn is_price(&self, column: &str) -> bool {
        column.contains(&self.price_marker)
    }

    /// 去掉末尾 `strip_chars` 个字符（按字符而非字节）
    pub fn strip_suffix<'a>(&self, column: &'a str) -> &'a str {
        let count = column.chars().count();
        if count <= self.strip_chars {
            return "";
        }
        match column.char_indices().nth(count - self.strip_chars) {
            Some((idx, _)) => &column[..idx],
            None => column,
        }
    }

    /// 非价格列的命名匹配：去尾后相等，或为 `当前列 + 历史标记`
    pub fn is_generic_counterpart(&self, current: &str, candidate: &str) -> bool {
        if candidate == current {
            return false;
        }
        self.strip_suffix(candidate) == current
            || candidate
                .strip_prefix(current)
                .is_some_and(|rest| rest == self.historical_marker)
    }

    pub fn price_diff(&self, column: &str) -> String {
        render(&self.price_diff_template, column)
    }

    pub fn diff(&self, column: &str) -> String {
        render(&self.diff_template, column)
    }

    pub fn remark(&self, column: &str) -> String {
        render(&self.remark_template, column)
    }

    pub fn fixed_total(&self, column: &str) -> String {
        render(&self.fixed_total_template, column)
    }

    pub fn platform_total(&self, column: &str) -> String {
        render(&self.platform_total_template, column)
    }

    pub fn cost_diff(&self, column: &str) -> String {
        render(&self.cost_diff_template, column)
    }

    /// 必须含 `{col}` 的模板（字段名, 模板）
    pub fn templates(&self) -> [(&'static str, &str); 6] {
        [
            ("price_diff_template", &self.price_diff_template),
            ("diff_template", &self.diff_template),
            ("remark_template", &self.remark_template),
            ("fixed_total_template", &self.fixed_total_template),
            ("platform_total_template", &self.platform_total_template),
            ("cost_diff_template", &self.cost_diff_template),
        ]
    }
}

fn render(template: &str, column: &str) -> String {
    template.replace(COLUMN_PLACEHOLDER, column)
}

/// 备注文字
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemarkLabels {
    pub increase: String,
    pub unchanged: String,
    pub decrease: String,
    pub empty: String,
}

impl Default for RemarkLabels {
    fn default() -> Self {
        Self {
            increase: "增加".to_string(),
            unchanged: "不变".to_string(),
            decrease: "减少".to_string(),
            empty: String::new(),
        }
    }
}

impl RemarkLabels {
    pub fn label(&self, remark: Remark) -> &str {
        match remark {
            Remark::Increase => &self.increase,
            Remark::Unchanged => &self.unchanged,
            Remark::Decrease => &self.decrease,
            Remark::Empty => &self.empty,
        }
    }
}
