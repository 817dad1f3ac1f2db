// ==========================================
// BOM 对账工具 - 差异计算器 (Delta Calculator)
// ==========================================
// 职责: 当前 - 历史 差值、备注、定点/平台化总价、BOM Cost 差异
// 流程:
// 1. 解析 HistoricalMapping（失败则不做任何计算）
// 2. 按选择顺序输出每列差值（普通列附带备注）
// 3. 以最后一个选中的价格列做汇总：定点总价 → 平台化总价 → 成本差异
// 红线: 输入表不被修改；汇总一律读取原始列，不读取差值列
// ==========================================

use crate::config::{NamingConfig, ReconcileProfile, RemarkLabels};
use crate::domain::cell::CellValue;
use crate::domain::selection::SelectedColumnSet;
use crate::domain::table::Table;
use crate::domain::types::{ColumnKind, PlatformPriceBasis, Remark};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::historical_mapping::HistoricalMapping;
use tracing::{info, instrument, warn};

/// 差异计算选项
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeltaOptions {
    pub naming: NamingConfig,
    pub remark_labels: RemarkLabels,
    pub platform_price_basis: PlatformPriceBasis,
}

impl DeltaOptions {
    pub fn from_profile(profile: &ReconcileProfile) -> Self {
        Self {
            naming: profile.naming.clone(),
            remark_labels: profile.remark_labels.clone(),
            platform_price_basis: profile.platform_price_basis,
        }
    }
}

/// 计算结果
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaOutcome {
    /// 输入表副本 + 派生列
    pub table: Table,
    /// 派生列名（按计算顺序）
    pub derived_columns: Vec<String>,
    pub mapping: HistoricalMapping,
}

/// 计算差异
///
/// # 返回
/// - Err(EmptySelection / UnknownColumn / HistoricalColumnNotFound): 配对阶段失败
#[instrument(skip_all, fields(rows = table.row_count(), selected = selection.len()))]
pub fn compute_deltas(
    table: &Table,
    selection: &SelectedColumnSet,
    options: &DeltaOptions,
) -> EngineResult<DeltaOutcome> {
    let naming = &options.naming;
    let mapping = HistoricalMapping::resolve(table.columns(), selection, naming)?;

    let mut out = table.clone();
    let mut derived = DerivedColumns::default();
    let single_price = mapping.price_pairs().count() == 1;

    for pair in mapping.pairs() {
        let diff = column_diff(table, &pair.current, &pair.historical)?;
        match pair.kind {
            ColumnKind::Price => {
                let name = if single_price {
                    naming.price_diff_single.clone()
                } else {
                    naming.price_diff(&pair.current)
                };
                derived.set(&mut out, name, diff);
            }
            ColumnKind::Generic => {
                let remarks = diff
                    .iter()
                    .map(|d| remark_cell(&options.remark_labels, d))
                    .collect();
                derived.set(&mut out, naming.diff(&pair.current), diff);
                derived.set(&mut out, naming.remark(&pair.current), remarks);
            }
        }
    }

    match mapping.rollup_price() {
        Some(price) => {
            let current_price = raw_column(table, &price.current)?;
            let basis = match options.platform_price_basis {
                PlatformPriceBasis::Current => current_price.clone(),
                PlatformPriceBasis::Historical => raw_column(table, &price.historical)?,
            };

            let mut fixed_totals = Vec::new();
            for pair in mapping.generic_pairs() {
                let values = product(&raw_column(table, &pair.current)?, &current_price);
                derived.set(&mut out, naming.fixed_total(&pair.current), values.clone());
                fixed_totals.push(values);
            }

            let mut platform_totals = Vec::new();
            for pair in mapping.generic_pairs() {
                let values = product(&raw_column(table, &pair.historical)?, &basis);
                derived.set(&mut out, naming.platform_total(&pair.current), values.clone());
                platform_totals.push(values);
            }

            for ((pair, fixed), platform) in mapping
                .generic_pairs()
                .zip(&fixed_totals)
                .zip(&platform_totals)
            {
                let values = fixed.iter().zip(platform).map(|(f, p)| f.minus(p)).collect();
                derived.set(&mut out, naming.cost_diff(&pair.current), values);
            }
        }
        None => {
            if mapping.generic_pairs().next().is_some() {
                warn!("未选择价格列，跳过总价与 BOM Cost 差异计算");
            }
        }
    }

    info!(
        pairs = mapping.len(),
        derived = derived.names.len(),
        "差异计算完成"
    );
    Ok(DeltaOutcome {
        table: out,
        derived_columns: derived.names,
        mapping,
    })
}

/// 派生列名登记（重名时只记录一次，值原位覆盖）
#[derive(Default)]
struct DerivedColumns {
    names: Vec<String>,
}

impl DerivedColumns {
    fn set(&mut self, table: &mut Table, name: String, values: Vec<CellValue>) {
        table.set_column(&name, values);
        if !self.names.contains(&name) {
            self.names.push(name);
        }
    }
}

fn raw_column(table: &Table, name: &str) -> EngineResult<Vec<CellValue>> {
    table
        .column(name)
        .ok_or_else(|| EngineError::UnknownColumn(name.to_string()))
}

fn column_diff(table: &Table, current: &str, historical: &str) -> EngineResult<Vec<CellValue>> {
    let current = raw_column(table, current)?;
    let historical = raw_column(table, historical)?;
    Ok(current
        .iter()
        .zip(&historical)
        .map(|(c, h)| c.minus(h))
        .collect())
}

fn product(left: &[CellValue], right: &[CellValue]) -> Vec<CellValue> {
    left.iter().zip(right).map(|(l, r)| l.times(r)).collect()
}

fn remark_cell(labels: &RemarkLabels, diff: &CellValue) -> CellValue {
    let label = labels.label(Remark::from_diff(diff));
    if label.is_empty() {
        CellValue::Empty
    } else {
        CellValue::text(label)
    }
}
