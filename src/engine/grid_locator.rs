// ==========================================
// BOM 对账工具 - 表头定位器 (Grid Locator)
// ==========================================
// 职责: 在无结构网格中按锚点文字定位表头块，抽取右下方子表
// 规则:
// 1. 行优先扫描，取首个与锚点完全相等的文本单元格
// 2. 表头 = 锚点行中自锚点列起连续的非空单元格
// 3. 数据 = 锚点行以下全部行，按表头跨度切片（空行原样保留）
// ==========================================

use crate::domain::cell::CellValue;
use crate::domain::grid::RawGrid;
use crate::domain::table::Table;
use crate::domain::types::DuplicateHeaderPolicy;
use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashMap;
use tracing::{debug, warn};

/// 锚点位置（行, 列），0 起始
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub row: usize,
    pub col: usize,
}

/// 行优先扫描锚点文字
pub fn find_anchor(grid: &RawGrid, anchor: &str) -> Option<Anchor> {
    grid.cells()
        .find(|(_, _, cell)| cell.as_text() == Some(anchor))
        .map(|(row, col, _)| Anchor { row, col })
}

/// 定位锚点并抽取子表
///
/// # 参数
/// - grid: 原始网格
/// - anchor: 锚点文字（如 "Component" / "JPN"）
/// - policy: 重复表头处理策略
///
/// # 返回
/// - Ok(Table): 行数 = grid.height() - anchor.row - 1
/// - Err(AnchorNotFound): 网格中无该文字
/// - Err(DuplicateHeader): 表头重复且策略为 Reject
pub fn locate(grid: &RawGrid, anchor: &str, policy: DuplicateHeaderPolicy) -> ImportResult<Table> {
    let position = find_anchor(grid, anchor).ok_or_else(|| ImportError::AnchorNotFound {
        anchor: anchor.to_string(),
    })?;
    debug!(anchor = anchor, row = position.row, col = position.col, "锚点定位完成");

    // 表头：遇到第一个空白单元格即停止
    let headers: Vec<String> = grid
        .row(position.row)
        .iter()
        .skip(position.col)
        .map_while(CellValue::header_text)
        .collect();
    let headers = resolve_duplicate_headers(headers, policy)?;

    let span = headers.len();
    let rows: Vec<Vec<CellValue>> = ((position.row + 1)..grid.height())
        .map(|r| {
            (position.col..position.col + span)
                .map(|c| grid.get(r, c).clone())
                .collect()
        })
        .collect();

    debug!(columns = span, rows = rows.len(), "子表抽取完成");
    Ok(Table::new(headers, rows))
}

/// 以第 `header_row` 行为表头读取整张网格（差异工具的直接读取方式）
///
/// 空白表头命名为 `Unnamed: {i}`。
pub fn table_from_header_row(
    grid: &RawGrid,
    header_row: usize,
    policy: DuplicateHeaderPolicy,
) -> ImportResult<Table> {
    let width = grid.width();
    let headers: Vec<String> = (0..width)
        .map(|c| {
            grid.get(header_row, c)
                .header_text()
                .unwrap_or_else(|| format!("Unnamed: {}", c))
        })
        .collect();
    let headers = resolve_duplicate_headers(headers, policy)?;

    let rows = ((header_row + 1)..grid.height())
        .map(|r| (0..width).map(|c| grid.get(r, c).clone()).collect())
        .collect();
    Ok(Table::new(headers, rows))
}

/// 处理重复表头
///
/// Disambiguate: 第 n 次重复出现改名为 `name.n`（跳过已被占用的名字）
fn resolve_duplicate_headers(
    headers: Vec<String>,
    policy: DuplicateHeaderPolicy,
) -> ImportResult<Vec<String>> {
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut resolved: Vec<String> = Vec::with_capacity(headers.len());

    for (idx, header) in headers.iter().enumerate() {
        match first_seen.get(header) {
            None => {
                first_seen.insert(header.clone(), idx);
                resolved.push(header.clone());
            }
            Some(&first) => match policy {
                DuplicateHeaderPolicy::Reject => {
                    return Err(ImportError::DuplicateHeader {
                        column: header.clone(),
                        first,
                        second: idx,
                    });
                }
                DuplicateHeaderPolicy::Disambiguate => {
                    let counter = counts.entry(header.clone()).or_insert(0);
                    let mut candidate;
                    loop {
                        *counter += 1;
                        candidate = format!("{}.{}", header, counter);
                        if !headers.contains(&candidate) && !resolved.contains(&candidate) {
                            break;
                        }
                    }
                    warn!(column = %header, renamed = %candidate, "表头重复，已按位置改名");
                    resolved.push(candidate);
                }
            },
        }
    }
    Ok(resolved)
}
