// ==========================================
// BOM 对账工具 - 终端交互
// ==========================================
// 职责: 基于标准输入输出实现文件/工作表选择、结果预览与主菜单
// 约定: 空行或输入结束视为取消
// ==========================================

use crate::app::diff_session::DiffSession;
use crate::app::error::AppResult;
use crate::app::merge_flow::MergeFlow;
use crate::app::prompter::{FilePrompter, ResultViewer, SheetPrompter};
use crate::app::report::RunOutcome;
use crate::config::ReconcileProfile;
use crate::domain::selection::SelectionOutcome;
use crate::domain::table::Table;
use crate::domain::types::SheetRole;
use crate::i18n::{sheet_prompt, t, t_with_args};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{error, warn};

/// 预览最多显示的行数
pub const PREVIEW_ROWS: usize = 20;

/// 单元格最大显示宽度（字符）
const PREVIEW_CELL_WIDTH: usize = 16;

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// 输出提示并读取一行；空行或输入结束返回 None
    fn ask(&mut self, prompt: &str) -> Option<String> {
        if let Err(err) = write!(self.output, "{}", prompt).and_then(|_| self.output.flush()) {
            warn!(error = %err, "终端输出失败");
            return None;
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Err(err) => {
                warn!(error = %err, "终端输入读取失败");
                None
            }
        }
    }

    fn say(&mut self, message: &str) -> AppResult<()> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    /// 主菜单循环，直到选择退出或输入结束
    pub fn run_menu(&mut self, profile: &ReconcileProfile) -> AppResult<()> {
        loop {
            self.say("")?;
            self.say(&t("menu.title"))?;
            self.say(&t("menu.merge"))?;
            self.say(&t("menu.diff"))?;
            self.say(&t("menu.quit"))?;
            let Some(choice) = self.ask(&t("menu.choose")) else {
                return Ok(());
            };
            match choice.as_str() {
                "1" => self.run_merge(profile)?,
                "2" => self.run_diff(profile)?,
                "3" | "q" => return Ok(()),
                _ => self.say(&t("menu.invalid"))?,
            }
        }
    }

    /// 表格合并：错误只提示，不退出菜单
    pub fn run_merge(&mut self, profile: &ReconcileProfile) -> AppResult<()> {
        let flow = MergeFlow::new(profile.clone());
        match flow.run(&mut *self) {
            Ok(RunOutcome::Completed(report)) => {
                self.say(&t_with_args("merge.saved", &[("path", &report.output)]))
            }
            Ok(RunOutcome::Cancelled { stage }) => self.say(&t_with_args(
                "merge.cancelled",
                &[("stage", &stage.to_string())],
            )),
            Err(err) => {
                error!(error = %err, "合并失败");
                self.say(&t_with_args("common.error", &[("message", &err.to_string())]))
            }
        }
    }

    /// 当前/历史数据对比：加载 → 勾选 → 计算 → 导出
    pub fn run_diff(&mut self, profile: &ReconcileProfile) -> AppResult<()> {
        let mut session = DiffSession::new(profile.clone());
        match session.load_from_prompt(&mut *self) {
            Ok(RunOutcome::Completed(())) => {}
            Ok(RunOutcome::Cancelled { .. }) => return self.say(&t("common.cancelled")),
            Err(err) => {
                error!(error = %err, "加载失败");
                return self.say(&t_with_args("common.error", &[("message", &err.to_string())]));
            }
        }
        if let Some(table) = session.table() {
            let message = t_with_args(
                "diff.loaded",
                &[
                    ("columns", &table.column_count().to_string()),
                    ("rows", &table.row_count().to_string()),
                ],
            );
            self.say(&message)?;
        }

        loop {
            self.print_columns(&session)?;
            let Some(command) = self.ask(&t("diff.toggle_hint")) else {
                return Ok(());
            };
            match command.as_str() {
                "q" => return Ok(()),
                "c" => match session.compute() {
                    Ok(outcome) => {
                        let count = outcome.derived_columns.len().to_string();
                        self.show(&outcome.table, &outcome.derived_columns);
                        self.say(&t_with_args("diff.computed", &[("count", &count)]))?;
                    }
                    Err(err) => {
                        self.say(&t_with_args("common.error", &[("message", &err.to_string())]))?
                    }
                },
                "e" => {
                    if !session.can_export() {
                        self.say(&t("diff.export_unavailable"))?;
                        continue;
                    }
                    match session.export_to_prompt(&mut *self) {
                        Ok(RunOutcome::Completed(report)) => self.say(&t_with_args(
                            "diff.exported",
                            &[("path", &report.output)],
                        ))?,
                        Ok(RunOutcome::Cancelled { .. }) => self.say(&t("common.cancelled"))?,
                        Err(err) => self.say(&t_with_args(
                            "common.error",
                            &[("message", &err.to_string())],
                        ))?,
                    }
                }
                other => self.toggle_by_number(&mut session, other)?,
            }
        }
    }

    fn print_columns(&mut self, session: &DiffSession) -> AppResult<()> {
        let Some(selector) = session.selector() else {
            return Ok(());
        };
        let lines: Vec<String> = selector
            .columns()
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let mark = if selector.is_selected(column) { "x" } else { " " };
                format!("  {:>3}. [{}] {}", i + 1, mark, column)
            })
            .collect();
        self.say(&t("diff.columns_title"))?;
        for line in lines {
            self.say(&line)?;
        }
        Ok(())
    }

    fn toggle_by_number(&mut self, session: &mut DiffSession, input: &str) -> AppResult<()> {
        let column = input
            .parse::<usize>()
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| session.selector().and_then(|s| s.columns().get(i).cloned()));
        let Some(column) = column else {
            return self.say(&t("menu.invalid"));
        };
        if session.toggle(&column)? == SelectionOutcome::RejectedHistorical {
            let message = t_with_args("common.warning", &[("message", &t("diff.historical_rejected"))]);
            self.say(&message)?;
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> FilePrompter for Console<R, W> {
    fn pick_input_file(&mut self) -> Option<PathBuf> {
        self.ask(&t("prompt.input_file")).map(PathBuf::from)
    }

    fn pick_save_path(&mut self) -> Option<PathBuf> {
        self.ask(&t("prompt.save_file")).map(PathBuf::from)
    }
}

impl<R: BufRead, W: Write> SheetPrompter for Console<R, W> {
    fn choose_sheet(&mut self, role: SheetRole, sheets: &[String]) -> Option<String> {
        let mut listing = format!("{}\n{}\n", sheet_prompt(role), t("prompt.sheet_list"));
        for (i, sheet) in sheets.iter().enumerate() {
            listing.push_str(&format!("  {:>3}. {}\n", i + 1, sheet));
        }
        if write!(self.output, "{}", listing).is_err() {
            return None;
        }
        loop {
            let answer = self.ask(&t("prompt.sheet_index"))?;
            // 接受编号或工作表名
            let by_index = answer
                .parse::<usize>()
                .ok()
                .and_then(|i| i.checked_sub(1))
                .and_then(|i| sheets.get(i));
            let by_name = sheets.iter().find(|s| **s == answer);
            if let Some(sheet) = by_index.or(by_name) {
                return Some(sheet.clone());
            }
            if writeln!(self.output, "{}", t("menu.invalid")).is_err() {
                return None;
            }
        }
    }
}

impl<R: BufRead, W: Write> ResultViewer for Console<R, W> {
    fn show(&mut self, table: &Table, highlighted: &[String]) {
        let preview = render_preview(table, highlighted, PREVIEW_ROWS);
        if let Err(err) = write!(self.output, "{}", preview) {
            warn!(error = %err, "终端输出失败");
        }
    }
}

/// 渲染结果预览（新增列以 * 标记）
pub fn render_preview(table: &Table, highlighted: &[String], max_rows: usize) -> String {
    let shown = table.row_count().min(max_rows);
    let headers: Vec<String> = table
        .columns()
        .iter()
        .map(|c| {
            if highlighted.contains(c) {
                format!("*{}", c)
            } else {
                c.clone()
            }
        })
        .collect();
    let rows: Vec<Vec<String>> = table.rows()[..shown]
        .iter()
        .map(|row| row.iter().map(|v| v.to_string()).collect())
        .collect();

    let widths: Vec<usize> = (0..headers.len())
        .map(|c| {
            let cells = rows.iter().map(|r| r[c].chars().count());
            cells
                .chain(std::iter::once(headers[c].chars().count()))
                .max()
                .unwrap_or(0)
                .min(PREVIEW_CELL_WIDTH)
        })
        .collect();

    let mut out = t_with_args(
        "preview.title",
        &[
            ("shown", &shown.to_string()),
            ("total", &table.row_count().to_string()),
        ],
    );
    out.push('\n');
    out.push_str(&render_line(&headers, &widths));
    for row in &rows {
        out.push_str(&render_line(row, &widths));
    }
    out
}

fn render_line(cells: &[String], widths: &[usize]) -> String {
    let rendered: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| {
            let truncated: String = cell.chars().take(width).collect();
            let pad = width.saturating_sub(truncated.chars().count());
            format!("{}{}", truncated, " ".repeat(pad))
        })
        .collect();
    format!("| {} |\n", rendered.join(" | "))
}
