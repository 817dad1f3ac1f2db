// ==========================================
// BOM 对账工具 - 表格合并流程
// ==========================================
// 流程: 选文件 → 依次选四张表 → 定位/对齐 → 价格⨝BOM（内连接）
//       → 新⟗旧（外连接） → 选保存路径 → 排序/填充 → 写出
// 红线: 任一环节取消即返回 Cancelled，不写任何文件
// ==========================================

use crate::app::error::AppResult;
use crate::app::prompter::MergePrompter;
use crate::app::report::{CancelStage, MergeReport, RunOutcome, SheetChoice};
use crate::config::ReconcileProfile;
use crate::domain::grid::RawGrid;
use crate::domain::table::Table;
use crate::domain::types::{Generation, SheetRole};
use crate::engine::{
    align_with_plan, finalize, join, locate, FinalizeOptions, JoinOptions, LabeledTable,
};
use crate::exporter::{FileTableWriter, TableWriter};
use crate::importer::{FileWorkbookOpener, ImportError, WorkbookOpener};
use chrono::Local;
use tracing::{info, instrument};
use uuid::Uuid;

/// 合并管线的中间结果
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    /// 新 ⟗ 旧（尚未排序/填充）
    pub table: Table,
    /// 各工作表抽取行数（按询问顺序）
    pub sheet_rows: [usize; 4],
    pub old_rows: usize,
    pub new_rows: usize,
}

/// 纯管线：四张原始网格 → 合并表
///
/// `grids` 按 `SheetRole::PROMPT_ORDER` 排列。
pub fn reconcile(grids: &[RawGrid; 4], profile: &ReconcileProfile) -> AppResult<Reconciled> {
    let extract = |role: SheetRole| -> AppResult<Table> {
        let anchor = profile.anchor(role.generation());
        let table = locate(&grids[role.index()], anchor, profile.duplicate_headers)?;
        let aligned = align_with_plan(&table, profile.plan(role));
        info!(
            role = %role,
            rows = aligned.row_count(),
            columns = aligned.column_count(),
            "工作表抽取完成"
        );
        Ok(aligned)
    };

    let old_price = extract(SheetRole::OldPrice)?;
    let old_bom = extract(SheetRole::OldBom)?;
    let new_price = extract(SheetRole::NewPrice)?;
    let new_bom = extract(SheetRole::NewBom)?;

    let key = profile.key_column.as_str();
    let (left, right) = &profile.inner_suffixes;
    let inner = JoinOptions::inner().with_suffixes(left, right);
    let (left, right) = &profile.outer_suffixes;
    let outer = JoinOptions::outer().with_suffixes(left, right);

    let old = join(
        LabeledTable::new(SheetRole::OldPrice.label(), &old_price),
        LabeledTable::new(SheetRole::OldBom.label(), &old_bom),
        key,
        &inner,
    )?;
    let new = join(
        LabeledTable::new(SheetRole::NewPrice.label(), &new_price),
        LabeledTable::new(SheetRole::NewBom.label(), &new_bom),
        key,
        &inner,
    )?;
    let merged = join(
        LabeledTable::new(Generation::New.label(), &new),
        LabeledTable::new(Generation::Old.label(), &old),
        key,
        &outer,
    )?;

    Ok(Reconciled {
        sheet_rows: [
            old_price.row_count(),
            old_bom.row_count(),
            new_price.row_count(),
            new_bom.row_count(),
        ],
        old_rows: old.row_count(),
        new_rows: new.row_count(),
        table: merged,
    })
}

/// 表格合并流程
pub struct MergeFlow<O = FileWorkbookOpener, W = FileTableWriter> {
    opener: O,
    writer: W,
    profile: ReconcileProfile,
}

impl MergeFlow {
    pub fn new(profile: ReconcileProfile) -> Self {
        Self::with_io(FileWorkbookOpener, FileTableWriter, profile)
    }
}

impl<O: WorkbookOpener, W: TableWriter> MergeFlow<O, W> {
    pub fn with_io(opener: O, writer: W, profile: ReconcileProfile) -> Self {
        Self {
            opener,
            writer,
            profile,
        }
    }

    pub fn profile(&self) -> &ReconcileProfile {
        &self.profile
    }

    /// 执行一次完整合并
    ///
    /// # 返回
    /// - Ok(Completed): 已写出文件
    /// - Ok(Cancelled): 用户在某一环节取消，未写入任何文件
    /// - Err: 读取/定位/连接/写出失败
    #[instrument(skip_all)]
    pub fn run(&self, prompts: &mut dyn MergePrompter) -> AppResult<RunOutcome<MergeReport>> {
        let run_id = Uuid::new_v4();
        let started_at = Local::now();

        let Some(input) = prompts.pick_input_file() else {
            info!("已取消文件选择");
            return Ok(RunOutcome::Cancelled {
                stage: CancelStage::InputFile,
            });
        };
        let input_display = input.display().to_string();

        let mut workbook = self.opener.open(&input)?;
        let names = workbook.sheet_names();
        if names.is_empty() {
            return Err(ImportError::NoSheets(input_display).into());
        }

        let mut chosen: [String; 4] = Default::default();
        for role in SheetRole::PROMPT_ORDER {
            match prompts.choose_sheet(role, &names) {
                Some(sheet) => chosen[role.index()] = sheet,
                None => {
                    info!(role = %role, "已取消工作表选择");
                    return Ok(RunOutcome::Cancelled {
                        stage: CancelStage::Sheet(role),
                    });
                }
            }
        }

        let grids = [
            workbook.read_grid(&chosen[0])?,
            workbook.read_grid(&chosen[1])?,
            workbook.read_grid(&chosen[2])?,
            workbook.read_grid(&chosen[3])?,
        ];
        let reconciled = reconcile(&grids, &self.profile)?;

        let Some(output) = prompts.pick_save_path() else {
            info!("已取消保存");
            return Ok(RunOutcome::Cancelled {
                stage: CancelStage::SavePath,
            });
        };

        let finished = finalize(
            &reconciled.table,
            &FinalizeOptions::sorted_by(&self.profile.key_column, self.profile.fill_policy),
        );
        self.writer.write(&finished, &output)?;

        let report = MergeReport {
            run_id,
            started_at,
            input: input_display,
            output: output.display().to_string(),
            sheets: SheetRole::PROMPT_ORDER
                .iter()
                .map(|role| SheetChoice {
                    role: *role,
                    sheet: chosen[role.index()].clone(),
                    rows: reconciled.sheet_rows[role.index()],
                })
                .collect(),
            old_rows: reconciled.old_rows,
            new_rows: reconciled.new_rows,
            rows: finished.row_count(),
            columns: finished.columns().to_vec(),
        };
        info!(
            run_id = %report.run_id,
            report = ?report,
            "合并完成"
        );
        Ok(RunOutcome::Completed(report))
    }
}
