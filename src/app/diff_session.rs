// ==========================================
// BOM 对账工具 - 当前/历史数据对比会话
// ==========================================
// 状态: 未加载 → 已加载（可勾选） → 已计算（可导出）
// 规则:
// 1. 重新加载文件会清空勾选与计算结果
// 2. 计算失败时保留上一次结果及其导出状态
// 3. 仅在计算成功后可导出
// ==========================================

use crate::app::error::{AppError, AppResult};
use crate::app::prompter::FilePrompter;
use crate::app::report::{CancelStage, DeltaReport, RunOutcome};
use crate::config::ReconcileProfile;
use crate::domain::selection::{ColumnSelector, SelectionOutcome};
use crate::domain::table::Table;
use crate::engine::{
    compute_deltas, finalize, table_from_header_row, DeltaOptions, DeltaOutcome, FinalizeOptions,
};
use crate::exporter::{FileTableWriter, TableWriter};
use crate::importer::{FileWorkbookOpener, WorkbookOpener};
use chrono::Local;
use std::collections::HashMap;
use std::path::Path;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// 已加载的输入表
#[derive(Debug, Clone)]
struct LoadedTable {
    path: String,
    table: Table,
    selector: ColumnSelector,
}

pub struct DiffSession<O = FileWorkbookOpener, W = FileTableWriter> {
    opener: O,
    writer: W,
    profile: ReconcileProfile,
    loaded: Option<LoadedTable>,
    result: Option<DeltaOutcome>,
}

impl DiffSession {
    pub fn new(profile: ReconcileProfile) -> Self {
        Self::with_io(FileWorkbookOpener, FileTableWriter, profile)
    }
}

impl<O: WorkbookOpener, W: TableWriter> DiffSession<O, W> {
    pub fn with_io(opener: O, writer: W, profile: ReconcileProfile) -> Self {
        Self {
            opener,
            writer,
            profile,
            loaded: None,
            result: None,
        }
    }

    /// 加载文件：第一张工作表，第 0 行为表头
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load(&mut self, path: impl AsRef<Path>) -> AppResult<&Table> {
        let path = path.as_ref();
        let mut workbook = self.opener.open(path)?;
        let (sheet, grid) = workbook.read_first_grid()?;
        let table = table_from_header_row(&grid, 0, self.profile.duplicate_headers)?;
        info!(
            sheet = %sheet,
            rows = table.row_count(),
            columns = table.column_count(),
            "文件加载完成"
        );

        let selector = ColumnSelector::new(
            table.columns().to_vec(),
            self.profile.naming.historical_marker.clone(),
        );
        self.result = None;
        let loaded = self.loaded.insert(LoadedTable {
            path: path.display().to_string(),
            table,
            selector,
        });
        Ok(&loaded.table)
    }

    /// 通过文件选择加载
    pub fn load_from_prompt(&mut self, files: &mut dyn FilePrompter) -> AppResult<RunOutcome<()>> {
        match files.pick_input_file() {
            Some(path) => {
                self.load(path)?;
                Ok(RunOutcome::Completed(()))
            }
            None => Ok(RunOutcome::Cancelled {
                stage: CancelStage::InputFile,
            }),
        }
    }

    pub fn table(&self) -> Option<&Table> {
        self.loaded.as_ref().map(|l| &l.table)
    }

    pub fn selector(&self) -> Option<&ColumnSelector> {
        self.loaded.as_ref().map(|l| &l.selector)
    }

    /// 设置单列勾选；历史列会被拒绝并保持未选中
    pub fn set_selected(&mut self, column: &str, selected: bool) -> AppResult<SelectionOutcome> {
        let loaded = self.loaded.as_mut().ok_or(AppError::NoTableLoaded)?;
        let outcome = loaded.selector.set(column, selected);
        if outcome == SelectionOutcome::RejectedHistorical {
            warn!(column = %column, "历史列不可选择");
        }
        Ok(outcome)
    }

    /// 切换单列勾选
    pub fn toggle(&mut self, column: &str) -> AppResult<SelectionOutcome> {
        let currently = self
            .selector()
            .ok_or(AppError::NoTableLoaded)?
            .is_selected(column);
        self.set_selected(column, !currently)
    }

    /// 批量应用勾选映射
    pub fn apply_selection(
        &mut self,
        mapping: &HashMap<String, bool>,
    ) -> AppResult<Vec<(String, SelectionOutcome)>> {
        let loaded = self.loaded.as_mut().ok_or(AppError::NoTableLoaded)?;
        Ok(loaded.selector.apply(mapping))
    }

    /// 计算差异
    ///
    /// 失败时保留上一次的结果。
    #[instrument(skip(self))]
    pub fn compute(&mut self) -> AppResult<&DeltaOutcome> {
        let loaded = self.loaded.as_ref().ok_or(AppError::NoTableLoaded)?;
        let selection = loaded.selector.selection();
        let options = DeltaOptions::from_profile(&self.profile);

        match compute_deltas(&loaded.table, &selection, &options) {
            Ok(outcome) => {
                info!(derived = outcome.derived_columns.len(), "计算完成");
                Ok(self.result.insert(outcome))
            }
            Err(err) => {
                error!(error = %err, "计算失败");
                Err(err.into())
            }
        }
    }

    pub fn result(&self) -> Option<&DeltaOutcome> {
        self.result.as_ref()
    }

    pub fn can_export(&self) -> bool {
        self.result.is_some()
    }

    /// 导出最近一次计算结果
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn export(&self, path: impl AsRef<Path>) -> AppResult<DeltaReport> {
        let path = path.as_ref();
        let (Some(loaded), Some(result)) = (self.loaded.as_ref(), self.result.as_ref()) else {
            return Err(AppError::NothingToExport);
        };

        let finished = finalize(
            &result.table,
            &FinalizeOptions::fill_only(self.profile.fill_policy),
        );
        self.writer.write(&finished, path)?;

        let report = DeltaReport {
            run_id: Uuid::new_v4(),
            exported_at: Local::now(),
            input: loaded.path.clone(),
            output: path.display().to_string(),
            pairs: result.mapping.pairs().to_vec(),
            derived_columns: result.derived_columns.clone(),
            rows: finished.row_count(),
        };
        info!(
            run_id = %report.run_id,
            report = ?report,
            "导出完成"
        );
        Ok(report)
    }

    /// 通过保存对话导出
    pub fn export_to_prompt(
        &self,
        files: &mut dyn FilePrompter,
    ) -> AppResult<RunOutcome<DeltaReport>> {
        if !self.can_export() {
            return Err(AppError::NothingToExport);
        }
        match files.pick_save_path() {
            Some(path) => Ok(RunOutcome::Completed(self.export(path)?)),
            None => Ok(RunOutcome::Cancelled {
                stage: CancelStage::SavePath,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::CellValue;
    use crate::domain::grid::RawGrid;
    use crate::engine::EngineError;
    use crate::exporter::ExportResult;
    use crate::importer::{ImportResult, InMemoryWorkbook, WorkbookSource};
    use std::cell::RefCell;

    struct MemoryOpener(RawGrid);

    impl WorkbookOpener for MemoryOpener {
        fn open(&self, _path: &Path) -> ImportResult<Box<dyn WorkbookSource>> {
            Ok(Box::new(InMemoryWorkbook::new().with_sheet("Sheet1", self.0.clone())))
        }
    }

    #[derive(Default)]
    struct RecordingWriter {
        written: RefCell<Vec<Table>>,
    }

    impl TableWriter for &RecordingWriter {
        fn write(&self, table: &Table, _path: &Path) -> ExportResult<()> {
            self.written.borrow_mut().push(table.clone());
            Ok(())
        }
    }

    fn grid() -> RawGrid {
        let t = CellValue::text;
        let n = CellValue::Number;
        RawGrid::new(vec![
            vec![t("Component"), t("Weight"), t("Weight_历史"), t("Height")],
            vec![t("A"), n(10.0), n(7.0), n(1.0)],
            vec![t("B"), n(5.0), n(5.0), n(2.0)],
        ])
    }

    fn session(writer: &RecordingWriter) -> DiffSession<MemoryOpener, &RecordingWriter> {
        DiffSession::with_io(MemoryOpener(grid()), writer, ReconcileProfile::default())
    }

    #[test]
    fn test_operations_require_loaded_table() {
        let writer = RecordingWriter::default();
        let mut s = session(&writer);
        assert!(matches!(s.compute(), Err(AppError::NoTableLoaded)));
        assert!(matches!(s.toggle("Weight"), Err(AppError::NoTableLoaded)));
        assert!(matches!(s.export("out.xlsx"), Err(AppError::NothingToExport)));
    }

    #[test]
    fn test_compute_then_export() {
        let writer = RecordingWriter::default();
        let mut s = session(&writer);
        s.load("bom.xlsx").unwrap();
        assert_eq!(s.toggle("Weight").unwrap(), SelectionOutcome::Selected);
        assert!(!s.can_export());

        let outcome = s.compute().unwrap();
        assert_eq!(outcome.table.cell(0, "Weight_差值"), Some(&CellValue::Number(3.0)));
        assert_eq!(outcome.table.cell(0, "Weight_remark"), Some(&CellValue::text("增加")));
        assert!(s.can_export());

        let report = s.export("out.xlsx").unwrap();
        assert_eq!(report.derived_columns, vec!["Weight_差值", "Weight_remark"]);
        assert_eq!(writer.written.borrow().len(), 1);
    }

    #[derive(Clone, Default)]
    struct SharedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for SharedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_export_logs_full_report() {
        let writer = RecordingWriter::default();
        let mut s = session(&writer);
        s.load("bom.xlsx").unwrap();
        s.toggle("Weight").unwrap();
        s.compute().unwrap();

        let log = SharedLog::default();
        let sink = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .finish();
        let report = tracing::subscriber::with_default(subscriber, || s.export("out.xlsx")).unwrap();

        let logged = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("导出完成"));
        assert!(logged.contains(&report.run_id.to_string()));
        assert!(logged.contains("derived_columns"));
        assert!(logged.contains("Weight_remark"));
    }

    #[test]
    fn test_historical_column_cannot_be_selected() {
        let writer = RecordingWriter::default();
        let mut s = session(&writer);
        s.load("bom.xlsx").unwrap();
        assert_eq!(
            s.toggle("Weight_历史").unwrap(),
            SelectionOutcome::RejectedHistorical
        );
        assert!(s.selector().unwrap().selection().is_empty());
    }

    #[test]
    fn test_failed_compute_keeps_previous_result() {
        let writer = RecordingWriter::default();
        let mut s = session(&writer);
        s.load("bom.xlsx").unwrap();
        s.toggle("Weight").unwrap();
        s.compute().unwrap();

        s.toggle("Height").unwrap();
        let err = s.compute().unwrap_err();
        assert!(matches!(
            err,
            AppError::Engine(EngineError::HistoricalColumnNotFound { ref column }) if column == "Height"
        ));
        assert!(s.can_export());
        assert_eq!(
            s.result().map(|r| r.derived_columns.len()),
            Some(2)
        );
    }

    #[test]
    fn test_empty_selection_is_error() {
        let writer = RecordingWriter::default();
        let mut s = session(&writer);
        s.load("bom.xlsx").unwrap();
        assert!(matches!(
            s.compute(),
            Err(AppError::Engine(EngineError::EmptySelection))
        ));
        assert!(!s.can_export());
    }

    #[test]
    fn test_reload_clears_result() {
        let writer = RecordingWriter::default();
        let mut s = session(&writer);
        s.load("bom.xlsx").unwrap();
        s.toggle("Weight").unwrap();
        s.compute().unwrap();
        s.load("bom.xlsx").unwrap();
        assert!(!s.can_export());
        assert!(!s.selector().unwrap().is_selected("Weight"));
    }
}
