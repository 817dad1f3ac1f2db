// ==========================================
// BOM 对账工具 - 应用层
// ==========================================
// 职责: 串联导入/引擎/导出，实现合并流程与对比会话
// 交互: 通过 prompter 中的 trait 与外部界面解耦
// ==========================================

pub mod console;
pub mod diff_session;
pub mod error;
pub mod merge_flow;
pub mod prompter;
pub mod report;

// 重导出
pub use console::Console;
pub use diff_session::DiffSession;
pub use error::{AppError, AppResult};
pub use merge_flow::{reconcile, MergeFlow, Reconciled};
pub use prompter::{FilePrompter, MergePrompter, ResultViewer, SheetPrompter};
pub use report::{CancelStage, DeltaReport, MergeReport, RunOutcome, SheetChoice};
