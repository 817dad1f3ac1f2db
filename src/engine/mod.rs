// ==========================================
// BOM 对账工具 - 引擎层
// ==========================================
// 职责: 定位 → 对齐 → 连接 → 差异 → 整理
// 红线: 引擎函数均为纯函数，不修改输入，不做 I/O
// ==========================================

pub mod delta;
pub mod error;
pub mod finalizer;
pub mod grid_locator;
pub mod historical_mapping;
pub mod join;
pub mod schema_aligner;

// 重导出核心引擎
pub use delta::{compute_deltas, DeltaOptions, DeltaOutcome};
pub use error::{EngineError, EngineResult};
pub use finalizer::{finalize, FinalizeOptions};
pub use grid_locator::{find_anchor, locate, table_from_header_row, Anchor};
pub use historical_mapping::{ColumnPair, HistoricalMapping};
pub use join::{join, JoinOptions, LabeledTable};
pub use schema_aligner::{align, align_with_plan};
