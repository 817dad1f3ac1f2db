// ==========================================
// BOM 对账工具 - 领域模型层
// ==========================================
// 职责: 单元格、网格、表格、列选择及枚举类型
// 红线: 不含文件读写，不含引擎逻辑
// ==========================================

pub mod cell;
pub mod grid;
pub mod selection;
pub mod table;
pub mod types;

// 重导出核心类型
pub use cell::{CellValue, JoinKey};
pub use grid::RawGrid;
pub use selection::{ColumnSelector, SelectedColumnSet, SelectionOutcome};
pub use table::Table;
pub use types::{
    ColumnKind, DuplicateHeaderPolicy, FillPolicy, Generation, JoinMode, PlatformPriceBasis,
    Remark, SheetRole,
};
