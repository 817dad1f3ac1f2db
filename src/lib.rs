// ==========================================
// BOM 对账工具 - 核心库
// ==========================================
// 功能: 新旧两代价格表/BOM表合并，当前-历史数据差异计算
// 技术栈: calamine + rust_xlsxwriter + csv, tracing, rust-i18n
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 单元格/网格/表格
pub mod domain;

// 导入层 - 工作簿读取
pub mod importer;

// 引擎层 - 定位/对齐/连接/差异/整理
pub mod engine;

// 导出层 - xlsx/csv 写出
pub mod exporter;

// 配置层 - 对账配置
pub mod config;

// 应用层 - 流程与终端交互
pub mod app;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

pub use app::{AppError, AppResult, DiffSession, MergeFlow, RunOutcome};
pub use config::{ProfileLoader, ReconcileProfile};
pub use domain::{CellValue, RawGrid, SelectedColumnSet, Table};
pub use engine::{compute_deltas, finalize, join, locate, EngineError};
pub use exporter::ExportError;
pub use importer::ImportError;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "BOM 对账工具";
