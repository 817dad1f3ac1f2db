// ==========================================
// BOM 对账工具 - 配置层
// ==========================================
// 职责: 对账配置的结构定义、加载与校验
// 存储: JSON 文件（serde_json）
// ==========================================

pub mod profile;
pub mod profile_loader;

pub use profile::{
    AlignmentPlan, AnchorConfig, NamingConfig, ReconcileProfile, RemarkLabels,
    COLUMN_PLACEHOLDER,
};
pub use profile_loader::{ConfigError, ConfigResult, ProfileLoader};
