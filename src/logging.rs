// ==========================================
// BOM 对账工具 - 日志初始化
// ==========================================
// 工具: tracing + tracing-subscriber (EnvFilter)
// 控制台程序的交互输出走 stdout，日志写 stderr
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=bom_reconcile=trace
///
/// # 示例
/// ```no_run
/// use bom_reconcile::logging;
/// logging::init();
/// ```
pub fn init() {
    // 从环境变量读取日志级别，默认为 info
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// 初始化测试环境的日志系统
///
/// 重复调用安全；级别固定为 debug
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("bom_reconcile=debug"))
        .with_test_writer()
        .try_init();
}

/// 启动时输出程序名与版本
pub fn log_banner() {
    tracing::info!(version = crate::VERSION, "{} 启动", crate::APP_NAME);
}
