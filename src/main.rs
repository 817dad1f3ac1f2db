// ==========================================
// BOM 对账工具 - 终端主入口
// ==========================================
// 无命令行参数；日志级别由 RUST_LOG 控制
// ==========================================

use bom_reconcile::app::Console;
use bom_reconcile::{logging, ProfileLoader};

fn main() -> anyhow::Result<()> {
    logging::init();
    logging::log_banner();

    let profile = ProfileLoader::load_default()?;

    let stdin = std::io::stdin();
    let mut console = Console::new(stdin.lock(), std::io::stdout());
    console.run_menu(&profile)?;

    tracing::info!("程序退出");
    Ok(())
}
