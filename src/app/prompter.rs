// ==========================================
// BOM 对账工具 - 外部交互接口
// ==========================================
// 职责: 文件选择、工作表选择、结果展示
// 约定: 返回 None 表示用户取消
// ==========================================

use crate::domain::table::Table;
use crate::domain::types::SheetRole;
use std::path::PathBuf;

pub trait FilePrompter {
    /// 选择要打开的文件
    fn pick_input_file(&mut self) -> Option<PathBuf>;

    /// 选择保存路径
    fn pick_save_path(&mut self) -> Option<PathBuf>;
}

pub trait SheetPrompter {
    /// 为指定角色选择工作表
    ///
    /// # 参数
    /// - role: 工作表角色（决定提示文字）
    /// - sheets: 工作簿中全部工作表名
    fn choose_sheet(&mut self, role: SheetRole, sheets: &[String]) -> Option<String>;
}

pub trait ResultViewer {
    /// 展示结果表；`highlighted` 为本次新增的列
    fn show(&mut self, table: &Table, highlighted: &[String]);
}

/// 合并流程所需的交互（文件 + 工作表）
pub trait MergePrompter: FilePrompter + SheetPrompter {}

impl<T: FilePrompter + SheetPrompter + ?Sized> MergePrompter for T {}
