// ==========================================
// BOM 对账工具 - 国际化 (i18n)
// ==========================================
// 使用 rust-i18n，支持中文（默认）和英文
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::domain::types::SheetRole;

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"zh-CN" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use bom_reconcile::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数，占位符格式 `%{name}`）
///
/// # 示例
/// ```no_run
/// use bom_reconcile::i18n::t_with_args;
/// let msg = t_with_args("merge.saved", &[("path", "/tmp/out.xlsx")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 工作表角色的选择提示
pub fn sheet_prompt(role: SheetRole) -> String {
    t(role.prompt_key())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // locale 为全局状态，测试并行执行时需串行化
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(current_locale(), "en");

        set_locale("zh-CN");
        assert_eq!(current_locale(), "zh-CN");
    }

    #[test]
    fn test_sheet_prompts_in_both_locales() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(sheet_prompt(SheetRole::OldPrice), "请选择旧价格表");
        assert_eq!(sheet_prompt(SheetRole::NewBom), "请选择新BOM表");

        set_locale("en");
        assert_eq!(sheet_prompt(SheetRole::OldBom), "Select the old BOM sheet");

        set_locale("zh-CN");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        let msg = t_with_args("merge.saved", &[("path", "/tmp/out.xlsx")]);
        assert!(msg.contains("/tmp/out.xlsx"));
        assert!(msg.contains("合并完成"));

        set_locale("en");
        let msg = t_with_args("merge.cancelled", &[("stage", "old_bom")]);
        assert!(msg.contains("old_bom"));
        assert!(msg.contains("nothing was written"));

        set_locale("zh-CN");
    }
}
