// ==========================================
// 销售预测与生产计划 - 国际化 (i18n)
// ==========================================
// 使用 rust-i18n 库,支持中文（默认）和英文
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["zh-CN", "en"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言；不支持的语言返回 false 且保持原设置
pub fn set_locale(locale: &str) -> bool {
    if !SUPPORTED_LOCALES.contains(&locale) {
        tracing::warn!(locale, "不支持的语言,保持当前设置");
        return false;
    }
    rust_i18n::set_locale(locale);
    true
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use sales_planning::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数,占位符格式 `%{name}`）
///
/// # 示例
/// ```no_run
/// use sales_planning::i18n::t_with_args;
/// let msg = t_with_args("import.file_not_found", &[("path", "/tmp/sales.csv")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(t(key), |acc, (k, v)| {
        acc.replace(&format!("%{{{}}}", k), v)
    })
}

/// 批量翻译（用于建议动作列表）
pub fn t_all(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| t(k)).collect()
}
