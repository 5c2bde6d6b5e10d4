//! Internationalization (i18n) module
//!
//! Provides language detection and localized strings for the review UI and
//! the `--list` output. Supports English and Chinese Simplified.
//! Note: Log messages remain in English for consistency.

use std::sync::OnceLock;

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    ChineseSimplified,
}

/// Global language instance
static LANGUAGE: OnceLock<Language> = OnceLock::new();

/// Initialize and get the current language based on system locale
pub fn get_language() -> Language {
    *LANGUAGE.get_or_init(detect_language)
}

/// Detect system language from environment variables
fn detect_language() -> Language {
    // Check common locale environment variables
    let locale = std::env::var("LC_ALL")
        .or_else(|_| std::env::var("LC_MESSAGES"))
        .or_else(|_| std::env::var("LANG"))
        .unwrap_or_default();

    language_from_locale(&locale)
}

fn language_from_locale(locale: &str) -> Language {
    let locale = locale.to_lowercase();
    if locale.starts_with("zh") || locale.contains("chinese") || locale.contains("hans") {
        Language::ChineseSimplified
    } else {
        Language::English
    }
}

/// Localized strings for the user interface
pub struct Strings;

impl Strings {
    pub fn app_title() -> &'static str {
        match get_language() {
            Language::English => "Photo Categorizer",
            Language::ChineseSimplified => "照片分类器",
        }
    }

    pub fn review_title() -> &'static str {
        match get_language() {
            Language::English => "Review",
            Language::ChineseSimplified => "浏览",
        }
    }

    pub fn item_label() -> &'static str {
        match get_language() {
            Language::English => "Item",
            Language::ChineseSimplified => "项目",
        }
    }

    pub fn pending_label() -> &'static str {
        match get_language() {
            Language::English => "pending",
            Language::ChineseSimplified => "待处理",
        }
    }

    pub fn file_label() -> &'static str {
        match get_language() {
            Language::English => "File",
            Language::ChineseSimplified => "文件",
        }
    }

    pub fn raw_label() -> &'static str {
        match get_language() {
            Language::English => "RAW",
            Language::ChineseSimplified => "RAW 文件",
        }
    }

    pub fn sidecars_label() -> &'static str {
        match get_language() {
            Language::English => "Sidecars",
            Language::ChineseSimplified => "附属文件",
        }
    }

    pub fn rotation_label() -> &'static str {
        match get_language() {
            Language::English => "Rotation",
            Language::ChineseSimplified => "旋转",
        }
    }

    pub fn custom_name_label() -> &'static str {
        match get_language() {
            Language::English => "Name",
            Language::ChineseSimplified => "命名",
        }
    }

    pub fn camera_label() -> &'static str {
        match get_language() {
            Language::English => "Camera",
            Language::ChineseSimplified => "相机",
        }
    }

    pub fn taken_label() -> &'static str {
        match get_language() {
            Language::English => "Taken",
            Language::ChineseSimplified => "拍摄时间",
        }
    }

    pub fn dimensions_label() -> &'static str {
        match get_language() {
            Language::English => "Size",
            Language::ChineseSimplified => "尺寸",
        }
    }

    pub fn none_value() -> &'static str {
        match get_language() {
            Language::English => "-",
            Language::ChineseSimplified => "-",
        }
    }

    pub fn categories_title() -> &'static str {
        match get_language() {
            Language::English => "Categories",
            Language::ChineseSimplified => "分类",
        }
    }

    pub fn controls_title() -> &'static str {
        match get_language() {
            Language::English => "Controls",
            Language::ChineseSimplified => "控制键",
        }
    }

    pub fn trash_suffix() -> &'static str {
        match get_language() {
            Language::English => "(trash)",
            Language::ChineseSimplified => "（回收）",
        }
    }

    pub fn control_next() -> &'static str {
        match get_language() {
            Language::English => "Next item",
            Language::ChineseSimplified => "下一项",
        }
    }

    pub fn control_previous() -> &'static str {
        match get_language() {
            Language::English => "Previous item",
            Language::ChineseSimplified => "上一项",
        }
    }

    pub fn control_rotate_clockwise() -> &'static str {
        match get_language() {
            Language::English => "Rotate clockwise",
            Language::ChineseSimplified => "顺时针旋转",
        }
    }

    pub fn control_rotate_counterclockwise() -> &'static str {
        match get_language() {
            Language::English => "Rotate counter-clockwise",
            Language::ChineseSimplified => "逆时针旋转",
        }
    }

    pub fn control_custom_name() -> &'static str {
        match get_language() {
            Language::English => "Set custom name",
            Language::ChineseSimplified => "设置自定义名称",
        }
    }

    pub fn control_help() -> &'static str {
        match get_language() {
            Language::English => "Toggle help",
            Language::ChineseSimplified => "显示/隐藏帮助",
        }
    }

    pub fn control_quit() -> &'static str {
        match get_language() {
            Language::English => "Quit",
            Language::ChineseSimplified => "退出",
        }
    }

    pub fn review_hint() -> &'static str {
        match get_language() {
            Language::English => "Press a category key to move the image | ? Help",
            Language::ChineseSimplified => "按分类键移动图片 | ? 帮助",
        }
    }

    pub fn input_hint() -> &'static str {
        match get_language() {
            Language::English => "Enter Confirm | Esc Cancel | empty name clears",
            Language::ChineseSimplified => "Enter 确认 | Esc 取消 | 留空清除名称",
        }
    }

    pub fn custom_name_prompt() -> &'static str {
        match get_language() {
            Language::English => "Custom name for this image",
            Language::ChineseSimplified => "为此图片输入自定义名称",
        }
    }

    pub fn committed_to() -> &'static str {
        match get_language() {
            Language::English => "Moved to",
            Language::ChineseSimplified => "已移动到",
        }
    }

    pub fn dry_run_committed_to() -> &'static str {
        match get_language() {
            Language::English => "Would move to",
            Language::ChineseSimplified => "将移动到",
        }
    }

    pub fn unresolved_key() -> &'static str {
        match get_language() {
            Language::English => "No category for key",
            Language::ChineseSimplified => "此键未绑定分类：",
        }
    }

    pub fn commit_failed() -> &'static str {
        match get_language() {
            Language::English => "Move failed:",
            Language::ChineseSimplified => "移动失败：",
        }
    }

    pub fn custom_name_cleared() -> &'static str {
        match get_language() {
            Language::English => "Custom name cleared",
            Language::ChineseSimplified => "已清除自定义名称",
        }
    }

    pub fn custom_name_set() -> &'static str {
        match get_language() {
            Language::English => "Custom name set:",
            Language::ChineseSimplified => "已设置自定义名称：",
        }
    }

    pub fn dry_run_notice() -> &'static str {
        match get_language() {
            Language::English => "Note: dry run mode, no files were moved.",
            Language::ChineseSimplified => "注意：演练模式，未移动任何文件。",
        }
    }

    pub fn session_complete() -> &'static str {
        match get_language() {
            Language::English => "Session Complete",
            Language::ChineseSimplified => "浏览完成",
        }
    }

    pub fn all_items_reviewed() -> &'static str {
        match get_language() {
            Language::English => "All images have been categorized.",
            Language::ChineseSimplified => "所有图片均已分类。",
        }
    }

    pub fn statistics() -> &'static str {
        match get_language() {
            Language::English => "Statistics",
            Language::ChineseSimplified => "统计",
        }
    }

    pub fn stat_committed() -> &'static str {
        match get_language() {
            Language::English => "Categorized",
            Language::ChineseSimplified => "已分类",
        }
    }

    pub fn stat_remaining() -> &'static str {
        match get_language() {
            Language::English => "Remaining",
            Language::ChineseSimplified => "剩余",
        }
    }

    pub fn stat_failed() -> &'static str {
        match get_language() {
            Language::English => "Failed",
            Language::ChineseSimplified => "失败",
        }
    }

    pub fn stat_skipped() -> &'static str {
        match get_language() {
            Language::English => "Skipped",
            Language::ChineseSimplified => "跳过",
        }
    }

    pub fn stat_unresolved() -> &'static str {
        match get_language() {
            Language::English => "Unbound keys",
            Language::ChineseSimplified => "未绑定按键",
        }
    }

    pub fn log_saved_to() -> &'static str {
        match get_language() {
            Language::English => "Log saved to:",
            Language::ChineseSimplified => "日志已保存至：",
        }
    }

    pub fn summary_hint() -> &'static str {
        match get_language() {
            Language::English => "Press Enter or Esc to exit",
            Language::ChineseSimplified => "按 Enter 或 Esc 退出",
        }
    }

    pub fn key_map() -> &'static str {
        match get_language() {
            Language::English => "Key Map",
            Language::ChineseSimplified => "按键映射",
        }
    }

    pub fn queue() -> &'static str {
        match get_language() {
            Language::English => "Queue",
            Language::ChineseSimplified => "队列",
        }
    }

    pub fn queue_empty() -> &'static str {
        match get_language() {
            Language::English => "No images found in the input directory.",
            Language::ChineseSimplified => "输入目录中未找到图片。",
        }
    }

    pub fn config_written() -> &'static str {
        match get_language() {
            Language::English => "Sample configuration written to:",
            Language::ChineseSimplified => "示例配置已写入：",
        }
    }

    pub fn input_dir_label() -> &'static str {
        match get_language() {
            Language::English => "Input",
            Language::ChineseSimplified => "输入目录",
        }
    }

    pub fn output_dir_label() -> &'static str {
        match get_language() {
            Language::English => "Output",
            Language::ChineseSimplified => "输出目录",
        }
    }

    pub fn input_dir_not_exist() -> &'static str {
        match get_language() {
            Language::English => "Input directory does not exist:",
            Language::ChineseSimplified => "输入目录不存在：",
        }
    }

    pub fn no_categories_warning() -> &'static str {
        match get_language() {
            Language::English => "No categories configured; only the trash key is available.",
            Language::ChineseSimplified => "未配置分类，仅可使用回收键。",
        }
    }

    pub fn item_position(index: usize, total: usize, pending: usize) -> String {
        format!(
            "{} {}/{} ({} {})",
            Self::item_label(),
            index,
            total,
            pending,
            Self::pending_label()
        )
    }

    pub fn control_label(control: crate::config::Control) -> &'static str {
        use crate::config::Control;
        match control {
            Control::Next => Self::control_next(),
            Control::Previous => Self::control_previous(),
            Control::RotateClockwise => Self::control_rotate_clockwise(),
            Control::RotateCounterClockwise => Self::control_rotate_counterclockwise(),
            Control::CustomName => Self::control_custom_name(),
            Control::Help => Self::control_help(),
            Control::Quit => Self::control_quit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_locale() {
        assert_eq!(language_from_locale("zh_CN.UTF-8"), Language::ChineseSimplified);
        assert_eq!(language_from_locale("zh-Hans"), Language::ChineseSimplified);
        assert_eq!(language_from_locale("en_US.UTF-8"), Language::English);
        assert_eq!(language_from_locale(""), Language::English);
    }

    #[test]
    fn test_strings_exist() {
        // Ensure string functions return non-empty strings
        assert!(!Strings::app_title().is_empty());
        assert!(!Strings::session_complete().is_empty());
        assert!(Strings::item_position(2, 10, 5).contains("2/10"));
    }
}
