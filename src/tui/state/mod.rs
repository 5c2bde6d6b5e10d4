//! TUI 状态模块

pub mod app;
pub mod input;
pub mod status;

pub use app::{AppState, ItemDetails};
pub use input::InputState;
pub use status::{StatusKind, StatusMessage};

/// 当前屏幕
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// 浏览并分类图片
    Review,
    /// 输入自定义名称
    CustomName,
    /// 会话结束摘要
    Summary,
}
