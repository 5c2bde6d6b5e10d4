//! Ratatui 终端 UI 模块
//!
//! 提供基于 ratatui 的图片浏览与分类界面。

pub mod app;
pub mod components;
pub mod event;
pub mod screens;
pub mod state;
pub mod theme;
pub mod ui;

pub use app::TuiApp;
pub use event::{EventPoll, TuiEvent};
pub use state::{AppState, InputState, Screen, StatusKind, StatusMessage};
pub use theme::{Theme, theme};
pub use ui::render;
