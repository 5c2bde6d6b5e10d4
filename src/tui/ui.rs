//! UI渲染模块
//!
//! 按当前屏幕分派渲染。

use crate::tui::screens::{custom_name, review, summary};
use crate::tui::state::{AppState, Screen};
use crate::tui::theme::theme;
use ratatui::{
    DefaultTerminal, Frame,
    buffer::Buffer,
    layout::{Position, Rect},
    style::Style,
};

/// 设置全局背景
fn set_background(area: Rect, buf: &mut Buffer) {
    let style = Style::new().bg(theme().bg);
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut(Position { x, y }) {
                cell.set_style(style);
            }
        }
    }
}

/// 渲染整个应用
pub fn render(terminal: &mut DefaultTerminal, state: &AppState) -> std::io::Result<()> {
    terminal.draw(|frame| draw(frame, frame.area(), state))?;
    Ok(())
}

/// 主渲染函数
fn draw(frame: &mut Frame, area: Rect, state: &AppState) {
    set_background(area, frame.buffer_mut());

    match state.screen {
        Screen::Review => review::draw(frame, area, state),
        Screen::CustomName => {
            review::draw(frame, area, state);
            custom_name::draw(frame, area, state);
        }
        Screen::Summary => summary::draw(frame, area, state),
    }
}
