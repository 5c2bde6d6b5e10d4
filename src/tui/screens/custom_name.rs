//! 自定义名称输入弹窗

use crate::i18n::Strings;
use crate::tui::components::{centered_rect, render_hint, render_popup};
use crate::tui::state::AppState;
use crate::tui::theme::theme;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    text::Line,
};

/// 在浏览屏幕上方渲染输入框
pub fn draw(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup = centered_rect(60, 6, area);
    let lines = vec![
        Line::from(""),
        Line::from(format!(" {}", state.input.value())).style(theme().normal()),
    ];
    render_popup(Strings::custom_name_prompt(), lines, frame, popup);

    let [_, hint, _] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(2),
        Constraint::Min(0),
    ])
    .horizontal_margin(1)
    .areas(popup);
    render_hint(Strings::input_hint(), frame, hint);

    // 边框 1 + 前导空格 1
    let cursor_x = popup.x + 2 + state.input.visual_cursor_position() as u16;
    frame.set_cursor_position(Position::new(
        cursor_x.min(popup.right().saturating_sub(2)),
        popup.y + 2,
    ));
}
