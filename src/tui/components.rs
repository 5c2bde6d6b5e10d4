//! Common UI components module
//!
//! Reusable layout helpers shared by the review and summary screens.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme::theme;
use crate::key::Key;

/// Three-panel layout: header, body, footer
pub fn three_panel_layout(area: Rect) -> [Rect; 3] {
    Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(2),
    ])
    .areas(area)
}

/// Centered area of a fixed size, clamped to `area`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

/// Render a centered title block with border
pub fn render_title_block(title: &str, subtitle: Option<&str>, frame: &mut Frame, area: Rect) {
    let title_line = Line::from(format!(" {} ", title))
        .centered()
        .style(theme().title());

    let mut block = Block::bordered()
        .title(title_line)
        .border_type(BorderType::Rounded)
        .border_style(theme().border())
        .style(theme().normal());

    if let Some(subtitle) = subtitle {
        block = block.title_bottom(Line::from(format!(" {} ", subtitle)).right_aligned());
    }

    frame.render_widget(block, area);
}

/// Render bottom hint text
pub fn render_hint(hint: &str, frame: &mut Frame, area: Rect) {
    let hint_widget = Paragraph::new(hint)
        .style(theme().hint())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(hint_widget, area);
}

/// Clear an area and draw a bordered popup over it
pub fn render_popup(title: &str, lines: Vec<Line<'_>>, frame: &mut Frame, area: Rect) {
    frame.render_widget(Clear, area);
    let block = Block::bordered()
        .title(Line::from(format!(" {} ", title)).style(theme().title()))
        .border_type(BorderType::Rounded)
        .border_style(theme().border())
        .style(theme().normal());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// `[a] label` line
pub fn key_line(key: Key, label: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("[{}]", key), theme().key()),
        Span::raw(" "),
        Span::styled(label.into(), theme().normal()),
    ])
}

/// `label: value` line
pub fn field_line(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), theme().hint()),
        Span::styled(value.into(), theme().normal()),
    ])
}

/// 按显示宽度截断文本，避免 UTF-8 边界问题
pub fn truncate_value(value: &str, max_width: usize) -> String {
    if value.width() <= max_width {
        return value.to_string();
    }

    let target_width = max_width.saturating_sub(3);
    let mut current_width = 0;
    let mut output = String::new();

    for ch in value.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > target_width {
            break;
        }
        output.push(ch);
        current_width += ch_width;
    }

    output.push_str("...");
    output
}
