//! 浏览屏幕渲染
//!
//! 左侧显示当前图片信息，右侧显示分类按键（帮助打开时追加控制键）。

use crate::i18n::Strings;
use crate::queue::ImageItem;
use crate::session::Session;
use crate::tui::components::{
    field_line, key_line, render_hint, render_title_block, three_panel_layout, truncate_value,
};
use crate::tui::state::{AppState, ItemDetails, StatusKind};
use crate::tui::theme::theme;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block, BorderType, Paragraph},
};

/// 渲染浏览屏幕
pub fn draw(frame: &mut Frame, area: Rect, state: &AppState) {
    let [header, body, footer] = three_panel_layout(area);

    let session = &state.session;
    let position = session.cursor().map(|index| {
        Strings::item_position(index + 1, session.len(), session.pending_count())
    });
    render_title_block(Strings::app_title(), position.as_deref(), frame, header);

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(body);

    if let Some(item) = session.current() {
        draw_item(frame, left, item, state.details.as_ref());
    }
    draw_keys(frame, right, session);

    match &state.status {
        Some(status) => {
            let style = match status.kind {
                StatusKind::Info => theme().accent(),
                StatusKind::Success => theme().success(),
                StatusKind::Warning => theme().warning(),
                StatusKind::Error => theme().error(),
            };
            let text = truncate_value(&status.text, usize::from(footer.width));
            frame.render_widget(Paragraph::new(Line::from(text).style(style)).centered(), footer);
        }
        None => render_hint(Strings::review_hint(), frame, footer),
    }
}

fn draw_item(frame: &mut Frame, area: Rect, item: &ImageItem, details: Option<&ItemDetails>) {
    let width = usize::from(area.width.saturating_sub(4));
    let none = Strings::none_value();

    let mut lines = vec![
        field_line(Strings::file_label(), truncate_value(&item.file_name(), width)),
        field_line(
            Strings::raw_label(),
            item.raw_sibling
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| none.to_string()),
        ),
    ];

    if !item.sidecars.is_empty() {
        let names: Vec<String> = item
            .sidecars
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        lines.push(field_line(Strings::sidecars_label(), names.join(", ")));
    }

    lines.push(Line::from(""));

    let exif = details.and_then(|d| d.exif.as_ref());
    lines.push(field_line(
        Strings::camera_label(),
        exif.and_then(|e| e.camera.clone()).unwrap_or_else(|| none.to_string()),
    ));
    lines.push(field_line(
        Strings::taken_label(),
        exif.and_then(|e| e.taken)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| none.to_string()),
    ));
    lines.push(field_line(
        Strings::dimensions_label(),
        details
            .and_then(|d| d.dimensions)
            .map(|(w, h)| format!("{} x {}", w, h))
            .unwrap_or_else(|| none.to_string()),
    ));

    lines.push(Line::from(""));

    let rotation = item.rotation.to_string();
    let rotation_line = field_line(Strings::rotation_label(), rotation);
    lines.push(if item.rotation.is_none() {
        rotation_line
    } else {
        rotation_line.style(theme().warning())
    });
    lines.push(field_line(
        Strings::custom_name_label(),
        item.custom_name.clone().unwrap_or_else(|| none.to_string()),
    ));

    let block = Block::bordered()
        .title(Line::from(format!(" {} ", Strings::review_title())).style(theme().title()))
        .border_type(BorderType::Rounded)
        .border_style(theme().border());
    frame.render_widget(Paragraph::new(lines).block(block).style(theme().normal()), area);
}

fn draw_keys(frame: &mut Frame, area: Rect, session: &Session) {
    let mut lines: Vec<Line> = session
        .registry()
        .entries()
        .iter()
        .map(|mapping| {
            let label = if mapping.trash {
                format!("{} {}", mapping.path.label(), Strings::trash_suffix())
            } else {
                mapping.path.label()
            };
            key_line(mapping.key, label)
        })
        .collect();

    if session.show_help() {
        lines.push(Line::from(""));
        lines.push(Line::from(Strings::controls_title()).style(theme().title()));
        lines.extend(
            session
                .config()
                .keybinds
                .bindings()
                .into_iter()
                .map(|(control, key)| key_line(key, Strings::control_label(control))),
        );
    }

    let block = Block::bordered()
        .title(Line::from(format!(" {} ", Strings::categories_title())).style(theme().title()))
        .border_type(BorderType::Rounded)
        .border_style(theme().border());
    frame.render_widget(Paragraph::new(lines).block(block).style(theme().normal()), area);
}
