//! 摘要屏幕渲染

use crate::i18n::Strings;
use crate::tui::components::{render_hint, render_title_block, three_panel_layout};
use crate::tui::state::AppState;
use crate::tui::theme::theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Wrap},
};

fn stat_line(label: &str, value: usize, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::from(label.to_string()),
        Span::raw(": "),
        Span::from(value.to_string()).style(style),
    ])
}

/// 渲染摘要屏幕
pub fn draw(frame: &mut Frame, area: Rect, state: &AppState) {
    let [header, body, footer] = three_panel_layout(area);

    render_title_block(Strings::session_complete(), None, frame, header);

    let session = &state.session;
    let stats = session.stats();

    let mut lines = Vec::new();
    if session.is_empty() {
        lines.push(Line::from(Strings::queue_empty()).style(theme().warning()));
    } else if session.pending_count() == 0 {
        lines.push(Line::from(Strings::all_items_reviewed()).style(theme().success()));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Strings::statistics()).style(theme().title()));
    lines.push(stat_line(Strings::stat_committed(), stats.total_committed(), theme().success()));
    for (category, count) in &stats.committed {
        lines.push(Line::from(format!("    {}: {}", category, count)).style(theme().hint()));
    }
    lines.push(stat_line(Strings::stat_remaining(), session.pending_count(), theme().warning()));
    lines.push(stat_line(Strings::stat_skipped(), stats.skipped, theme().warning()));
    lines.push(stat_line(Strings::stat_failed(), stats.failures, theme().error()));
    lines.push(stat_line(Strings::stat_unresolved(), stats.unresolved, theme().hint()));

    if session.config().dry_run {
        lines.push(Line::from(""));
        lines.push(
            Line::from(Strings::dry_run_notice()).style(theme().warning().add_modifier(Modifier::BOLD)),
        );
    }

    if let Some(ref log_path) = state.log_path {
        lines.push(Line::from(""));
        lines.push(
            Line::from(vec![
                Span::from(Strings::log_saved_to()),
                Span::raw(" "),
                Span::from(log_path.display().to_string()).style(theme().accent()),
            ])
            .style(theme().hint()),
        );
    }

    let stats_para = Paragraph::new(lines)
        .block(Block::bordered().border_type(BorderType::Rounded))
        .style(theme().normal())
        .wrap(Wrap { trim: true });
    frame.render_widget(stats_para, body);

    render_hint(Strings::summary_hint(), frame, footer);
}
