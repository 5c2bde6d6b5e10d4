//! 应用状态

use crate::metadata::{self, ExifSummary};
use crate::session::{Outcome, Session, SessionState};
use crate::tui::event::TuiEvent;
use crate::tui::state::{InputState, Screen, StatusKind, StatusMessage};
use crate::i18n::Strings;
use std::path::{Path, PathBuf};

/// 当前图片的元数据，切换图片时重新读取
#[derive(Debug, Clone)]
pub struct ItemDetails {
    pub path: PathBuf,
    pub exif: Option<ExifSummary>,
    pub dimensions: Option<(u32, u32)>,
}

impl ItemDetails {
    fn load(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            exif: metadata::read_exif_summary(path).ok(),
            dimensions: metadata::stored_dimensions(path),
        }
    }
}

/// 应用状态（包含 UI 状态）
#[derive(Debug)]
pub struct AppState {
    /// 当前屏幕
    pub screen: Screen,
    /// 浏览会话
    pub session: Session,
    /// 自定义名称输入
    pub input: InputState,
    /// 状态栏消息
    pub status: Option<StatusMessage>,
    /// 当前图片元数据
    pub details: Option<ItemDetails>,
    /// 日志路径
    pub log_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(session: Session, log_path: Option<PathBuf>) -> Self {
        let screen = if session.state() == SessionState::Done {
            Screen::Summary
        } else {
            Screen::Review
        };
        let mut state = Self {
            screen,
            session,
            input: InputState::default(),
            status: None,
            details: None,
            log_path,
        };
        state.refresh_details();
        state
    }

    /// 当前图片变化时重新读取元数据
    pub fn refresh_details(&mut self) {
        let current = self.session.current().map(|item| item.path.as_path());
        let stale = match (&self.details, current) {
            (Some(details), Some(path)) => details.path != path,
            (None, None) => false,
            _ => true,
        };
        if stale {
            self.details = current.map(ItemDetails::load);
        }
    }

    /// 处理事件，返回 true 表示退出
    pub fn handle_event(&mut self, event: TuiEvent) -> bool {
        let exit = match self.screen {
            Screen::Review => self.handle_review(event),
            Screen::CustomName => {
                self.handle_custom_name(event);
                false
            }
            Screen::Summary => matches!(event, TuiEvent::Enter | TuiEvent::Escape),
        };
        self.refresh_details();
        exit
    }

    fn handle_review(&mut self, event: TuiEvent) -> bool {
        if event == TuiEvent::CtrlC {
            return true;
        }
        let Some(key) = event.to_key() else {
            return false;
        };

        let outcome = self.session.handle_key(key);
        if let Some(message) = StatusMessage::from_outcome(&outcome) {
            self.status = Some(message);
        }

        match outcome {
            Outcome::Quit => return true,
            Outcome::CustomNameRequested => {
                let current = self
                    .session
                    .current()
                    .and_then(|item| item.custom_name.clone())
                    .unwrap_or_default();
                self.input = InputState::with_value(&current);
                self.screen = Screen::CustomName;
            }
            Outcome::Navigated | Outcome::Rotated(_) => self.status = None,
            _ => {}
        }

        if self.session.state() == SessionState::Done {
            self.screen = Screen::Summary;
        }
        false
    }

    fn handle_custom_name(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Enter => {
                let value = self.input.take();
                let cleared = value.trim().is_empty();
                self.status = Some(match self.session.set_custom_name(Some(value.clone())) {
                    Ok(()) if cleared => {
                        StatusMessage::new(StatusKind::Info, Strings::custom_name_cleared())
                    }
                    Ok(()) => StatusMessage::new(
                        StatusKind::Info,
                        format!("{} {}", Strings::custom_name_set(), value.trim()),
                    ),
                    Err(e) => StatusMessage::new(StatusKind::Error, e.to_string()),
                });
                self.screen = Screen::Review;
            }
            TuiEvent::Escape | TuiEvent::CtrlC => {
                self.input.clear();
                self.screen = Screen::Review;
            }
            TuiEvent::Char(c) => self.input.insert_char(c),
            TuiEvent::Backspace => self.input.delete_before_cursor(),
            TuiEvent::Delete => self.input.delete_after_cursor(),
            TuiEvent::Left => self.input.move_cursor_left(),
            TuiEvent::Right => self.input.move_cursor_right(),
            TuiEvent::Home => self.input.move_cursor_to_start(),
            TuiEvent::End => self.input.move_cursor_to_end(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CategoryEntry, Config};
    use crate::key::Key;
    use std::fs;
    use tempfile::TempDir;

    fn state(files: &[&str]) -> (TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        fs::create_dir_all(&input).unwrap();
        for name in files {
            fs::write(input.join(name), b"x").unwrap();
        }
        let config = Config {
            input_dir: input,
            output_dir: dir.path().join("out"),
            journal: false,
            categories: vec![CategoryEntry::new(Key::Char('a'), "animals")],
            ..Config::default()
        };
        let session = Session::new(config).unwrap();
        (dir, AppState::new(session, None))
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            state.handle_event(TuiEvent::Char(c));
        }
    }

    #[test]
    fn test_commit_moves_to_summary() {
        let (dir, mut state) = state(&["one.jpg"]);
        assert_eq!(state.screen, Screen::Review);
        assert!(state.details.is_some());

        assert!(!state.handle_event(TuiEvent::Char('a')));

        assert_eq!(state.screen, Screen::Summary);
        assert!(state.details.is_none());
        assert_eq!(state.status.as_ref().map(|s| s.kind), Some(StatusKind::Success));
        assert!(dir.path().join("out/animals/one.jpg").exists());
        assert!(state.handle_event(TuiEvent::Enter));
    }

    #[test]
    fn test_unbound_key_shows_warning() {
        let (_dir, mut state) = state(&["one.jpg"]);
        state.handle_event(TuiEvent::Char('z'));
        assert_eq!(state.screen, Screen::Review);
        assert_eq!(state.status.as_ref().map(|s| s.kind), Some(StatusKind::Warning));
    }

    #[test]
    fn test_custom_name_flow() {
        let (dir, mut state) = state(&["one.jpg"]);

        state.handle_event(TuiEvent::Enter);
        assert_eq!(state.screen, Screen::CustomName);
        // Category keys are plain text while typing
        type_text(&mut state, "aq");
        state.handle_event(TuiEvent::Backspace);
        state.handle_event(TuiEvent::Enter);

        assert_eq!(state.screen, Screen::Review);
        assert_eq!(state.session.current().unwrap().custom_name.as_deref(), Some("a"));

        state.handle_event(TuiEvent::Char('a'));
        assert!(dir.path().join("out/animals/a.jpg").exists());
    }

    #[test]
    fn test_invalid_custom_name_reports_error() {
        let (_dir, mut state) = state(&["one.jpg"]);
        state.handle_event(TuiEvent::Enter);
        type_text(&mut state, "..");
        state.handle_event(TuiEvent::Enter);

        assert_eq!(state.status.as_ref().map(|s| s.kind), Some(StatusKind::Error));
        assert!(state.session.current().unwrap().custom_name.is_none());
    }

    #[test]
    fn test_quit_and_ctrl_c() {
        let (_dir, mut state) = state(&["one.jpg"]);
        assert!(state.handle_event(TuiEvent::CtrlC));
        assert!(state.handle_event(TuiEvent::Char('q')));
    }

    #[test]
    fn test_navigation_refreshes_details() {
        let (_dir, mut state) = state(&["one.jpg", "two.jpg"]);
        state.handle_event(TuiEvent::Char('n'));
        let details = state.details.as_ref().unwrap();
        assert!(details.path.ends_with("two.jpg"));
    }
}
