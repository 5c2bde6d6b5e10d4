//! TUI application main module
//!
//! Owns the terminal and runs the review loop: render, wait for a key,
//! hand it to the session, repeat until the user quits.

use crate::session::{Session, SessionStats};
use crate::tui::event::{EventPoll, TuiEvent};
use crate::tui::state::AppState;
use crate::tui::ui::render;
use crate::viewer::Viewer;
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use tracing::{info, warn};

/// TUI application
#[derive(Debug)]
pub struct TuiApp {
    /// Terminal
    terminal: DefaultTerminal,
    /// Event poller
    event_poll: EventPoll,
    /// Application state
    state: AppState,
    /// External viewer for the current image
    viewer: Option<Viewer>,
    /// Image last handed to the viewer
    shown: Option<PathBuf>,
}

impl TuiApp {
    /// Create new TUI application around a session
    pub fn new(session: Session, log_path: Option<PathBuf>) -> Self {
        let viewer = session.config().viewer.as_deref().and_then(Viewer::new);
        let state = AppState::new(session, log_path);
        let terminal = ratatui::init();

        Self {
            terminal,
            event_poll: EventPoll::default(),
            state,
            viewer,
            shown: None,
        }
    }

    /// Run until the user quits; returns the final statistics
    pub fn run(mut self) -> std::io::Result<SessionStats> {
        let result = self.event_loop();
        ratatui::restore();
        if let Some(viewer) = self.viewer.as_mut() {
            viewer.close();
        }
        result?;
        Ok(self.state.session.stats().clone())
    }

    fn event_loop(&mut self) -> std::io::Result<()> {
        self.sync_viewer();
        render(&mut self.terminal, &self.state)?;

        loop {
            match self.event_poll.next() {
                TuiEvent::None => continue,
                TuiEvent::Resize(_, _) => {}
                event => {
                    if self.state.handle_event(event) {
                        info!("User quit the session");
                        break;
                    }
                    self.sync_viewer();
                }
            }
            render(&mut self.terminal, &self.state)?;
        }

        Ok(())
    }

    /// Show the current image in the external viewer when it changed
    fn sync_viewer(&mut self) {
        let Some(viewer) = self.viewer.as_mut() else {
            return;
        };
        let current = self.state.session.current().map(|item| item.path.clone());
        if current == self.shown {
            return;
        }
        match &current {
            Some(path) => {
                if let Err(e) = viewer.show(path) {
                    warn!(program = viewer.program(), error = %e, "Failed to start viewer");
                }
            }
            None => viewer.close(),
        }
        self.shown = current;
    }
}
