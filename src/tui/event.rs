//! Event handling module
//!
//! Uses crossterm for terminal event handling.

use crate::key::Key;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Event poll interval (milliseconds)
const TICK_RATE: u64 = 50;

/// Event type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Tab key
    Tab,
    /// Backspace key
    Backspace,
    /// Delete key
    Delete,
    /// Character input
    Char(char),
    /// Ctrl+C exit
    CtrlC,
    /// Window resize
    Resize(u16, u16),
    /// Home key
    Home,
    /// End key
    End,
    /// No event (timeout)
    None,
}

impl TuiEvent {
    /// The session key for this event, if it is one
    pub fn to_key(&self) -> Option<Key> {
        match self {
            TuiEvent::Char(c) => Some(Key::Char(*c)),
            TuiEvent::Enter => Some(Key::Enter),
            TuiEvent::Escape => Some(Key::Esc),
            TuiEvent::Tab => Some(Key::Tab),
            TuiEvent::Backspace => Some(Key::Backspace),
            TuiEvent::Delete => Some(Key::Delete),
            _ => None,
        }
    }
}

impl From<Event> for TuiEvent {
    fn from(event: Event) -> Self {
        match event {
            Event::Key(key_event) => key_event.into(),
            Event::Resize(width, height) => TuiEvent::Resize(width, height),
            _ => TuiEvent::None,
        }
    }
}

impl From<KeyEvent> for TuiEvent {
    fn from(key: KeyEvent) -> Self {
        // Ignore non-press events
        if key.kind != KeyEventKind::Press {
            return TuiEvent::None;
        }

        // Handle Ctrl+C and Ctrl+D exit
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('d'))
        {
            return TuiEvent::CtrlC;
        }

        match key.code {
            KeyCode::Esc => TuiEvent::Escape,
            KeyCode::Enter => TuiEvent::Enter,
            KeyCode::Left => TuiEvent::Left,
            KeyCode::Right => TuiEvent::Right,
            KeyCode::Tab => TuiEvent::Tab,
            KeyCode::Backspace => TuiEvent::Backspace,
            KeyCode::Delete => TuiEvent::Delete,
            KeyCode::Char(c) => TuiEvent::Char(c),
            KeyCode::Home => TuiEvent::Home,
            KeyCode::End => TuiEvent::End,
            _ => TuiEvent::None,
        }
    }
}

/// Event poller
#[derive(Debug)]
pub struct EventPoll {
    tick_rate: Duration,
}

impl EventPoll {
    /// Create new event poller
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Poll next event
    pub fn next(&self) -> TuiEvent {
        if event::poll(self.tick_rate).unwrap_or(false) {
            event::read()
                .map(TuiEvent::from)
                .unwrap_or(TuiEvent::None)
        } else {
            TuiEvent::None
        }
    }
}

impl Default for EventPoll {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> TuiEvent {
        KeyEvent::new(code, modifiers).into()
    }

    #[test]
    fn test_key_event_mapping() {
        assert_eq!(press(KeyCode::Char('a'), KeyModifiers::NONE), TuiEvent::Char('a'));
        assert_eq!(press(KeyCode::Char('A'), KeyModifiers::SHIFT), TuiEvent::Char('A'));
        assert_eq!(press(KeyCode::Char('c'), KeyModifiers::CONTROL), TuiEvent::CtrlC);
        assert_eq!(press(KeyCode::Delete, KeyModifiers::NONE), TuiEvent::Delete);
        assert_eq!(press(KeyCode::F(1), KeyModifiers::NONE), TuiEvent::None);
    }

    #[test]
    fn test_release_is_ignored() {
        let mut event = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(TuiEvent::from(event), TuiEvent::None);
    }

    #[test]
    fn test_to_key() {
        assert_eq!(TuiEvent::Char(' ').to_key(), Some(Key::Char(' ')));
        assert_eq!(TuiEvent::Backspace.to_key(), Some(Key::Backspace));
        assert_eq!(TuiEvent::Escape.to_key(), Some(Key::Esc));
        assert_eq!(TuiEvent::Left.to_key(), None);
        assert_eq!(TuiEvent::Resize(1, 1).to_key(), None);
    }
}
