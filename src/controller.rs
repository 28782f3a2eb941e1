use std::time::Duration;
use tracing::trace;

use crate::domain::{LeadsConfig, LeadsError, Message};
use crate::model::Model;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyModifiers};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &LeadsConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, LeadsError> {
        if event::poll(Duration::from_millis(self.event_poll_time))? {
            return Ok(self.map_event(model.raw_keyevents(), event::read()?));
        }
        Ok(None)
    }

    fn map_event(&self, raw: bool, ev: Event) -> Option<Message> {
        match ev {
            Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                if raw {
                    Some(Message::RawKey(key))
                } else {
                    self.handle_key(key)
                }
            }
            Event::Resize(width, height) => Some(Message::Resize(width, height)),
            _ => None,
        }
    }

    fn handle_key(&self, key: event::KeyEvent) -> Option<Message> {
        let message = match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Message::Quit),
            (KeyCode::Char('q'), _) => Some(Message::Quit),
            (KeyCode::Char('?'), _) => Some(Message::Help),
            (KeyCode::Esc, _) => Some(Message::Exit),
            (KeyCode::Enter, _) => Some(Message::Enter),
            (KeyCode::Tab, _) => Some(Message::NextPage),
            (KeyCode::BackTab, _) => Some(Message::PrevPage),
            (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(Message::MoveDown),
            (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(Message::MoveUp),
            (KeyCode::Char('h'), _) | (KeyCode::Left, _) => Some(Message::MoveLeft),
            (KeyCode::Char('l'), _) | (KeyCode::Right, _) => Some(Message::MoveRight),
            (KeyCode::PageUp, _) => Some(Message::MovePageUp),
            (KeyCode::PageDown, _) => Some(Message::MovePageDown),
            (KeyCode::Char('g'), _) | (KeyCode::Home, _) => Some(Message::MoveBeginning),
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => Some(Message::MoveEnd),
            (KeyCode::Char('/'), _) => Some(Message::Search),
            (KeyCode::Char('o'), _) => Some(Message::CycleOwner),
            (KeyCode::Char('s'), _) => Some(Message::CycleOrigin),
            (KeyCode::Char('S'), _) => Some(Message::CycleStatus),
            (KeyCode::Char('p'), _) => Some(Message::CyclePeriod),
            (KeyCode::Char(' '), _) => Some(Message::ToggleRow),
            (KeyCode::Char('a'), _) => Some(Message::ToggleAll),
            (KeyCode::Char('m'), _) => Some(Message::RowMenu),
            (KeyCode::Char('y'), _) => Some(Message::CopyEmail),
            (KeyCode::Char('Y'), _) => Some(Message::CopyPhone),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyEvent, KeyEventKind};

    fn controller() -> Controller {
        Controller::new(&LeadsConfig::default())
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn maps_navigation_keys() {
        let c = controller();
        assert_eq!(
            c.map_event(false, key(KeyCode::Char('j'), KeyModifiers::NONE)),
            Some(Message::MoveDown)
        );
        assert_eq!(
            c.map_event(false, key(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(Message::PrevPage)
        );
        assert_eq!(
            c.map_event(false, key(KeyCode::Char('S'), KeyModifiers::SHIFT)),
            Some(Message::CycleStatus)
        );
        assert_eq!(
            c.map_event(false, key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Message::Quit)
        );
        assert_eq!(c.map_event(false, key(KeyCode::F(5), KeyModifiers::NONE)), None);
    }

    #[test]
    fn raw_mode_forwards_keys() {
        let c = controller();
        let ev = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(c.map_event(true, Event::Key(ev)), Some(Message::RawKey(ev)));
    }

    #[test]
    fn resize_is_forwarded_and_releases_ignored() {
        let c = controller();
        assert_eq!(
            c.map_event(false, Event::Resize(120, 40)),
            Some(Message::Resize(120, 40))
        );
        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(c.map_event(false, Event::Key(release)), None);
    }
}
