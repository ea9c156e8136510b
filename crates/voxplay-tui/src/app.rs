use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crossterm::event::{KeyCode, KeyEvent};
use voxplay_core::tui_types::PlayerState;
use voxplay_core::{parse_timestamp, Command};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Player,
    Logs,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppAction {
    None,
    Quit,
    Command(Command),
}

pub struct App {
    pub tab: Tab,
    pub state: PlayerState,
    pub seek_step: u32,
    /// Text being entered in jump mode; `None` outside jump mode.
    pub jump_input: Option<String>,
    pub should_quit: bool,
    pub logs: Arc<Mutex<VecDeque<String>>>,
    pub log_scroll: usize,
    pub log_auto_scroll: bool,
}

impl App {
    pub fn new(logs: Arc<Mutex<VecDeque<String>>>, seek_step: u32) -> Self {
        Self {
            tab: Tab::Player,
            state: PlayerState::default(),
            seek_step,
            jump_input: None,
            should_quit: false,
            logs,
            log_scroll: 0,
            log_auto_scroll: true,
        }
    }

    pub fn update_state(&mut self, new_state: PlayerState) {
        self.state = new_state;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        if self.jump_input.is_some() {
            return self.handle_jump_key(key);
        }

        // Global keys
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return AppAction::Quit;
            }
            KeyCode::Char('1') => {
                self.tab = Tab::Player;
                return AppAction::None;
            }
            KeyCode::Char('2') => {
                self.tab = Tab::Logs;
                return AppAction::None;
            }
            _ => {}
        }

        match self.tab {
            Tab::Player => self.handle_player_key(key),
            Tab::Logs => self.handle_logs_key(key),
        }
    }

    fn handle_player_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('p') => AppAction::Command(Command::Play),
            KeyCode::Char('s') => AppAction::Command(Command::Stop),
            KeyCode::Right => AppAction::Command(Command::SeekForward(self.seek_step)),
            KeyCode::Left => AppAction::Command(Command::SeekBackward(self.seek_step)),
            KeyCode::Char('j') => {
                self.jump_input = Some(String::new());
                AppAction::None
            }
            _ => AppAction::None,
        }
    }

    /// Jump mode: collect a `M:SS` timestamp. Enter commits (invalid
    /// input is dropped, matching the voice path's silent-ignore rule),
    /// Esc cancels.
    fn handle_jump_key(&mut self, key: KeyEvent) -> AppAction {
        let buffer = self.jump_input.as_mut().expect("jump mode");
        match key.code {
            KeyCode::Esc => {
                self.jump_input = None;
                AppAction::None
            }
            KeyCode::Enter => {
                let parsed = parse_timestamp(buffer);
                self.jump_input = None;
                match parsed {
                    Some(seconds) => AppAction::Command(Command::SeekTo(seconds)),
                    None => AppAction::None,
                }
            }
            KeyCode::Backspace => {
                buffer.pop();
                AppAction::None
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == ':' => {
                buffer.push(c);
                AppAction::None
            }
            _ => AppAction::None,
        }
    }

    fn handle_logs_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Up => {
                self.log_scroll = self.log_scroll.saturating_add(1);
                self.log_auto_scroll = false;
                AppAction::None
            }
            KeyCode::Down => {
                self.log_scroll = self.log_scroll.saturating_sub(1);
                AppAction::None
            }
            KeyCode::Char('G') => {
                self.log_scroll = 0;
                self.log_auto_scroll = true;
                AppAction::None
            }
            _ => AppAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn make_app() -> App {
        App::new(Arc::new(Mutex::new(VecDeque::new())), 10)
    }

    #[test]
    fn test_app_initial_state() {
        let app = make_app();
        assert_eq!(app.tab, Tab::Player);
        assert!(!app.should_quit);
        assert!(app.jump_input.is_none());
        assert_eq!(app.log_scroll, 0);
        assert!(app.log_auto_scroll);
    }

    #[test]
    fn test_app_tab_switching() {
        let mut app = make_app();
        app.handle_key(key(KeyCode::Char('2')));
        assert_eq!(app.tab, Tab::Logs);
        app.handle_key(key(KeyCode::Char('1')));
        assert_eq!(app.tab, Tab::Player);
    }

    #[test]
    fn test_app_quit() {
        let mut app = make_app();
        let action = app.handle_key(key(KeyCode::Char('q')));
        assert_eq!(action, AppAction::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_app_play_stop_keys() {
        let mut app = make_app();
        assert_eq!(
            app.handle_key(key(KeyCode::Char('p'))),
            AppAction::Command(Command::Play),
        );
        assert_eq!(
            app.handle_key(key(KeyCode::Char('s'))),
            AppAction::Command(Command::Stop),
        );
    }

    #[test]
    fn test_app_seek_keys_use_step() {
        let mut app = App::new(Arc::new(Mutex::new(VecDeque::new())), 15);
        assert_eq!(
            app.handle_key(key(KeyCode::Right)),
            AppAction::Command(Command::SeekForward(15)),
        );
        assert_eq!(
            app.handle_key(key(KeyCode::Left)),
            AppAction::Command(Command::SeekBackward(15)),
        );
    }

    #[test]
    fn test_app_jump_mode_commits_timestamp() {
        let mut app = make_app();
        app.handle_key(key(KeyCode::Char('j')));
        assert!(app.jump_input.is_some());

        for c in "2:05".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        let action = app.handle_key(key(KeyCode::Enter));
        assert_eq!(action, AppAction::Command(Command::SeekTo(125)));
        assert!(app.jump_input.is_none());
    }

    #[test]
    fn test_app_jump_mode_drops_invalid_input() {
        let mut app = make_app();
        app.handle_key(key(KeyCode::Char('j')));
        for c in "9:99".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        let action = app.handle_key(key(KeyCode::Enter));
        assert_eq!(action, AppAction::None);
        assert!(app.jump_input.is_none());
    }

    #[test]
    fn test_app_jump_mode_escape_cancels() {
        let mut app = make_app();
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('1')));
        let action = app.handle_key(key(KeyCode::Esc));
        assert_eq!(action, AppAction::None);
        assert!(app.jump_input.is_none());
        // '1' was consumed by the input buffer, not tab switching
        assert_eq!(app.tab, Tab::Player);
    }

    #[test]
    fn test_app_jump_mode_filters_characters() {
        let mut app = make_app();
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(key(KeyCode::Char('3')));
        app.handle_key(key(KeyCode::Char(':')));
        app.handle_key(key(KeyCode::Char('2')));
        app.handle_key(key(KeyCode::Char('0')));
        assert_eq!(app.jump_input.as_deref(), Some("3:20"));

        let action = app.handle_key(key(KeyCode::Enter));
        assert_eq!(action, AppAction::Command(Command::SeekTo(200)));
    }

    #[test]
    fn test_app_jump_mode_backspace() {
        let mut app = make_app();
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('1')));
        app.handle_key(key(KeyCode::Char('2')));
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.jump_input.as_deref(), Some("1"));
    }

    #[test]
    fn test_app_jump_mode_blocks_quit_key() {
        let mut app = make_app();
        app.handle_key(key(KeyCode::Char('j')));
        let action = app.handle_key(key(KeyCode::Char('q')));
        assert_eq!(action, AppAction::None);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_app_log_scroll() {
        let mut app = make_app();
        app.tab = Tab::Logs;

        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.log_scroll, 1);
        assert!(!app.log_auto_scroll);

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.log_scroll, 0);

        app.handle_key(key(KeyCode::Up));
        app.handle_key(key(KeyCode::Up));
        app.handle_key(key(KeyCode::Char('G')));
        assert_eq!(app.log_scroll, 0);
        assert!(app.log_auto_scroll);
    }

    #[test]
    fn test_app_state_update() {
        let mut app = make_app();
        let state = PlayerState {
            file_name: "track.mp3".into(),
            playing: true,
            ..Default::default()
        };
        app.update_state(state);
        assert_eq!(app.state.file_name, "track.mp3");
        assert!(app.state.playing);
    }
}
