use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::SetupError;
use crate::event::HeldDirections;
use crate::game::{Banner, GameEvent, GameManager, GameSettings, RoundState};
use crate::scores::{normalize_name, HighScores, SortOrder, MAX_NAME_LEN};

pub const BLANK_NAME_ERROR: &str = "Name cannot be blank";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Start,
    Playing,
    HighScores,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuItem {
    Start,
    HighScores,
    Quit,
}

impl MenuItem {
    pub fn all() -> &'static [MenuItem] {
        &[MenuItem::Start, MenuItem::HighScores, MenuItem::Quit]
    }

    pub fn label(&self) -> &str {
        match self {
            MenuItem::Start => "Start",
            MenuItem::HighScores => "High Scores",
            MenuItem::Quit => "Quit",
        }
    }
}

fn is_direction_key(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Left
            | KeyCode::Right
            | KeyCode::Char('a')
            | KeyCode::Char('A')
            | KeyCode::Char('d')
            | KeyCode::Char('D')
    )
}

pub struct App {
    pub should_quit: bool,
    pub screen: Screen,
    pub menu_index: usize,
    pub game: GameManager,
    pub high_scores: HighScores,
    pub score_view: SortOrder,
    pub held: HeldDirections,
    pub paused: bool,
    pub banner: Option<Banner>,
    // Name entry state
    pub entering_name: bool,
    pub name_buffer: String,
    pub name_error: Option<&'static str>,
    pub name_score: u32,
    pub name_level: u32,
    score_checked: bool,
}

impl App {
    /// `releases_reported` says whether the terminal delivers key release
    /// events; without them held directions lapse on their own.
    pub fn new(config: &Config, releases_reported: bool) -> Result<Self, SetupError> {
        config.validate()?;
        let game = GameManager::new(GameSettings::default(), config.seed)?;
        let high_scores = HighScores::load(config.scores_path());
        info!(
            path = %high_scores.path().display(),
            entries = high_scores.entries().len(),
            "high scores loaded"
        );

        Ok(Self {
            should_quit: false,
            screen: Screen::Start,
            menu_index: 0,
            game,
            high_scores,
            score_view: SortOrder::default(),
            held: HeldDirections::new(releases_reported),
            paused: false,
            banner: None,
            entering_name: false,
            name_buffer: String::new(),
            name_error: None,
            name_score: 0,
            name_level: 0,
            score_checked: false,
        })
    }

    pub fn selected_menu_item(&self) -> MenuItem {
        MenuItem::all()[self.menu_index % MenuItem::all().len()]
    }

    pub fn on_tick(&mut self) {
        // Freeze the round while paused or entering a name
        if self.screen != Screen::Playing || self.paused || self.entering_name {
            return;
        }

        let input = self.held.sample();
        self.game.tick(input);
        for event in self.game.drain_events() {
            if let GameEvent::Banner(banner) = event {
                self.banner = Some(banner);
            }
        }
        if self.game.state() == RoundState::InRound
            && matches!(self.banner, Some(Banner::LevelUp(_)))
        {
            self.banner = None;
        }
        self.check_submit_score();
    }

    fn check_submit_score(&mut self) {
        if !self.game.is_round_over() || self.score_checked {
            return;
        }
        self.score_checked = true;
        let score = self.game.score();
        if self.high_scores.qualifies(score) {
            // Prompt for name entry
            self.entering_name = true;
            self.name_buffer.clear();
            self.name_error = None;
            self.name_score = score;
            self.name_level = self.game.level();
            debug!(score, "score qualifies for the table");
        }
    }

    fn start_round(&mut self) {
        self.game.restart();
        self.game.drain_events();
        self.screen = Screen::Playing;
        self.paused = false;
        self.banner = None;
        self.score_checked = false;
        self.held.clear();
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            self.on_release(key);
            return;
        }

        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // If entering a name, intercept all input
        if self.entering_name {
            self.handle_name_input(key);
            return;
        }

        match self.screen {
            Screen::Start => self.handle_menu_input(key),
            Screen::HighScores => self.handle_scores_input(key),
            Screen::Playing => self.handle_game_input(key),
        }
    }

    fn on_release(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => self.held.release_left(),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => self.held.release_right(),
            _ => {}
        }
    }

    fn handle_menu_input(&mut self, key: KeyEvent) {
        let count = MenuItem::all().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.menu_index = (self.menu_index + count - 1) % count;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.menu_index = (self.menu_index + 1) % count;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('h') | KeyCode::Char('H') => self.screen = Screen::HighScores,
            KeyCode::Enter | KeyCode::Char(' ') => match self.selected_menu_item() {
                MenuItem::Start => self.start_round(),
                MenuItem::HighScores => self.screen = Screen::HighScores,
                MenuItem::Quit => self.should_quit = true,
            },
            _ => {}
        }
    }

    fn handle_scores_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.score_view = self.score_view.next(),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.screen = Screen::Start;
            }
            _ => {}
        }
    }

    fn handle_game_input(&mut self, key: KeyEvent) {
        // Only held directions honour auto-repeat; every command is one press
        if key.kind == KeyEventKind::Repeat && !is_direction_key(key.code) {
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.screen = Screen::Start;
                self.paused = false;
                self.held.clear();
                return;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.start_round();
                return;
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                if !self.game.is_round_over() {
                    self.paused = !self.paused;
                    self.held.clear();
                }
                return;
            }
            _ => {}
        }

        if self.game.is_round_over() {
            if key.code == KeyCode::Enter {
                self.start_round();
            }
            return;
        }
        if self.paused {
            return;
        }

        match key.code {
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => self.held.press_left(),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => self.held.press_right(),
            KeyCode::Char(' ') => self.game.fire_missile(),
            KeyCode::Char('n') | KeyCode::Char('N') => self.game.fire_nuke(),
            _ => {}
        }
    }

    fn handle_name_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => match normalize_name(&self.name_buffer) {
                Some(name) => {
                    self.high_scores
                        .add_new_score(&name, self.name_score, self.name_level);
                    self.entering_name = false;
                    self.name_buffer.clear();
                    self.name_error = None;
                }
                None => self.name_error = Some(BLANK_NAME_ERROR),
            },
            KeyCode::Backspace => {
                self.name_buffer.pop();
            }
            KeyCode::Esc => {
                // Abandon without recording anything
                debug!(score = self.name_score, "high-score entry abandoned");
                self.entering_name = false;
                self.name_buffer.clear();
                self.name_error = None;
            }
            KeyCode::Char(c) => {
                if self.name_buffer.chars().count() < MAX_NAME_LEN
                    && (c.is_ascii_graphic() || c == ' ')
                {
                    self.name_buffer.push(c.to_ascii_uppercase());
                    self.name_error = None;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::MissileKind;

    fn app(dir: &tempfile::TempDir) -> App {
        let config = Config {
            scores: Some(dir.path().join("scores.jsonl")),
            seed: Some(7),
            ..Config::default()
        };
        App::new(&config, true).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn repeat(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new_with_kind(
            code,
            KeyModifiers::NONE,
            KeyEventKind::Repeat,
        ));
    }

    fn release(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new_with_kind(
            code,
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ));
    }

    fn prompt(app: &mut App, score: u32) {
        app.screen = Screen::Playing;
        app.entering_name = true;
        app.name_score = score;
        app.name_level = 2;
    }

    #[test]
    fn invalid_tick_rate_refuses_to_start() {
        let config = Config {
            tick_ms: 0,
            ..Config::default()
        };
        assert!(matches!(
            App::new(&config, true),
            Err(SetupError::InvalidTickRate { tick_ms: 0 })
        ));
    }

    #[test]
    fn menu_wraps_and_starts_a_round() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected_menu_item(), MenuItem::Quit);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_menu_item(), MenuItem::Start);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Playing);
        assert_eq!(app.game.level(), 1);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Start);
    }

    #[test]
    fn quit_from_menu() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.menu_index = 2;
        press(&mut app, KeyCode::Enter);
        assert!(app.should_quit);
    }

    #[test]
    fn held_direction_moves_until_released() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        press(&mut app, KeyCode::Enter);
        let start = app.game.player().unwrap().body.x();

        press(&mut app, KeyCode::Left);
        app.on_tick();
        app.on_tick();
        let moved = app.game.player().unwrap().body.x();
        assert!(moved < start);

        release(&mut app, KeyCode::Left);
        app.on_tick();
        assert_eq!(app.game.player().unwrap().body.x(), moved);
    }

    #[test]
    fn held_fire_key_shoots_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char(' '));
        for _ in 0..12 {
            app.on_tick();
            repeat(&mut app, KeyCode::Char(' '));
        }
        let fired = app
            .game
            .missiles()
            .iter()
            .filter(|m| m.kind == MissileKind::Player)
            .count();
        assert_eq!(fired, 1);
    }

    #[test]
    fn repeated_pause_key_does_not_toggle_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('p'));
        repeat(&mut app, KeyCode::Char('p'));
        assert!(app.paused);
    }

    #[test]
    fn repeated_direction_keeps_moving() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        press(&mut app, KeyCode::Enter);
        let start = app.game.player().unwrap().body.x();
        press(&mut app, KeyCode::Right);
        app.on_tick();
        repeat(&mut app, KeyCode::Right);
        app.on_tick();
        assert!(app.game.player().unwrap().body.x() > start);
    }

    #[test]
    fn pause_freezes_the_round() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('p'));
        assert!(app.paused);

        let before: Vec<f32> = app.game.enemy_ships().iter().map(|s| s.body.x()).collect();
        for _ in 0..10 {
            app.on_tick();
        }
        let after: Vec<f32> = app.game.enemy_ships().iter().map(|s| s.body.x()).collect();
        assert_eq!(before, after);

        press(&mut app, KeyCode::Char('p'));
        assert!(!app.paused);
    }

    #[test]
    fn tab_cycles_score_views() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.screen, Screen::HighScores);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.score_view, SortOrder::NameScoreLevel);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Start);
    }

    #[test]
    fn blank_name_is_rejected_with_a_message() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        prompt(&mut app, 120);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);
        assert!(app.entering_name);
        assert_eq!(app.name_error, Some(BLANK_NAME_ERROR));
        assert!(app.high_scores.entries().is_empty());
    }

    #[test]
    fn submitted_name_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        prompt(&mut app, 120);
        for c in "ace".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);

        assert!(!app.entering_name);
        assert_eq!(app.screen, Screen::Playing);
        let reloaded = HighScores::load(dir.path().join("scores.jsonl"));
        assert_eq!(reloaded.entries().len(), 1);
        assert_eq!(reloaded.entries()[0].name, "ACE");
        assert_eq!(reloaded.entries()[0].score, 120);
        assert_eq!(reloaded.entries()[0].level, 2);
    }

    #[test]
    fn escape_abandons_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        prompt(&mut app, 120);
        press(&mut app, KeyCode::Char('z'));
        press(&mut app, KeyCode::Esc);
        assert!(!app.entering_name);
        assert!(app.high_scores.entries().is_empty());
        assert!(!dir.path().join("scores.jsonl").exists());
    }

    #[test]
    fn name_length_is_capped() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        prompt(&mut app, 5);
        for _ in 0..MAX_NAME_LEN + 5 {
            press(&mut app, KeyCode::Char('x'));
        }
        assert_eq!(app.name_buffer.len(), MAX_NAME_LEN);
    }
}
