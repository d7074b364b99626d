use crossterm::event::KeyCode;
use rand::Rng;

use crate::config::Settings;
use crate::game::Game;
use crate::maze::Dir;
use crate::menu::{buttons, find_shortcut, Button, Screen, Selection};
use crate::save::Progress;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub screen: Screen,
    pub selection: Selection,
    pub game: Option<Game>,
    pub progress: Progress,
    pub settings: Settings,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let progress = Progress::load(&settings.save_path);
        Self::with_progress(settings, progress)
    }

    pub fn with_progress(settings: Settings, progress: Progress) -> Self {
        Self {
            screen: Screen::Menu,
            selection: Selection::default(),
            game: None,
            progress,
            settings,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, rng: &mut impl Rng) -> Flow {
        if code == KeyCode::Char('q') {
            return Flow::Quit;
        }
        match self.screen {
            Screen::Playing => self.handle_play_key(code, rng),
            Screen::Menu | Screen::Upgrades => self.handle_menu_key(code, rng),
        }
        Flow::Continue
    }

    /// Per-frame update while playing, independent of input.
    pub fn tick(&mut self, rng: &mut impl Rng) {
        let (Screen::Playing, Some(game)) = (self.screen, self.game.as_mut()) else {
            return;
        };
        if game.coin_visible(self.progress.visibility()) {
            game.advance_pulse();
        }
        // A fresh coin can land on the start cell, so overlap is checked every frame.
        if game.collect_coin(rng, &mut self.progress) {
            self.progress.persist(&self.settings.save_path);
        }
    }

    fn handle_play_key(&mut self, code: KeyCode, rng: &mut impl Rng) {
        let dir = match code {
            KeyCode::Up | KeyCode::Char('k') => Dir::Up,
            KeyCode::Down | KeyCode::Char('j') => Dir::Down,
            KeyCode::Left | KeyCode::Char('h') => Dir::Left,
            KeyCode::Right | KeyCode::Char('l') => Dir::Right,
            KeyCode::Esc => {
                self.switch(Screen::Menu);
                return;
            }
            _ => return,
        };
        let Some(game) = self.game.as_mut() else {
            return;
        };
        game.try_move(dir);
        if game.collect_coin(rng, &mut self.progress) {
            self.progress.persist(&self.settings.save_path);
        }
    }

    fn handle_menu_key(&mut self, code: KeyCode, rng: &mut impl Rng) {
        let list = buttons(self.screen);
        let pressed = match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selection.up(list.len());
                None
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                self.selection.down(list.len());
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.selection.current(list),
            KeyCode::Esc if self.screen == Screen::Upgrades => Some(Button::Back),
            KeyCode::Char(c) => find_shortcut(list, c),
            _ => None,
        };
        if let Some(button) = pressed {
            self.press(button, rng);
        }
    }

    pub fn press(&mut self, button: Button, rng: &mut impl Rng) {
        match button {
            Button::Play => {
                self.game = Some(Game::new(
                    rng,
                    self.settings.grid_w,
                    self.settings.grid_h,
                    self.progress.maze_difficulty,
                ));
                self.switch(Screen::Playing);
            }
            Button::Upgrades => self.switch(Screen::Upgrades),
            Button::Buy(upgrade) => {
                self.progress.purchase(upgrade);
                self.progress.persist(&self.settings.save_path);
            }
            Button::Back => self.switch(Screen::Menu),
        }
    }

    fn switch(&mut self, screen: Screen) {
        log::debug!("Screen {:?} -> {:?}", self.screen, screen);
        self.screen = screen;
        self.selection.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{Pos, Tile};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::fs;

    fn app(name: &str, progress: Progress) -> App {
        let settings = Settings {
            save_path: std::env::temp_dir().join(format!(
                "maze_runner_app_{}_{}.json",
                name,
                std::process::id()
            )),
            ..Settings::default()
        };
        let _ = fs::remove_file(&settings.save_path);
        App::with_progress(settings, progress)
    }

    #[test]
    fn play_starts_fresh_level() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut app = app("play", Progress::default());
        assert_eq!(app.handle_key(KeyCode::Enter, &mut rng), Flow::Continue);
        assert_eq!(app.screen, Screen::Playing);
        let game = app.game.as_ref().unwrap();
        assert_eq!(game.player, Pos::new(1, 1));
        assert_eq!((game.maze.width(), game.maze.height()), (20, 15));
    }

    #[test]
    fn quit_from_any_screen() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut app = app("quit", Progress::default());
        assert_eq!(app.handle_key(KeyCode::Char('q'), &mut rng), Flow::Quit);
        app.handle_key(KeyCode::Char('p'), &mut rng);
        assert_eq!(app.handle_key(KeyCode::Char('q'), &mut rng), Flow::Quit);
    }

    #[test]
    fn escape_returns_to_menu() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut app = app("escape", Progress::default());
        app.handle_key(KeyCode::Char('p'), &mut rng);
        app.handle_key(KeyCode::Esc, &mut rng);
        assert_eq!(app.screen, Screen::Menu);
    }

    #[test]
    fn arrow_moves_player_through_open_cells() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut app = app("arrows", Progress::default());
        app.handle_key(KeyCode::Char('p'), &mut rng);
        // Park the coin out of the way so the move cannot end the level.
        let game = app.game.as_mut().unwrap();
        game.coin = Pos::new(game.maze.width() - 1, game.maze.height() - 2);
        app.handle_key(KeyCode::Left, &mut rng);
        assert_eq!(app.game.as_ref().unwrap().player, Pos::new(0, 1));
        app.handle_key(KeyCode::Up, &mut rng);
        assert_eq!(app.game.as_ref().unwrap().player, Pos::new(0, 1));
    }

    #[test]
    fn walking_onto_coin_banks_and_saves() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut app = app("collect", Progress::default());
        app.handle_key(KeyCode::Char('p'), &mut rng);
        let game = app.game.as_mut().unwrap();
        game.coin = Pos::new(0, 1);
        app.handle_key(KeyCode::Char('h'), &mut rng);

        let game = app.game.as_ref().unwrap();
        assert_eq!(app.progress.coins, 1);
        assert_eq!(game.level, 2);
        assert_eq!(game.player, Pos::new(1, 1));
        assert_eq!(game.maze.tile(game.coin), Tile::Path);
        assert_eq!(Progress::load(&app.settings.save_path).coins, 1);
        fs::remove_file(&app.settings.save_path).unwrap();
    }

    #[test]
    fn buying_upgrades_persists() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut app = app(
            "upgrade",
            Progress {
                coins: 30,
                ..Progress::default()
            },
        );
        app.handle_key(KeyCode::Char('u'), &mut rng);
        assert_eq!(app.screen, Screen::Upgrades);
        app.handle_key(KeyCode::Enter, &mut rng);
        assert_eq!(app.progress.visibility_radius, 4);
        app.handle_key(KeyCode::Char('d'), &mut rng);
        assert_eq!(app.progress.coins, 5);
        assert!((app.progress.maze_difficulty - 0.9).abs() < 1e-9);

        let saved = Progress::load(&app.settings.save_path);
        assert_eq!(saved, app.progress);

        app.handle_key(KeyCode::Char('v'), &mut rng);
        assert_eq!(app.progress.visibility_radius, 4);
        assert_eq!(app.progress.coins, 5);

        app.handle_key(KeyCode::Esc, &mut rng);
        assert_eq!(app.screen, Screen::Menu);
        fs::remove_file(&app.settings.save_path).unwrap();
    }

    #[test]
    fn pulse_only_runs_while_playing() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut app = app("pulse", Progress::default());
        app.handle_key(KeyCode::Char('p'), &mut rng);
        app.game.as_mut().unwrap().coin = Pos::new(0, 1);
        app.tick(&mut rng);
        app.tick(&mut rng);
        assert!((app.game.as_ref().unwrap().pulse - 0.2).abs() < 1e-9);
        app.handle_key(KeyCode::Esc, &mut rng);
        app.tick(&mut rng);
        assert!((app.game.as_ref().unwrap().pulse - 0.2).abs() < 1e-9);
    }

    #[test]
    fn pulse_waits_while_coin_is_hidden() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut app = app("pulse_hidden", Progress::default());
        app.handle_key(KeyCode::Char('p'), &mut rng);
        let game = app.game.as_mut().unwrap();
        game.coin = Pos::new(game.maze.width() - 1, game.maze.height() - 2);
        app.tick(&mut rng);
        assert_eq!(app.game.as_ref().unwrap().pulse, 0.0);
    }

    #[test]
    fn coin_on_start_cell_is_collected_without_input() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut app = app(
            "start_coin",
            Progress {
                maze_difficulty: 10.0,
                ..Progress::default()
            },
        );
        app.handle_key(KeyCode::Char('p'), &mut rng);
        app.game.as_mut().unwrap().coin = Pos::new(1, 1);
        app.tick(&mut rng);

        let game = app.game.as_ref().unwrap();
        assert_eq!(game.level, 2);
        assert_eq!(app.progress.coins, 1);
        assert_eq!(Progress::load(&app.settings.save_path).coins, 1);
        fs::remove_file(&app.settings.save_path).unwrap();
    }

    #[test]
    fn menu_keys_do_not_touch_upgrades() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut app = app("menu", Progress::default());
        app.handle_key(KeyCode::Char('v'), &mut rng);
        assert_eq!(app.screen, Screen::Menu);
        assert_eq!(app.progress, Progress::default());
    }
}
