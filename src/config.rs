use std::path::PathBuf;

// Playfield in pixel units. The grid size follows from these.
pub const SCREEN_W: usize = 800;
pub const SCREEN_H: usize = 600;
pub const CELL_SIZE: usize = 40;

pub const GRID_W: usize = SCREEN_W / CELL_SIZE;
pub const GRID_H: usize = SCREEN_H / CELL_SIZE;

/// Terminal columns used to draw one maze cell.
pub const CELL_W: usize = 2;

pub const DEFAULT_FPS: u64 = 60;

pub const START_POS: (usize, usize) = (1, 1);

pub const DEFAULT_COINS: u32 = 0;
pub const DEFAULT_VISIBILITY_RADIUS: u32 = 3;
pub const DEFAULT_DIFFICULTY: f64 = 1.0;
pub const MIN_DIFFICULTY: f64 = 0.1;

pub const VISIBILITY_COST: u32 = 10;
pub const DIFFICULTY_COST: u32 = 15;
pub const DIFFICULTY_STEP: f64 = 0.1;

/// Per-frame advance of the coin pulse phase.
pub const PULSE_STEP: f64 = 0.1;

pub const SAVE_FILE: &str = "save.json";
pub const LOG_FILE: &str = "maze_runner.log";

#[derive(Clone, Debug)]
pub struct Settings {
    pub grid_w: usize,
    pub grid_h: usize,
    pub fps: u64,
    pub save_path: PathBuf,
    pub log_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_w: GRID_W,
            grid_h: GRID_H,
            fps: DEFAULT_FPS,
            save_path: PathBuf::from(SAVE_FILE),
            log_path: PathBuf::from(LOG_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_matches_playfield() {
        let settings = Settings::default();
        assert_eq!((settings.grid_w, settings.grid_h), (20, 15));
    }
}
