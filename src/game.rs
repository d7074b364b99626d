use rand::Rng;

use crate::config::{CELL_SIZE, PULSE_STEP, START_POS};
use crate::maze::{step, Dir, Maze, Pos};
use crate::save::Progress;
use crate::visibility::is_visible;

const PLAYER_INSET: usize = 4;
const PLAYER_SIZE: usize = CELL_SIZE - 8;
const COIN_SIZE: usize = CELL_SIZE / 4;

/// Axis-aligned rectangle in sub-cell units, `CELL_SIZE` per grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Footprint {
    x: usize,
    y: usize,
    w: usize,
    h: usize,
}

impl Footprint {
    pub fn player(pos: Pos) -> Self {
        Self {
            x: pos.x * CELL_SIZE + PLAYER_INSET,
            y: pos.y * CELL_SIZE + PLAYER_INSET,
            w: PLAYER_SIZE,
            h: PLAYER_SIZE,
        }
    }

    /// The coin's box hangs off the cell centre.
    pub fn coin(pos: Pos) -> Self {
        Self {
            x: pos.x * CELL_SIZE + CELL_SIZE / 2,
            y: pos.y * CELL_SIZE + CELL_SIZE / 2,
            w: COIN_SIZE,
            h: COIN_SIZE,
        }
    }

    pub fn intersects(&self, other: &Footprint) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

pub fn start_pos() -> Pos {
    Pos::new(START_POS.0, START_POS.1)
}

/// One run through the maze screen: the current level plus the player and coin on it.
pub struct Game {
    pub maze: Maze,
    pub player: Pos,
    pub coin: Pos,
    pub pulse: f64,
    pub level: u32,
}

impl Game {
    pub fn new(rng: &mut impl Rng, width: usize, height: usize, difficulty: f64) -> Self {
        let maze = Maze::generate(rng, width, height, difficulty);
        let coin = maze.random_open_cell(rng);
        Self {
            maze,
            player: start_pos(),
            coin,
            pulse: 0.0,
            level: 1,
        }
    }

    pub fn try_move(&mut self, dir: Dir) -> bool {
        if self.maze.can_move(self.player, dir) {
            self.player = step(self.player, dir);
            true
        } else {
            false
        }
    }

    pub fn touching_coin(&self) -> bool {
        Footprint::player(self.player).intersects(&Footprint::coin(self.coin))
    }

    pub fn coin_visible(&self, radius: f64) -> bool {
        is_visible(self.coin, self.player, radius)
    }

    pub fn advance_pulse(&mut self) {
        self.pulse += PULSE_STEP;
    }

    /// The caller persists `progress`.
    pub fn collect_coin(&mut self, rng: &mut impl Rng, progress: &mut Progress) -> bool {
        if !self.touching_coin() {
            return false;
        }
        progress.add_coin();
        self.next_level(rng, progress.maze_difficulty);
        log::info!(
            "Coin collected, {} banked, entering level {}",
            progress.coins,
            self.level
        );
        true
    }

    fn next_level(&mut self, rng: &mut impl Rng, difficulty: f64) {
        self.maze = Maze::generate(rng, self.maze.width(), self.maze.height(), difficulty);
        self.player = start_pos();
        self.coin = self.maze.random_open_cell(rng);
        self.level += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GRID_H, GRID_W};
    use crate::maze::Tile;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn game(seed: u64) -> (Game, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let game = Game::new(&mut rng, GRID_W, GRID_H, 1.0);
        (game, rng)
    }

    #[test]
    fn footprints_meet_only_on_same_cell() {
        let player = Footprint::player(Pos::new(3, 4));
        assert!(player.intersects(&Footprint::coin(Pos::new(3, 4))));
        for (x, y) in [(2, 4), (4, 4), (3, 3), (3, 5), (4, 5), (2, 3)] {
            assert!(!player.intersects(&Footprint::coin(Pos::new(x, y))));
        }
    }

    #[test]
    fn moves_respect_walls() {
        for seed in 0..30 {
            let (mut game, _) = game(seed);
            assert_eq!(game.player, Pos::new(1, 1));
            for dir in [Dir::Up, Dir::Down, Dir::Left, Dir::Right] {
                let before = game.player;
                let (dx, dy) = dir.delta();
                let target = game.maze.offset(before, dx, dy);
                let moved = game.try_move(dir);
                match target {
                    Some(t) if game.maze.tile(t) == Tile::Path => {
                        assert!(moved);
                        assert_eq!(game.player, t);
                    }
                    _ => {
                        assert!(!moved);
                        assert_eq!(game.player, before);
                    }
                }
                game.player = before;
            }
        }
    }

    #[test]
    fn top_wall_blocks_start() {
        // Row 0 is never carved, so stepping up from the start always fails.
        let (mut game, _) = game(8);
        assert!(!game.try_move(Dir::Up));
        assert_eq!(game.player, Pos::new(1, 1));
    }

    #[test]
    fn entrance_is_walkable_but_edge_is_not() {
        let (mut game, _) = game(4);
        assert!(game.try_move(Dir::Left));
        assert_eq!(game.player, Pos::new(0, 1));
        assert!(!game.try_move(Dir::Left));
        assert_eq!(game.player, Pos::new(0, 1));
    }

    #[test]
    fn coin_lands_on_path() {
        let (game, _) = game(12);
        assert_eq!(game.maze.tile(game.coin), Tile::Path);
    }

    #[test]
    fn collecting_advances_level() {
        let (mut game, mut rng) = game(17);
        let mut progress = Progress::default();
        game.coin = Pos::new(1, 1);
        let old_maze = game.maze.clone();

        assert!(game.collect_coin(&mut rng, &mut progress));
        assert_eq!(progress.coins, 1);
        assert_eq!(game.level, 2);
        assert_eq!(game.player, Pos::new(1, 1));
        assert_eq!(game.maze.tile(game.coin), Tile::Path);
        assert_ne!(game.maze, old_maze);
    }

    #[test]
    fn no_collection_elsewhere() {
        let (mut game, mut rng) = game(2);
        let mut progress = Progress::default();
        game.coin = Pos::new(GRID_W - 1, GRID_H - 2);
        assert!(!game.collect_coin(&mut rng, &mut progress));
        assert_eq!(progress.coins, 0);
        assert_eq!(game.level, 1);
    }

    #[test]
    fn coin_visibility_follows_radius() {
        let (mut game, _) = game(6);
        game.coin = Pos::new(4, 1);
        assert!(game.coin_visible(3.0));
        assert!(!game.coin_visible(2.0));
    }
}
