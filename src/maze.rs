use rand::seq::SliceRandom;
use rand::Rng;

/// Two-step carve offsets. The shuffled order of these decides the shape of the maze.
const CARVE_STEPS: [(isize, isize); 4] = [(0, 2), (2, 0), (0, -2), (-2, 0)];

/// Each unit of difficulty adds this much probability of skipping a carve direction.
const SKIP_PER_DIFFICULTY: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Path,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Maze {
    width: usize,
    height: usize,
    grid: Vec<Vec<Tile>>,
}

/// One pending carve step: the cell being carved from, its shuffled
/// direction order and how many of those directions were already tried.
struct CarveFrame {
    pos: Pos,
    dirs: [(isize, isize); 4],
    next: usize,
}

impl CarveFrame {
    fn enter(pos: Pos, rng: &mut impl Rng) -> Self {
        let mut dirs = CARVE_STEPS;
        dirs.shuffle(rng);
        Self { pos, dirs, next: 0 }
    }
}

impl Maze {
    pub fn filled(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            grid: vec![vec![Tile::Wall; width]; height],
        }
    }

    /// Carves a randomized depth-first maze starting at `(1, 1)`.
    ///
    /// A direction is only taken when a uniform draw is strictly greater than
    /// `difficulty * 0.1`, so `difficulty >= 10` leaves everything but the start
    /// and the forced corridors closed. The entrance (row 1, columns 0-1) and the
    /// exit (row `height - 2`, the last two columns) are always opened afterwards.
    ///
    /// `width` and `height` must be at least 3.
    pub fn generate(rng: &mut impl Rng, width: usize, height: usize, difficulty: f64) -> Self {
        let mut maze = Self::filled(width, height);
        let threshold = difficulty * SKIP_PER_DIFFICULTY;

        let start = Pos::new(1, 1);
        maze.set(start, Tile::Path);
        let mut stack = vec![CarveFrame::enter(start, rng)];

        while let Some(frame) = stack.last_mut() {
            if frame.next >= frame.dirs.len() {
                stack.pop();
                continue;
            }
            let (dx, dy) = frame.dirs[frame.next];
            frame.next += 1;
            let from = frame.pos;

            let Some(target) = maze.offset(from, dx, dy) else {
                continue;
            };
            if maze.tile(target) != Tile::Wall {
                continue;
            }
            // Only drawn once the cheaper checks pass, so the rng stream matches
            // the short-circuiting recursive formulation.
            if rng.gen::<f64>() > threshold {
                let between = Pos::new((from.x + target.x) / 2, (from.y + target.y) / 2);
                maze.set(between, Tile::Path);
                maze.set(target, Tile::Path);
                stack.push(CarveFrame::enter(target, rng));
            }
        }

        maze.open_corridors();
        log::debug!(
            "Generated {}x{} maze at difficulty {:.2}, {} open cells",
            width,
            height,
            difficulty,
            maze.open_cells().len()
        );
        maze
    }

    fn open_corridors(&mut self) {
        let (w, h) = (self.width, self.height);
        for pos in [
            Pos::new(1, 1),
            Pos::new(0, 1),
            Pos::new(w - 2, h - 2),
            Pos::new(w - 1, h - 2),
        ] {
            self.set(pos, Tile::Path);
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile(&self, pos: Pos) -> Tile {
        self.grid[pos.y][pos.x]
    }

    pub fn set(&mut self, pos: Pos, tile: Tile) {
        self.grid[pos.y][pos.x] = tile;
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub fn offset(&self, pos: Pos, dx: isize, dy: isize) -> Option<Pos> {
        let x = pos.x.checked_add_signed(dx)?;
        let y = pos.y.checked_add_signed(dy)?;
        let next = Pos::new(x, y);
        self.in_bounds(next).then_some(next)
    }

    pub fn can_move(&self, pos: Pos, dir: Dir) -> bool {
        let (dx, dy) = dir.delta();
        self.offset(pos, dx, dy)
            .is_some_and(|next| self.tile(next) == Tile::Path)
    }

    pub fn open_cells(&self) -> Vec<Pos> {
        let mut cells = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.grid[y][x] == Tile::Path {
                    cells.push(Pos { x, y });
                }
            }
        }
        cells
    }

    // Terminates on any generated maze since (1, 1) is open.
    pub fn random_open_cell(&self, rng: &mut impl Rng) -> Pos {
        loop {
            let pos = Pos::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height));
            if self.tile(pos) == Tile::Path {
                return pos;
            }
        }
    }
}

pub fn step(pos: Pos, dir: Dir) -> Pos {
    let (dx, dy) = dir.delta();
    Pos {
        x: (pos.x as isize + dx) as usize,
        y: (pos.y as isize + dy) as usize,
    }
}
