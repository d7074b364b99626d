use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{
    DEFAULT_COINS, DEFAULT_DIFFICULTY, DEFAULT_VISIBILITY_RADIUS, DIFFICULTY_COST, DIFFICULTY_STEP,
    MIN_DIFFICULTY, VISIBILITY_COST,
};
use crate::error::Result;

/// Persisted progression: currency and the two upgradeable parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    pub coins: u32,
    pub visibility_radius: u32,
    pub maze_difficulty: f64,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            coins: DEFAULT_COINS,
            visibility_radius: DEFAULT_VISIBILITY_RADIUS,
            maze_difficulty: DEFAULT_DIFFICULTY,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upgrade {
    Visibility,
    Difficulty,
}

impl Upgrade {
    pub fn cost(self) -> u32 {
        match self {
            Upgrade::Visibility => VISIBILITY_COST,
            Upgrade::Difficulty => DIFFICULTY_COST,
        }
    }
}

impl Progress {
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No save at {}, starting fresh", path.display());
            return Self::default();
        }
        match Self::read(path) {
            Ok(progress) => {
                log::info!("Loaded save from {}: {:?}", path.display(), progress);
                progress
            }
            Err(e) => {
                log::warn!("Ignoring unreadable save {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let progress: Self = serde_json::from_str(&text)?;
        Ok(progress.sanitized())
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn persist(&self, path: &Path) {
        if let Err(e) = self.write(path) {
            log::error!("Failed to write save {}: {}", path.display(), e);
        }
    }

    /// Pulls hand-edited values back into the ranges the game relies on.
    fn sanitized(mut self) -> Self {
        if !self.maze_difficulty.is_finite() {
            self.maze_difficulty = DEFAULT_DIFFICULTY;
        }
        self.maze_difficulty = self.maze_difficulty.max(MIN_DIFFICULTY);
        self.visibility_radius = self.visibility_radius.max(1);
        self
    }

    pub fn visibility(&self) -> f64 {
        f64::from(self.visibility_radius)
    }

    pub fn add_coin(&mut self) {
        self.coins = self.coins.saturating_add(1);
    }

    pub fn purchase(&mut self, upgrade: Upgrade) -> bool {
        let cost = upgrade.cost();
        if self.coins < cost {
            return false;
        }
        self.coins -= cost;
        match upgrade {
            Upgrade::Visibility => {
                self.visibility_radius = self.visibility_radius.saturating_add(1)
            }
            Upgrade::Difficulty => {
                self.maze_difficulty = (self.maze_difficulty - DIFFICULTY_STEP).max(MIN_DIFFICULTY)
            }
        }
        log::info!("Bought {:?} for {} coins, now {:?}", upgrade, cost, self);
        true
    }
}
