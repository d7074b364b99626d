use crate::save::{Progress, Upgrade};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Upgrades,
    Playing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Play,
    Upgrades,
    Buy(Upgrade),
    Back,
}

pub const MAIN_BUTTONS: [Button; 2] = [Button::Play, Button::Upgrades];
pub const UPGRADE_BUTTONS: [Button; 3] = [
    Button::Buy(Upgrade::Visibility),
    Button::Buy(Upgrade::Difficulty),
    Button::Back,
];

pub const TITLE: &str = "Neon Maze Explorer";

impl Button {
    pub fn label(self) -> String {
        match self {
            Button::Play => "Play".to_string(),
            Button::Upgrades => "Upgrades".to_string(),
            Button::Buy(Upgrade::Visibility) => {
                format!("Visibility +1 (Cost: {})", Upgrade::Visibility.cost())
            }
            Button::Buy(Upgrade::Difficulty) => {
                format!("Reduce Difficulty (Cost: {})", Upgrade::Difficulty.cost())
            }
            Button::Back => "Back".to_string(),
        }
    }

    pub fn shortcut(self) -> char {
        match self {
            Button::Play => 'p',
            Button::Upgrades => 'u',
            Button::Buy(Upgrade::Visibility) => 'v',
            Button::Buy(Upgrade::Difficulty) => 'd',
            Button::Back => 'b',
        }
    }

    /// Purchase buttons the player cannot pay for are drawn dimmed.
    pub fn affordable(self, progress: &Progress) -> bool {
        match self {
            Button::Buy(upgrade) => progress.coins >= upgrade.cost(),
            _ => true,
        }
    }
}

pub fn buttons(screen: Screen) -> &'static [Button] {
    match screen {
        Screen::Menu => &MAIN_BUTTONS,
        Screen::Upgrades => &UPGRADE_BUTTONS,
        Screen::Playing => &[],
    }
}

/// Keyboard focus within a button list. Wraps at both ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    index: usize,
}

impl Selection {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn up(&mut self, len: usize) {
        if len > 0 {
            self.index = (self.index + len - 1) % len;
        }
    }

    pub fn down(&mut self, len: usize) {
        if len > 0 {
            self.index = (self.index + 1) % len;
        }
    }

    pub fn current(&self, buttons: &[Button]) -> Option<Button> {
        buttons.get(self.index).copied()
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

pub fn find_shortcut(buttons: &[Button], c: char) -> Option<Button> {
    let c = c.to_ascii_lowercase();
    buttons.iter().copied().find(|b| b.shortcut() == c)
}
