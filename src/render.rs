use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::config::CELL_W;
use crate::game::Game;
use crate::maze::{Pos, Tile};
use crate::menu::{buttons, Screen, TITLE};
use crate::visibility::is_visible;

const WALL_COLOR: Color = Color::Rgb { r: 41, g: 50, b: 65 };
const PATH_COLOR: Color = Color::Rgb { r: 152, g: 193, b: 217 };
const PLAYER_COLOR: Color = Color::Rgb { r: 255, g: 89, b: 94 };
const COIN_COLOR: Color = Color::Rgb { r: 255, g: 222, b: 89 };
const BORDER_COLOR: Color = Color::Rgb { r: 90, g: 111, b: 140 };

/// Rows reserved above the grid for the HUD line.
const HUD_ROWS: u16 = 1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Glyph {
    Player,
    Coin,
    CoinDim,
    Wall,
    Path,
    Hidden,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub glyph: Glyph,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
struct Line {
    text: String,
    color: Color,
}

/// Terminal drawing state. Owned by the main loop and threaded through every draw.
pub struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    last_lines: Vec<Line>,
    last_screen: Option<Screen>,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            last: vec![
                Cell {
                    glyph: Glyph::Hidden,
                    color: Color::Reset,
                };
                width * height
            ],
            last_hud: String::new(),
            last_lines: Vec::new(),
            last_screen: None,
            needs_full: true,
            origin_x: 0,
            origin_y: HUD_ROWS,
        }
    }

    /// Forces the next frame to repaint everything.
    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }
}

pub fn render(stdout: &mut Stdout, app: &App, renderer: &mut Renderer) -> io::Result<()> {
    if renderer.last_screen != Some(app.screen) {
        renderer.last_screen = Some(app.screen);
        renderer.needs_full = true;
    }
    if renderer.needs_full {
        stdout.queue(Clear(ClearType::All))?;
    }

    match (app.screen, app.game.as_ref()) {
        (Screen::Playing, Some(game)) => render_game(stdout, app, game, renderer)?,
        _ => render_menu(stdout, app, renderer)?,
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

fn render_game(stdout: &mut Stdout, app: &App, game: &Game, renderer: &mut Renderer) -> io::Result<()> {
    let width = game.maze.width();
    let height = game.maze.height();
    let needed_h = height as u16 + HUD_ROWS + 1;
    let needed_w = (width * CELL_W) as u16;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(MoveTo(0, 0))?;
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + HUD_ROWS;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        stdout.queue(Clear(ClearType::All))?;
        renderer.needs_full = true;
    }
    if renderer.last.len() != width * height {
        renderer.last = vec![
            Cell {
                glyph: Glyph::Hidden,
                color: Color::Reset,
            };
            width * height
        ];
        renderer.needs_full = true;
    }

    let hud = format!(
        "Coins: {}  Level: {}  (arrows/hjkl move, esc menu, q quit)",
        app.progress.coins, game.level
    );
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - HUD_ROWS))?;
        stdout.queue(SetForegroundColor(COIN_COLOR))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    let radius = app.progress.visibility();
    for y in 0..height {
        for x in 0..width {
            let cell = cell_for(game, Pos { x, y }, radius);
            let idx = y * width + x;
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(stdout, renderer, x, y, cell)?;
            }
        }
    }
    Ok(())
}

/// What to show at `pos` this frame, as seen from the player.
pub fn cell_for(game: &Game, pos: Pos, radius: f64) -> Cell {
    if pos == game.player {
        return Cell {
            glyph: Glyph::Player,
            color: PLAYER_COLOR,
        };
    }
    if pos == game.coin && game.coin_visible(radius) {
        let glyph = if game.pulse.sin() >= 0.0 {
            Glyph::Coin
        } else {
            Glyph::CoinDim
        };
        return Cell {
            glyph,
            color: COIN_COLOR,
        };
    }
    if !is_visible(pos, game.player, radius) {
        return Cell {
            glyph: Glyph::Hidden,
            color: Color::Reset,
        };
    }
    match game.maze.tile(pos) {
        Tile::Wall => Cell {
            glyph: Glyph::Wall,
            color: WALL_COLOR,
        },
        Tile::Path => Cell {
            glyph: Glyph::Path,
            color: PATH_COLOR,
        },
    }
}

fn draw_cell(stdout: &mut Stdout, renderer: &Renderer, x: usize, y: usize, cell: Cell) -> io::Result<()> {
    let text = match cell.glyph {
        Glyph::Player => "██",
        Glyph::Coin => "●",
        Glyph::CoinDim => "•",
        Glyph::Wall => "██",
        Glyph::Path => "· ",
        Glyph::Hidden => "  ",
    };
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + y as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(cell.color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}

fn menu_lines(app: &App) -> Vec<Line> {
    let mut lines = Vec::new();
    match app.screen {
        Screen::Upgrades => lines.push(Line {
            text: format!("Coins: {}", app.progress.coins),
            color: COIN_COLOR,
        }),
        _ => lines.push(Line {
            text: TITLE.to_string(),
            color: COIN_COLOR,
        }),
    }
    lines.push(Line {
        text: String::new(),
        color: Color::Reset,
    });

    for (i, button) in buttons(app.screen).iter().enumerate() {
        let selected = i == app.selection.index();
        let label = format!("[{}] {}", button.shortcut(), button.label());
        let text = if selected {
            format!("> {} <", label)
        } else {
            format!("  {}  ", label)
        };
        let color = if !button.affordable(&app.progress) {
            WALL_COLOR
        } else if selected {
            COIN_COLOR
        } else {
            BORDER_COLOR
        };
        lines.push(Line { text, color });
    }

    lines.push(Line {
        text: String::new(),
        color: Color::Reset,
    });
    if app.screen == Screen::Upgrades {
        lines.push(Line {
            text: format!(
                "Visibility: {}  Difficulty: {:.1}",
                app.progress.visibility_radius, app.progress.maze_difficulty
            ),
            color: PATH_COLOR,
        });
    }
    lines.push(Line {
        text: "up/down select, enter choose, q quit".to_string(),
        color: BORDER_COLOR,
    });
    lines
}

fn render_menu(stdout: &mut Stdout, app: &App, renderer: &mut Renderer) -> io::Result<()> {
    let lines = menu_lines(app);
    if !renderer.needs_full && lines == renderer.last_lines {
        return Ok(());
    }

    let (term_w, term_h) = terminal::size()?;
    stdout.queue(Clear(ClearType::All))?;
    let top = term_h.saturating_sub(lines.len() as u16) / 2;
    for (row, line) in lines.iter().enumerate() {
        let w = UnicodeWidthStr::width(line.text.as_str()) as u16;
        let x = term_w.saturating_sub(w) / 2;
        stdout.queue(MoveTo(x, top + row as u16))?;
        stdout.queue(SetForegroundColor(line.color))?;
        stdout.queue(Print(&line.text))?;
        stdout.queue(ResetColor)?;
    }
    renderer.last_lines = lines;
    Ok(())
}
