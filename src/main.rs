use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use std::io::{self, Stdout};
use std::thread;
use std::time::{Duration, Instant};

mod app;
mod config;
mod error;
mod game;
mod logging;
mod maze;
mod menu;
mod render;
mod save;
mod visibility;

use app::{App, Flow};
use config::Settings;
use error::Result;
use render::Renderer;

fn main() -> Result<()> {
    let settings = Settings::default();
    logging::setup_logger(&settings.log_path)?;
    log::info!("Starting maze runner with {:?}", settings);

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, settings);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    if let Err(e) = &result {
        log::error!("Exiting on error: {}", e);
    }
    result
}

fn run(stdout: &mut Stdout, settings: Settings) -> Result<()> {
    let mut rng = rand::thread_rng();
    let frame_time = Duration::from_micros(1_000_000 / settings.fps.max(1));
    let mut renderer = Renderer::new(settings.grid_w, settings.grid_h);
    let mut app = App::new(settings);

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) => {
                    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                        continue;
                    }
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        return Ok(());
                    }
                    if app.handle_key(key.code, &mut rng) == Flow::Quit {
                        log::info!("Quit with {} coins", app.progress.coins);
                        return Ok(());
                    }
                }
                Event::Resize(_, _) => renderer.invalidate(),
                _ => {}
            }
        }

        app.tick(&mut rng);
        render::render(stdout, &app, &mut renderer)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}
