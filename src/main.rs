mod audio;
mod config;
mod pipeline;
mod shared;
mod status;
mod tui;
mod ui;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Timelike;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::terminal;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use audio::{DEFAULT_SAMPLE_RATE, Playback};
use config::Config;
use pipeline::song::Song;
use status::{Hms, StatusFlags};
use tui::grid::CellGrid;
use tui::input::{Input, InputState};
use tui::view::Look;
use ui::app::{App, VideoMode};

fn main() {
    if let Err(e) = run() {
        log::error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    match config::init_logging() {
        Ok(path) => log::info!("logging to {}", path.display()),
        Err(e) => eprintln!("logging disabled: {e:#}"),
    }
    let mut config = Config::load();

    let playback = Playback::new(DEFAULT_SAMPLE_RATE);
    // no output device: the main loop drives the engine instead
    let audio = match audio::start_audio(&playback) {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::warn!("audio unavailable, using a software clock: {e:#}");
            None
        }
    };

    let mut app = App::new(Song::default(), playback);
    config.apply(&mut app);
    app.set_page(config.first_page());
    if let Some(path) = std::env::args().nth(1).map(PathBuf::from) {
        ui::prompts::song_load_unchecked(&mut app, &path);
    }

    terminal::enable_raw_mode()?;
    let _guard = RawModeGuard; // auto drops when out of scope
    // real press/release reporting where the terminal supports it
    let reports_release = terminal::supports_keyboard_enhancement().unwrap_or(false);
    if reports_release {
        crossterm::execute!(
            std::io::stdout(),
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                    | KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
            )
        )?;
    }
    crossterm::execute!(std::io::stdout(), EnableMouseCapture)?;
    let mut mouse_captured = true;

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let tick_rate = Duration::from_millis(16); // ~60fps
    let mut last_tick = Instant::now();
    let mut clock_carry = 0.0;
    let mut input = InputState::new(reports_release);
    let mut grid = CellGrid::default();
    app.status.need_update();

    while !app.exit_requested {
        for event in tui::input::poll_input(tick_rate, &mut input)? {
            match event {
                Input::Key(k) => {
                    if !ui::dispatch::process_event(&mut app, &k).consumed() {
                        log::trace!("unhandled {:?} {:?}", k.sym, k.state);
                    }
                }
                Input::Resize => app.status.need_update(),
            }
            if app.exit_requested {
                break;
            }
        }

        let elapsed = last_tick.elapsed();
        last_tick = Instant::now();
        if audio.is_none() {
            let frames = elapsed.as_secs_f64() * app.playback.sample_rate() as f64 + clock_carry;
            clock_carry = frames.fract();
            app.playback.advance(frames as usize);
        }

        let now = chrono::Local::now();
        app.status.clock = Hms { h: now.hour(), m: now.minute(), s: now.second() };
        ui::time::playback_update(&mut app);
        ui::prompts::poll_disk_writer(&mut app);
        app.tick_flash();

        if app.mouse_captured != mouse_captured {
            mouse_captured = app.mouse_captured;
            if mouse_captured {
                crossterm::execute!(std::io::stdout(), EnableMouseCapture)?;
            } else {
                crossterm::execute!(std::io::stdout(), DisableMouseCapture)?;
            }
        }
        if app.reinit_requested {
            app.reinit_requested = false;
            term.clear()?;
            app.status.need_update();
        }

        if app.status.take_update() {
            ui::redraw::redraw_screen(&mut app, &mut grid);
            let look = Look {
                inverted: app.status.flags.contains(StatusFlags::INVERTED_PALETTE),
                mono: app.video_mode == VideoMode::Mono,
            };
            term.draw(|frame| {
                tui::view::render(frame, frame.area(), &grid, look);
            })?;
        }
    }

    app.playback.stop();
    drop(audio);
    config.capture(&app);
    if let Err(e) = config.save() {
        log::warn!("config not saved: {e:#}");
    }
    log::info!("bye");
    Ok(())
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture, PopKeyboardEnhancementFlags);
        let _ = terminal::disable_raw_mode();
    }
}
