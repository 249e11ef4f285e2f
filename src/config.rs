// User configuration, kept as toml under the platform config directory, and
// the log file setup. The terminal belongs to the renderer, so log output
// goes to a file in the data directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::shared::PageId;
use crate::status::{StatusFlags, TimeDisplay, VisStyle};
use crate::ui::app::App;

const APP_DIR: &str = "tracktty";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub classic_mode: bool,
    pub time_display: TimeDisplay,
    pub vis_style: VisStyle,
    pub start_page: PageId,
    pub octave: u8,
    pub inverted_palette: bool,
    pub font_edit_on_startup: bool,
    pub song_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            classic_mode: false,
            time_display: TimeDisplay::default(),
            vis_style: VisStyle::default(),
            start_page: PageId::Blank,
            octave: 4,
            inverted_palette: false,
            font_edit_on_startup: false,
            song_dir: None,
        }
    }
}

impl Config {
    pub fn path() -> anyhow::Result<PathBuf> {
        let dir = dirs::config_dir().context("no config directory on this platform")?;
        Ok(dir.join(APP_DIR).join("config.toml"))
    }

    // missing file means defaults, a broken one is logged and replaced by defaults
    pub fn load() -> Self {
        match Self::path().and_then(|p| Self::load_from(&p)) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("using default config: {e:#}");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let config = toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let text = toml::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    // settings into a fresh App, before the first page is shown
    pub fn apply(&self, app: &mut App) {
        let flags = &mut app.status.flags;
        flags.set(StatusFlags::CLASSIC_MODE, self.classic_mode);
        flags.set(StatusFlags::INVERTED_PALETTE, self.inverted_palette);
        flags.set(StatusFlags::STARTUP_FONTEDIT, self.font_edit_on_startup);
        app.status.time_display = self.time_display;
        app.status.vis_style = self.vis_style;
        app.set_octave(self.octave as i32);
        app.song_dir = self.song_dir.clone();
    }

    pub fn first_page(&self) -> PageId {
        if self.font_edit_on_startup { PageId::FontEdit } else { self.start_page }
    }

    // what the user changed during the session
    pub fn capture(&mut self, app: &App) {
        self.classic_mode = app.status.classic();
        self.inverted_palette = app.status.flags.contains(StatusFlags::INVERTED_PALETTE);
        self.time_display = app.status.time_display;
        self.vis_style = app.status.vis_style;
        self.octave = app.octave;
    }
}

// RUST_LOG decides the level, info when unset
pub fn init_logging() -> anyhow::Result<PathBuf> {
    let dir = dirs::data_dir().context("no data directory on this platform")?.join(APP_DIR);
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join("tracktty.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(path)
}
