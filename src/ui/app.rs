// The application context. Everything the dispatch pipeline and the redraw
// orchestrator read or write hangs off App; there are no ambient globals.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::audio::{DiskWriter, Playback};
use crate::pipeline::song::Song;
use crate::shared::{MAX_PATTERNS, NUM_INSTRUMENTS, NUM_SAMPLES, PageId};
use crate::status::{DialogType, Status, StatusFlags};

use super::compose::Composer;
use super::dialog::{Dialog, DialogOutcome};
use super::menu::{self, Menu};
use super::minipop::MiniPop;
use super::page::{PageHooks, PageTable};
use super::pages;
use super::prompts;
use super::time::TimeState;
use super::widget::Widget;

const FLASH_TIME: Duration = Duration::from_millis(1000);
const LOG_LINES: usize = 1000;

// whose widgets the focus handler works on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidgetOwner {
    Page(PageId),
    Dialog,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    pub order: usize,
    pub pattern: usize,
    pub row: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VideoMode {
    #[default]
    Default,
    Mono, // the font editor draws glyphs without palette colors
}

#[derive(Clone, Debug)]
pub struct Flash {
    pub text: String,
    pub at: Instant,
}

pub struct App {
    pub status: Status,
    pub pages: PageTable,
    pub active: WidgetOwner,
    pub dialogs: Vec<Dialog>,
    pub menu: Menu,
    pub minipop: MiniPop,
    pub composer: Composer,
    pub time: TimeState,

    pub song: Song,
    pub playback: Playback,
    pub disk_writer: Option<DiskWriter>,

    pub cursor: Cursor,
    pub current_sample: usize,
    pub current_instrument: usize,
    pub octave: u8,
    pub last_instrument_page: PageId,

    pub playback_tracing: bool,
    pub midi_record_disabled: bool,
    pub video_mode: VideoMode,
    pub fullscreen: bool,
    pub mouse_captured: bool,
    pub reinit_requested: bool,
    pub exit_requested: bool,

    pub song_dir: Option<PathBuf>,
    pub clipboard: String,
    pub flash: Option<Flash>,
    pub log_lines: Vec<String>,
    pub started: Instant,
}

impl App {
    pub fn new(song: Song, playback: Playback) -> Self {
        playback.set_layout(song.layout());
        Self {
            status: Status::default(),
            pages: pages::load_pages(),
            active: WidgetOwner::Page(PageId::Blank),
            dialogs: Vec::new(),
            menu: Menu::default(),
            minipop: MiniPop::default(),
            composer: Composer::default(),
            time: TimeState::default(),
            song,
            playback,
            disk_writer: None,
            cursor: Cursor::default(),
            current_sample: 0,
            current_instrument: 0,
            octave: 4,
            last_instrument_page: PageId::InstrumentListGeneral,
            playback_tracing: false,
            midi_record_disabled: false,
            video_mode: VideoMode::Default,
            fullscreen: false,
            mouse_captured: true,
            reinit_requested: false,
            exit_requested: false,
            song_dir: None,
            clipboard: String::new(),
            flash: None,
            log_lines: Vec::new(),
            started: Instant::now(),
        }
    }

    // ── Messages ──────────────────────────────────────────────────

    pub fn log(&mut self, line: impl Into<String>) {
        let line = line.into();
        log::info!("{line}");
        self.log_lines.push(line);
        if self.log_lines.len() > LOG_LINES {
            self.log_lines.remove(0);
        }
    }

    pub fn status_text_flash(&mut self, text: impl Into<String>) {
        self.flash = Some(Flash { text: text.into(), at: Instant::now() });
        self.status.need_update();
    }

    pub fn flash_text(&self) -> Option<&str> {
        self.flash.as_ref().filter(|f| f.at.elapsed() < FLASH_TIME).map(|f| f.text.as_str())
    }

    // drops an expired flash; the status line needs repainting when it goes
    pub fn tick_flash(&mut self) {
        if self.flash.as_ref().is_some_and(|f| f.at.elapsed() >= FLASH_TIME) {
            self.flash = None;
            self.status.need_update();
        }
    }

    // ── Song cursor and current slots ─────────────────────────────

    pub fn is_playing(&self) -> bool {
        self.playback.mode().is_playing()
    }

    pub fn set_octave(&mut self, octave: i32) {
        self.octave = octave.clamp(0, 8) as u8;
        self.status.need_update();
    }

    pub fn set_current_sample(&mut self, n: i32) {
        self.current_sample = n.clamp(0, NUM_SAMPLES as i32) as usize;
        self.status.flags.insert(StatusFlags::SAMPLE_CHANGED);
        self.status.need_update();
    }

    pub fn set_current_instrument(&mut self, n: i32) {
        self.current_instrument = n.clamp(0, NUM_INSTRUMENTS as i32) as usize;
        self.status.flags.insert(StatusFlags::INSTRUMENT_CHANGED);
        self.status.need_update();
    }

    pub fn set_current_order(&mut self, order: i32) {
        self.cursor.order = order.clamp(0, self.song.num_orders() as i32) as usize;
        self.status.need_update();
    }

    pub fn set_current_pattern(&mut self, pattern: i32) {
        self.cursor.pattern = pattern.clamp(0, MAX_PATTERNS as i32 - 1) as usize;
        let last = self.song.rows_in_pattern(self.cursor.pattern).saturating_sub(1);
        self.cursor.row = self.cursor.row.min(last);
        self.status.need_update();
    }

    pub fn set_current_row(&mut self, row: i32) {
        let last = self.song.rows_in_pattern(self.cursor.pattern).saturating_sub(1) as i32;
        self.cursor.row = row.clamp(0, last) as usize;
        self.status.need_update();
    }

    // resolves a pending sample/instrument change in one direction
    pub fn sync_sample_instrument(&mut self) {
        let flags = self.status.flags;
        if flags.contains(StatusFlags::SAMPLE_CHANGED) {
            if self.song.instrument_mode {
                if let Some(ins) = self.song.instrument_for_sample(self.current_sample) {
                    self.current_instrument = ins;
                }
            } else {
                self.current_instrument = self.current_sample;
            }
        } else if flags.contains(StatusFlags::INSTRUMENT_CHANGED) {
            self.current_sample = self.current_instrument;
        }
        self.status.flags.remove(StatusFlags::SAMPLE_CHANGED | StatusFlags::INSTRUMENT_CHANGED);
    }

    // ── Active widget set ─────────────────────────────────────────

    pub fn active_widgets(&self) -> (&[Widget], Option<usize>) {
        match self.active {
            WidgetOwner::Dialog if !self.dialogs.is_empty() => {
                let d = &self.dialogs[self.dialogs.len() - 1];
                (&d.widgets, d.selected_widget)
            }
            WidgetOwner::Page(id) => {
                let page = self.pages.state(id);
                (&page.widgets, page.selected_widget)
            }
            WidgetOwner::Dialog => {
                let page = self.pages.state(self.status.current_page);
                (&page.widgets, page.selected_widget)
            }
        }
    }

    pub fn active_widgets_mut(&mut self) -> (&mut Vec<Widget>, &mut Option<usize>) {
        let page_id = match self.active {
            WidgetOwner::Page(id) => id,
            WidgetOwner::Dialog => self.status.current_page,
        };
        match self.dialogs.last_mut() {
            Some(d) if self.active == WidgetOwner::Dialog => (&mut d.widgets, &mut d.selected_widget),
            _ => {
                let page = self.pages.state_mut(page_id);
                (&mut page.widgets, &mut page.selected_widget)
            }
        }
    }

    pub fn focused_widget(&self) -> Option<&Widget> {
        let (widgets, selected) = self.active_widgets();
        selected.and_then(|i| widgets.get(i))
    }

    pub fn focused_widget_mut(&mut self) -> Option<&mut Widget> {
        let (widgets, selected) = self.active_widgets_mut();
        let i = (*selected)?;
        widgets.get_mut(i)
    }

    pub fn focused_accepts_text(&self) -> bool {
        self.focused_widget().is_some_and(Widget::accepts_text)
    }

    pub fn change_focus_to(&mut self, i: usize) {
        let (widgets, selected) = self.active_widgets_mut();
        if i < widgets.len() {
            *selected = Some(i);
        }
        self.status.need_update();
    }

    // ── Page hooks ────────────────────────────────────────────────

    // Runs `f` with the page's hooks checked out of the table so the hook
    // can borrow the whole App. A hook re-entering its own page finds the
    // slot empty and gets `fallback`.
    pub fn with_page_hooks<R>(
        &mut self,
        id: PageId,
        fallback: R,
        f: impl FnOnce(&mut dyn PageHooks, &mut App) -> R,
    ) -> R {
        let Some(mut hooks) = self.pages.take_hooks(id) else {
            return fallback;
        };
        let result = f(hooks.as_mut(), self);
        self.pages.put_hooks(id, hooks);
        result
    }

    // ── Dialog stack ──────────────────────────────────────────────

    pub fn push_dialog(&mut self, dialog: Dialog) {
        if self.status.dialog_type.contains(DialogType::MENU) {
            menu::menu_hide(self);
        }
        log::debug!("dialog open: {:?} {:?}", dialog.kind, dialog.art);
        self.status.dialog_type = dialog.kind;
        self.dialogs.push(dialog);
        self.active = WidgetOwner::Dialog;
        self.status.need_update();
    }

    pub fn destroy_dialog(&mut self) -> Option<Dialog> {
        let dialog = self.dialogs.pop()?;
        log::debug!("dialog closed: {:?}", dialog.art);
        if dialog.art == super::dialog::DialogArt::MiniPop {
            self.minipop.reset();
        }
        self.restore_after_dialog();
        Some(dialog)
    }

    pub fn destroy_all_dialogs(&mut self) {
        while self.destroy_dialog().is_some() {}
    }

    fn restore_after_dialog(&mut self) {
        match self.dialogs.last() {
            Some(top) => self.status.dialog_type = top.kind,
            None => {
                self.status.dialog_type = DialogType::NONE;
                self.active = WidgetOwner::Page(self.status.current_page);
            }
        }
        self.status.need_update();
    }

    // the dialog goes first; its action may open the next one
    pub fn dialog_outcome(&mut self, outcome: DialogOutcome) {
        let Some(dialog) = self.destroy_dialog() else {
            return;
        };
        let action = dialog.action_for(outcome);
        prompts::run_dialog_action(self, action, &dialog);
    }

    // ── Song lifecycle ────────────────────────────────────────────

    // bare file names typed on the load/save pages live in the song directory
    pub fn song_path(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        match &self.song_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn song_changed(&mut self) {
        self.cursor = Cursor::default();
        let first = self.song.orderlist.first().copied().unwrap_or(0) as usize;
        self.cursor.pattern = if first >= MAX_PATTERNS { 0 } else { first };
        self.time.cache.invalidate();

        for id in PageId::ALL.iter().rev() {
            self.with_page_hooks(*id, (), |hooks, app| hooks.song_changed(app));
        }

        let name = self.song.basename();
        if !name.is_empty() {
            self.log(format!("Loaded song: {name}"));
        }
        self.playback.set_layout(self.song.layout());
        self.status.need_update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Song::default(), Playback::new(1000))
    }

    #[test]
    fn sample_change_follows_into_instrument_mode() {
        let mut app = app();
        app.song.instrument_mode = true;
        app.song.instruments[7].sample = 3;
        app.set_current_sample(3);
        app.sync_sample_instrument();
        assert_eq!(app.current_instrument, 7);
        assert!(!app.status.flags.intersects(StatusFlags::SAMPLE_CHANGED | StatusFlags::INSTRUMENT_CHANGED));
    }

    #[test]
    fn instrument_change_copies_into_the_sample_slot() {
        let mut app = app();
        app.set_current_instrument(5);
        app.sync_sample_instrument();
        assert_eq!(app.current_sample, 5);
    }

    #[test]
    fn closing_the_last_dialog_repoints_at_the_current_page() {
        let mut app = app();
        app.status.current_page = PageId::Info;
        app.push_dialog(Dialog::message(
            DialogType::OK,
            "hi",
            super::super::dialog::DialogAction::None,
            super::super::dialog::DialogAction::None,
            0,
        ));
        assert_eq!(app.active, WidgetOwner::Dialog);
        app.destroy_all_dialogs();
        assert_eq!(app.active, WidgetOwner::Page(PageId::Info));
        assert!(app.status.dialog_type.is_none());
    }

    #[test]
    fn log_is_bounded() {
        let mut app = app();
        for i in 0..LOG_LINES + 5 {
            app.log(format!("line {i}"));
        }
        assert_eq!(app.log_lines.len(), LOG_LINES);
        assert_eq!(app.log_lines[0], "line 5");
    }

    #[test]
    fn song_changed_resets_the_cursor_to_the_first_order() {
        let mut app = app();
        app.song.orderlist = vec![3, 255];
        app.song.set_rows_in_pattern(3, 32);
        app.cursor = Cursor { order: 4, pattern: 9, row: 12 };
        app.song_changed();
        assert_eq!(app.cursor, Cursor { order: 0, pattern: 3, row: 0 });
    }

    #[test]
    fn song_changed_forgets_cached_positions() {
        let mut app = app();
        app.song.orderlist = vec![0, 0, 255];
        let before = app.time.cache.lookup(&app.song, 1, 0);
        app.song.set_rows_in_pattern(0, 32);
        app.song_changed();
        let after = app.time.cache.lookup(&app.song, 1, 0);
        assert_eq!(app.time.cache.computations(), 2);
        assert!(after < before);
    }
}
