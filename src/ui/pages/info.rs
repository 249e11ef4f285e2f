// Info page: what the player is doing right now.

use crate::audio::PlayMode;
use crate::shared::{HelpIndex, PageId};
use crate::status::Hms;
use crate::tui::grid::{BoxStyle, CellGrid};

use crate::ui::app::App;
use crate::ui::page::{PageHooks, PageSlot, PageState};

const SHOWN_CHANNELS: usize = 8;

fn mode_label(mode: PlayMode) -> &'static str {
    if mode.contains(PlayMode::PATTERN_LOOP) {
        "Looping pattern"
    } else if mode.contains(PlayMode::PLAYING) {
        "Playing song"
    } else if mode.contains(PlayMode::SINGLE_STEP) {
        "Single step"
    } else {
        "Stopped"
    }
}

struct Info;

impl PageHooks for Info {
    fn draw_const(&mut self, _app: &App, grid: &mut CellGrid) {
        grid.draw_box(4, 13, 60, 21, BoxStyle::ThickInset);
        grid.draw_box(4, 23, 60, 25 + SHOWN_CHANNELS as u16, BoxStyle::ThickInset);
        for (i, label) in ["Mode", "Order", "Pattern", "Row", "Speed", "Tempo", "Time"].iter().enumerate() {
            grid.draw_text(label, 6, 14 + i as u16, 0, 2);
        }
    }

    fn predraw(&mut self, app: &App, grid: &mut CellGrid) {
        let mode = app.playback.mode();
        let pos = app.playback.position();
        let t = Hms::from_secs(app.playback.elapsed_secs());
        let values = [
            mode_label(mode).to_string(),
            format!("{:03}", pos.order),
            format!("{:03}", pos.pattern),
            format!("{:03}", pos.row),
            format!("{:03}", app.playback.speed()),
            format!("{:03}", app.playback.tempo()),
            format!("{}:{:02}:{:02}", t.h, t.m, t.s),
        ];
        for (i, value) in values.iter().enumerate() {
            grid.draw_text_len(value, 20, 15, 14 + i as u16, 5, 0);
        }

        for ch in 0..SHOWN_CHANNELS {
            let muted = app.song.channel_mute.get(ch).copied().unwrap_or(false);
            let y = 24 + ch as u16;
            grid.draw_text(&format!("Channel {:02}", ch + 1), 6, y, 0, 2);
            grid.draw_text_len(if muted { "Muted" } else { "" }, 8, 20, y, 1, 0);
        }
    }

    fn playback_update(&mut self, app: &mut App) {
        if app.is_playing() && app.status.current_page == PageId::Info {
            app.status.need_update();
        }
    }
}

pub fn register() -> PageSlot {
    PageSlot::new(PageState::new("Info Page", HelpIndex::Info), Info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_loop_wins_over_playing() {
        assert_eq!(mode_label(PlayMode::PLAYING | PlayMode::PATTERN_LOOP), "Looping pattern");
        assert_eq!(mode_label(PlayMode::PLAYING), "Playing song");
        assert_eq!(mode_label(PlayMode::STOPPED), "Stopped");
    }
}
