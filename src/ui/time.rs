// The time readout. A hybrid display mode picks its concrete sibling from
// the playback state; the concrete mode then produces an h/m/s triple, and
// only a change in that triple asks for a redraw.

use crate::audio::PlayMode;
use crate::pipeline::song::Song;
use crate::shared::PageId;
use crate::status::{Hms, TimeDisplay};

use super::app::App;

pub fn resolve(display: TimeDisplay, playing: bool) -> TimeDisplay {
    match display {
        TimeDisplay::PlayElapsed if playing => TimeDisplay::Playback,
        TimeDisplay::PlayElapsed => TimeDisplay::Elapsed,
        TimeDisplay::PlayClock if playing => TimeDisplay::Playback,
        TimeDisplay::PlayClock => TimeDisplay::Clock,
        TimeDisplay::PlayOff if playing => TimeDisplay::Playback,
        TimeDisplay::PlayOff => TimeDisplay::Off,
        concrete => concrete,
    }
}

// everything a concrete mode may read, snapshotted once per tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeSources {
    pub playing: bool,
    pub playback_secs: u64,
    pub elapsed_secs: u64,
    pub clock: Hms,
    // (order, row) for the absolute mode; None when the cursor pattern is not in the orderlist
    pub position: Option<(usize, usize)>,
}

// Song::length_to walks the whole orderlist, so the absolute mode keeps the
// last answer keyed by (order, row).
#[derive(Clone, Debug, Default)]
pub struct PositionTimeCache {
    last: Option<((usize, usize), u64)>,
    computations: usize,
}

impl PositionTimeCache {
    pub fn lookup(&mut self, song: &Song, order: usize, row: usize) -> u64 {
        match self.last {
            Some((key, secs)) if key == (order, row) => secs,
            _ => {
                let secs = song.length_to(order, row);
                self.computations += 1;
                self.last = Some(((order, row), secs));
                secs
            }
        }
    }

    pub fn computations(&self) -> usize {
        self.computations
    }

    pub fn invalidate(&mut self) {
        self.last = None;
    }
}

pub fn compute_hms(display: TimeDisplay, src: &TimeSources, cache: &mut PositionTimeCache, song: &Song) -> Hms {
    match resolve(display, src.playing) {
        TimeDisplay::Off => Hms::default(),
        TimeDisplay::Playback => Hms::from_secs(src.playback_secs),
        TimeDisplay::Elapsed => Hms::from_secs(src.elapsed_secs),
        TimeDisplay::Clock => src.clock,
        TimeDisplay::Absolute => match src.position {
            Some((order, row)) => Hms::from_secs(cache.lookup(song, order, row)),
            None => Hms::default(),
        },
        // resolve never hands back a hybrid
        TimeDisplay::PlayElapsed | TimeDisplay::PlayClock | TimeDisplay::PlayOff => Hms::default(),
    }
}

#[derive(Clone, Debug, Default)]
pub struct TimeState {
    pub current: Hms,
    pub cache: PositionTimeCache,
    last_mode: PlayMode,
    last_position: (usize, usize),
}

fn sources(app: &App) -> TimeSources {
    let mode = app.playback.mode();
    let position = if app.status.current_page == PageId::PatternEditor {
        app.song
            .order_for_pattern(app.cursor.pattern, Some(app.cursor.order))
            .map(|order| (order, app.cursor.row))
    } else {
        Some((app.cursor.order, 0))
    };
    TimeSources {
        playing: mode.is_playing(),
        playback_secs: app.playback.elapsed_secs(),
        elapsed_secs: app.started.elapsed().as_secs(),
        clock: app.status.clock,
        position,
    }
}

// recomputes the readout; true when the shown value changed
pub fn check_time(app: &mut App) -> bool {
    let src = sources(app);
    let hms = compute_hms(app.status.time_display, &src, &mut app.time.cache, &app.song);
    if hms == app.time.current {
        return false;
    }
    app.time.current = hms;
    true
}

// whether the readout is drawn at all
pub fn time_visible(display: TimeDisplay, playing: bool) -> bool {
    match display {
        TimeDisplay::Off => false,
        TimeDisplay::PlayOff => playing,
        _ => true,
    }
}

// once per playback tick
pub fn playback_update(app: &mut App) {
    let time_changed = check_time(app);

    let mode = app.playback.mode();
    let pos = app.playback.position();
    let moved = mode.is_playing() && (pos.order, pos.row) != app.time.last_position;
    if time_changed || mode != app.time.last_mode || moved {
        app.status.need_update();
    }
    app.time.last_mode = mode;
    app.time.last_position = (pos.order, pos.row);

    let page = app.status.current_page;
    app.with_page_hooks(page, (), |hooks, app| hooks.playback_update(app));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Playback;
    use crate::pipeline::song::Pattern;
    use crate::shared::ORDER_LAST;
    use proptest::prelude::*;

    fn song() -> Song {
        let mut song = Song::default();
        song.patterns = vec![Pattern { rows: 64 }, Pattern { rows: 64 }];
        song.orderlist = vec![0, 1, 0, ORDER_LAST];
        song
    }

    #[test]
    fn hybrids_resolve_on_playback_state() {
        assert_eq!(resolve(TimeDisplay::PlayElapsed, true), TimeDisplay::Playback);
        assert_eq!(resolve(TimeDisplay::PlayElapsed, false), TimeDisplay::Elapsed);
        assert_eq!(resolve(TimeDisplay::PlayClock, false), TimeDisplay::Clock);
        assert_eq!(resolve(TimeDisplay::PlayOff, false), TimeDisplay::Off);
        assert_eq!(resolve(TimeDisplay::Absolute, true), TimeDisplay::Absolute);
    }

    #[test]
    fn absolute_time_is_memoized_on_order_and_row() {
        let song = song();
        let mut cache = PositionTimeCache::default();
        let src = TimeSources { position: Some((2, 0)), ..Default::default() };

        let first = compute_hms(TimeDisplay::Absolute, &src, &mut cache, &song);
        let second = compute_hms(TimeDisplay::Absolute, &src, &mut cache, &song);
        assert_eq!(first, second);
        assert_eq!(cache.computations(), 1);

        let moved = TimeSources { position: Some((2, 1)), ..src };
        compute_hms(TimeDisplay::Absolute, &moved, &mut cache, &song);
        assert_eq!(cache.computations(), 2);
        let other_order = TimeSources { position: Some((1, 1)), ..src };
        compute_hms(TimeDisplay::Absolute, &other_order, &mut cache, &song);
        assert_eq!(cache.computations(), 3);
    }

    #[test]
    fn absolute_time_of_an_unplaced_pattern_is_zero() {
        let mut cache = PositionTimeCache::default();
        let src = TimeSources { position: None, ..Default::default() };
        assert_eq!(compute_hms(TimeDisplay::Absolute, &src, &mut cache, &song()), Hms::default());
        assert_eq!(cache.computations(), 0);
    }

    #[test]
    fn play_off_hides_the_readout_only_while_stopped() {
        assert!(!time_visible(TimeDisplay::Off, true));
        assert!(!time_visible(TimeDisplay::PlayOff, false));
        assert!(time_visible(TimeDisplay::PlayOff, true));
        assert!(time_visible(TimeDisplay::Clock, false));
    }

    #[test]
    fn check_time_reports_changes_only() {
        let mut app = App::new(song(), Playback::new(1000));
        app.status.time_display = TimeDisplay::Clock;
        app.status.clock = Hms { h: 1, m: 2, s: 3 };
        assert!(check_time(&mut app));
        assert!(!check_time(&mut app));
        app.status.clock.s = 4;
        assert!(check_time(&mut app));
        assert_eq!(app.time.current, Hms { h: 1, m: 2, s: 4 });
    }

    #[test]
    fn playback_update_dirties_when_playback_starts() {
        let mut app = App::new(song(), Playback::new(1000));
        app.status.time_display = TimeDisplay::Off;
        playback_update(&mut app);
        app.status.take_update();

        playback_update(&mut app);
        assert!(!app.status.take_update());

        app.playback.start();
        playback_update(&mut app);
        assert!(app.status.take_update());
    }

    fn hybrid() -> impl Strategy<Value = (TimeDisplay, TimeDisplay, TimeDisplay)> {
        prop_oneof![
            Just((TimeDisplay::PlayElapsed, TimeDisplay::Playback, TimeDisplay::Elapsed)),
            Just((TimeDisplay::PlayClock, TimeDisplay::Playback, TimeDisplay::Clock)),
            Just((TimeDisplay::PlayOff, TimeDisplay::Playback, TimeDisplay::Off)),
        ]
    }

    proptest! {
        #[test]
        fn hybrid_matches_its_concrete_sibling(
            (mode, when_playing, when_stopped) in hybrid(),
            playing in any::<bool>(),
            playback_secs in 0u64..400_000,
            elapsed_secs in 0u64..400_000,
            h in 0u32..100, m in 0u32..60, s in 0u32..60,
        ) {
            let song = song();
            let src = TimeSources {
                playing,
                playback_secs,
                elapsed_secs,
                clock: Hms { h, m, s },
                position: Some((1, 5)),
            };
            let concrete = if playing { when_playing } else { when_stopped };
            prop_assert_eq!(resolve(mode, playing), concrete);

            let mut a = PositionTimeCache::default();
            let mut b = PositionTimeCache::default();
            prop_assert_eq!(
                compute_hms(mode, &src, &mut a, &song),
                compute_hms(concrete, &src, &mut b, &song)
            );
        }
    }
}
