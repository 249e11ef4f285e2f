// Main menu overlay. Escape opens it; while it is up (dialog_type MENU) it
// eats every event. Submenus stack on top of the main menu.

use crate::shared::{KeyEvent, KeySym, PageId};
use crate::status::DialogType;
use crate::tui::grid::{BoxStyle, CellGrid};

use super::app::App;
use super::{global, prompts};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuId {
    Main,
    File,
    Playback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MenuAction {
    Open(MenuId),
    Page(PageId),
    InstrumentList,
    NewSong,
    Save,
    Quit,
    PlaySong,
    PlayPattern,
    PlayOrder,
    PlayMark,
    Stop,
    SongLength,
}

struct MenuDef {
    title: &'static str,
    x: u16,
    y: u16,
    w: u16,
    items: &'static [(&'static str, MenuAction)],
}

const MAIN_MENU: MenuDef = MenuDef {
    title: " Main Menu",
    x: 6,
    y: 11,
    w: 29,
    items: &[
        ("File Menu...", MenuAction::Open(MenuId::File)),
        ("Playback Menu...", MenuAction::Open(MenuId::Playback)),
        ("View Patterns        (F2)", MenuAction::Page(PageId::PatternEditor)),
        ("View Samples         (F3)", MenuAction::Page(PageId::SampleList)),
        ("View Instruments     (F4)", MenuAction::InstrumentList),
        ("Info Page            (F5)", MenuAction::Page(PageId::Info)),
        ("View Orders/Panning (F11)", MenuAction::Page(PageId::OrderListPanning)),
        ("View Variables      (F12)", MenuAction::Page(PageId::SongVariables)),
        ("Message Editor (Shift-F9)", MenuAction::Page(PageId::Message)),
        ("Preferences    (Shift-F5)", MenuAction::Page(PageId::Preferences)),
        ("Message Log   (Ctrl-F11)", MenuAction::Page(PageId::Log)),
    ],
};

const FILE_MENU: MenuDef = MenuDef {
    title: " File Menu",
    x: 25,
    y: 13,
    w: 26,
    items: &[
        ("Load...           (F9)", MenuAction::Page(PageId::LoadModule)),
        ("New...        (Ctrl-N)", MenuAction::NewSong),
        ("Save Current  (Ctrl-S)", MenuAction::Save),
        ("Save As...       (F10)", MenuAction::Page(PageId::SaveModule)),
        ("Quit          (Ctrl-Q)", MenuAction::Quit),
    ],
};

const PLAYBACK_MENU: MenuDef = MenuDef {
    title: " Playback Menu",
    x: 25,
    y: 13,
    w: 30,
    items: &[
        ("Play Song             (F5)", MenuAction::PlaySong),
        ("Play Pattern          (F6)", MenuAction::PlayPattern),
        ("Play from Order (Shift-F6)", MenuAction::PlayOrder),
        ("Play from Mark        (F7)", MenuAction::PlayMark),
        ("Stop                  (F8)", MenuAction::Stop),
        ("Calculate Length (Ctrl-P)", MenuAction::SongLength),
    ],
};

fn def(id: MenuId) -> &'static MenuDef {
    match id {
        MenuId::Main => &MAIN_MENU,
        MenuId::File => &FILE_MENU,
        MenuId::Playback => &PLAYBACK_MENU,
    }
}

#[derive(Clone, Debug, Default)]
pub struct Menu {
    // open menus bottom to top, each with its highlighted item
    stack: Vec<(MenuId, usize)>,
}

impl Menu {
    pub fn top(&self) -> Option<MenuId> {
        self.stack.last().map(|&(id, _)| id)
    }

    pub fn selected(&self) -> Option<usize> {
        self.stack.last().map(|&(_, sel)| sel)
    }
}

pub fn menu_show(app: &mut App) {
    app.menu.stack = vec![(MenuId::Main, 0)];
    app.status.dialog_type = DialogType::MENU;
    app.status.need_update();
}

pub fn menu_hide(app: &mut App) {
    app.menu.stack.clear();
    app.status.dialog_type.remove(DialogType::MENU);
    app.status.need_update();
}

// consumes everything while the menu is up
pub fn menu_handle_key(app: &mut App, k: &KeyEvent) -> bool {
    if !app.status.dialog_type.contains(DialogType::MENU) {
        return false;
    }
    if k.is_mouse() || !k.pressed() {
        return true;
    }
    let Some((id, sel)) = app.menu.stack.last().copied() else {
        menu_hide(app);
        return true;
    };
    let count = def(id).items.len();
    let new_sel = match k.sym {
        KeySym::Escape => {
            app.menu.stack.pop();
            if app.menu.stack.is_empty() {
                menu_hide(app);
            }
            app.status.need_update();
            return true;
        }
        KeySym::Up => sel.checked_sub(1).unwrap_or(count - 1),
        KeySym::Down => (sel + 1) % count,
        KeySym::Home => 0,
        KeySym::End => count - 1,
        KeySym::Enter => {
            activate(app, def(id).items[sel].1);
            return true;
        }
        _ => return true,
    };
    if let Some(top) = app.menu.stack.last_mut() {
        top.1 = new_sel;
    }
    app.status.need_update();
    true
}

fn activate(app: &mut App, action: MenuAction) {
    if let MenuAction::Open(sub) = action {
        app.menu.stack.push((sub, 0));
        app.status.need_update();
        return;
    }
    menu_hide(app);
    log::debug!("menu action {action:?}");
    match action {
        MenuAction::Open(_) => {}
        MenuAction::Page(page) => app.set_page(page),
        MenuAction::InstrumentList => app.set_page(app.last_instrument_page),
        MenuAction::NewSong => prompts::new_song_dialog(app),
        MenuAction::Save => prompts::save_song_or_save_as(app),
        MenuAction::Quit => prompts::show_exit_prompt(app),
        MenuAction::PlaySong => global::play_song(app),
        MenuAction::PlayPattern => global::play_pattern(app),
        MenuAction::PlayOrder => global::play_from_order(app),
        MenuAction::PlayMark => global::play_from_mark(app),
        MenuAction::Stop => global::stop(app),
        MenuAction::SongLength => prompts::show_song_length(app),
    }
}

pub fn menu_draw(app: &App, grid: &mut CellGrid) {
    for (depth, &(id, sel)) in app.menu.stack.iter().enumerate() {
        let top = depth + 1 == app.menu.stack.len();
        let m = def(id);
        let h = m.items.len() as u16 * 3 + 4;
        let (x2, y2) = (m.x + m.w - 1, m.y + h - 1);

        grid.draw_fill_chars(m.x + 1, m.y + 1, x2 - 1, y2 - 1, 2);
        grid.draw_box(m.x, m.y, x2, y2, BoxStyle::ThickOutset);
        grid.draw_text(m.title, m.x + 6, m.y + 2, 3, 2);

        for (i, (label, _)) in m.items.iter().enumerate() {
            let y = m.y + 4 + i as u16 * 3;
            let active = i == sel;
            let fg = if active && top { 3 } else { 0 };
            let style = if active { BoxStyle::ThinInset } else { BoxStyle::ThinOutset };
            grid.draw_box(m.x + 2, y - 1, x2 - 2, y + 1, style);
            grid.draw_text(label, m.x + 3, y, fg, 2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Playback;
    use crate::pipeline::song::Song;

    fn app() -> App {
        App::new(Song::default(), Playback::new(1000))
    }

    #[test]
    fn menu_eats_keys_and_escape_closes_it() {
        let mut app = app();
        menu_show(&mut app);
        assert!(menu_handle_key(&mut app, &KeyEvent::press(KeySym::Char('q'))));
        assert!(menu_handle_key(&mut app, &KeyEvent::press(KeySym::Escape)));
        assert!(app.status.dialog_type.is_none());
        assert!(!menu_handle_key(&mut app, &KeyEvent::press(KeySym::Down)));
    }

    #[test]
    fn selection_wraps() {
        let mut app = app();
        menu_show(&mut app);
        menu_handle_key(&mut app, &KeyEvent::press(KeySym::Up));
        assert_eq!(app.menu.selected(), Some(MAIN_MENU.items.len() - 1));
        menu_handle_key(&mut app, &KeyEvent::press(KeySym::Down));
        assert_eq!(app.menu.selected(), Some(0));
    }

    #[test]
    fn submenu_escape_returns_to_main() {
        let mut app = app();
        menu_show(&mut app);
        menu_handle_key(&mut app, &KeyEvent::press(KeySym::Enter));
        assert_eq!(app.menu.top(), Some(MenuId::File));
        menu_handle_key(&mut app, &KeyEvent::press(KeySym::Escape));
        assert_eq!(app.menu.top(), Some(MenuId::Main));
        assert!(app.status.dialog_type.contains(DialogType::MENU));
    }

    #[test]
    fn page_item_switches_page_and_closes_the_menu() {
        let mut app = app();
        menu_show(&mut app);
        for _ in 0..3 {
            menu_handle_key(&mut app, &KeyEvent::press(KeySym::Down));
        }
        menu_handle_key(&mut app, &KeyEvent::press(KeySym::Enter));
        assert_eq!(app.status.current_page, PageId::SampleList);
        assert!(app.status.dialog_type.is_none());
    }
}
