// The ui core: page registry, key dispatch, global shortcuts, dialogs and
// the redraw orchestrator. Nothing in here touches the terminal; the event
// loop in main.rs feeds it KeyEvents and hands it a CellGrid to paint.

pub mod app;
pub mod charset;
pub mod compose;
pub mod dialog;
pub mod dispatch;
pub mod global;
pub mod menu;
pub mod minipop;
pub mod page;
pub mod pages;
pub mod prompts;
pub mod redraw;
pub mod time;
pub mod widget;

#[cfg(test)]
mod tests;
