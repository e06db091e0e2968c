//! Terminal presentation
//!
//! `compose_frame` turns a controller's screen buffer and HUD into plain text
//! lines; `TerminalSink` puts those lines on a crossterm terminal.

pub mod terminal;

pub use terminal::TerminalSink;

use crate::sim::{Controller, Engine, Hud};

/// Hint shown between runs
pub const MENU_HINT: &str = "Enter start · T tier · M mode · Q quit";

/// Build the full frame for one game: title, board or banner, HUD, footer.
pub fn compose_frame<E: Engine>(controller: &Controller<E>, footer: Option<&str>) -> Vec<String> {
    let kind = controller.engine().kind();
    let mut lines = vec![format!("== ASCII {} ({}) ==", kind.title(), controller.mode().as_str())];
    lines.extend(controller.screen().lines());
    lines.push(String::new());
    lines.extend(hud_lines(&controller.hud()));
    if let Some(footer) = footer {
        lines.push(String::new());
        lines.push(footer.to_string());
    }
    lines
}

pub fn hud_lines(hud: &Hud) -> Vec<String> {
    vec![
        format!("Status: {}   Time: {}s", hud.status.as_str(), hud.elapsed_secs),
        format!("Score: {}   Total: {}", hud.score_line, hud.total),
        format!("Difficulty: {}", hud.multiplier),
    ]
}
