use studydeck_lib::flashcards::{Progress, SessionSummary};

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap `text` in `color` when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// "[3/12]" style counter for the card being shown
pub fn render_progress(progress: Progress, use_color: bool) -> String {
    let counter = format!("[{}/{}]", progress.position + 1, progress.length);
    paint(&counter, Color::GRAY, use_color)
}

pub fn render_summary(summary: &SessionSummary, use_color: bool) -> String {
    let mut lines = Vec::new();

    let title = if summary.finished {
        "Session complete"
    } else {
        "Session ended"
    };
    lines.push(paint(title, Color::BOLD, use_color));
    lines.push(format!(
        "  {} reviews of {} cards",
        summary.reviews, summary.unique_cards
    ));

    let again = format!("  {} again", summary.again_count);
    let again_color = if summary.again_count > 0 { Color::YELLOW } else { Color::GREEN };
    lines.push(paint(&again, again_color, use_color));
    lines.push(format!("  {:.0}% recalled", summary.accuracy() * 100.0));

    lines.join("\n")
}
