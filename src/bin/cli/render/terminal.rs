use kelime_lib::clock::{format_timestamp, Timestamp};
use kelime_lib::srs::algorithm::format_interval;
use kelime_lib::{ReviewRecord, VocabularyItem};

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

/// Wrap text in a color when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Front side of a card with progress, e.g. `[3/20] abandon`
pub fn render_front(item: &VocabularyItem, position: usize, total: usize, flagged: bool, use_color: bool) -> String {
    let progress = paint(&format!("[{}/{}]", position, total), Color::GRAY, use_color);
    let word = paint(&item.front, Color::BOLD, use_color);
    if flagged {
        format!("{} {} {}", progress, word, paint("(struggling)", Color::RED, use_color))
    } else {
        format!("{} {}", progress, word)
    }
}

pub fn render_back(item: &VocabularyItem, use_color: bool) -> String {
    format!("    {}", paint(&item.back, Color::CYAN, use_color))
}

/// When a record comes due, relative to `now`
pub fn render_schedule(record: &ReviewRecord, now: Timestamp) -> String {
    let wait = record.next_review_at - now;
    if wait <= 0 {
        "due now".to_string()
    } else {
        format!(
            "level {}, due in {} ({})",
            record.level,
            format_interval(wait),
            format_timestamp(record.next_review_at)
        )
    }
}
