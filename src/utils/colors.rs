//! ANSI color helper utilities for terminal output.
use regex::Regex;
use std::sync::LazyLock;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";

static ANSI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("static ANSI pattern"));

/// Text as the terminal shows it, escape codes removed.
pub fn strip_ansi(s: &str) -> String {
    ANSI_RE.replace_all(s, "").into_owned()
}

/// Wrap `value` in `color`, resetting afterwards.
pub fn paint(value: &str, color: &str) -> String {
    format!("{color}{value}{RESET}")
}

/// Disabled controls are greyed out; enabled ones are green.
pub fn color_for_enabled(enabled: bool) -> &'static str {
    if enabled { GREEN } else { GREY }
}

/// Returns GREY for empty placeholders ("", "-", "--:--") and RESET otherwise.
pub fn colorize_optional(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() || v == "-" || v == "--:--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
