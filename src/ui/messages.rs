use crate::models::status::DisplayStatus;
use crate::utils::colors::{RESET, paint};
use std::fmt;

/// ANSI styles
const BOLD: &str = "\x1b[1m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";

/// Icons
const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_BLUE, BOLD, ICON_INFO, RESET, msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_GREEN, BOLD, ICON_OK, RESET, msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_YELLOW, BOLD, ICON_WARN, RESET, msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}{}{} {}{}", FG_RED, BOLD, ICON_ERR, RESET, msg);
}

/// Formatted section header
pub fn header<T: fmt::Display>(msg: T) {
    println!("{}{}====================== {}\n{}", FG_BLUE, BOLD, msg, RESET);
}

/// Coloured status badge: `[Checked In]`.
pub fn badge(status: DisplayStatus) -> String {
    paint(&format!("[{}]", status.label()), status.color())
}

/// Result box shown after a user action, titled and followed by detail lines.
pub fn modal<T: fmt::Display>(ok: bool, title: &str, body: T) {
    let (color, icon) = if ok {
        (FG_GREEN, ICON_OK)
    } else {
        (FG_RED, ICON_ERR)
    };
    let rule = "─".repeat(40);
    println!("{color}{rule}{RESET}");
    println!("{color}{BOLD}{icon} {title}{RESET}");
    println!("{body}");
    println!("{color}{rule}{RESET}");
}
