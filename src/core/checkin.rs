//! Check-in code input rules and classification of the backend's
//! free-text check-in errors.
//!
//! The backend answers failures with prose only, so the classification is a
//! substring match. Keep the patterns in one place.

use crate::errors::{AppError, AppResult};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

pub const CODE_LEN: usize = 6;

static CODE_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{2}[0-9]{4}$").expect("static check-in code pattern")
});

static QUOTED_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[\s*'([^']+)'").expect("static quoted list pattern")
});

/// A code that passed the two-letters-four-digits format check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInCode(String);

impl CheckInCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CheckInCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Drop everything but ASCII letters and digits, uppercase the rest.
pub fn sanitize_code(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub fn validate_code(raw: &str) -> AppResult<CheckInCode> {
    let code = sanitize_code(raw);

    if code.len() != CODE_LEN {
        return Err(AppError::InvalidCheckInCode(
            "Check-in code must be 6 characters".to_string(),
        ));
    }

    if !CODE_FORMAT.is_match(&code) {
        return Err(AppError::InvalidCheckInCode(
            "Invalid format: First 2 must be letters, last 4 must be numbers".to_string(),
        ));
    }

    Ok(CheckInCode(code))
}

/// Why a check-in submission was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInFailure {
    ActivityEnded,
    NotStarted,
    AlreadyCheckedIn,
    InvalidCode,
    Other(String),
}

impl CheckInFailure {
    pub fn user_message(&self) -> String {
        match self {
            CheckInFailure::ActivityEnded => "This activity has already ended.".to_string(),
            CheckInFailure::NotStarted => "This activity has not started yet.".to_string(),
            CheckInFailure::AlreadyCheckedIn => {
                "You have already checked in to this activity.".to_string()
            }
            CheckInFailure::InvalidCode => {
                "Invalid check-in code. Please check the code and try again.".to_string()
            }
            CheckInFailure::Other(msg) => msg.clone(),
        }
    }
}

/// Order matters: "already ended" must win over the generic "already".
pub fn classify_error(message: &str) -> CheckInFailure {
    let lower = message.to_lowercase();

    if lower.contains("already ended") {
        CheckInFailure::ActivityEnded
    } else if lower.contains("not started") {
        CheckInFailure::NotStarted
    } else if lower.contains("already") {
        CheckInFailure::AlreadyCheckedIn
    } else if lower.contains("code") {
        CheckInFailure::InvalidCode
    } else {
        CheckInFailure::Other(clean_error_message(message))
    }
}

/// Map any error raised while checking in to what the student is told.
/// Transport failures collapse into one generic message.
pub fn failure_from_error(err: &AppError) -> CheckInFailure {
    match err {
        AppError::Api { message, .. } => classify_error(message),
        AppError::InvalidCheckInCode(msg) => CheckInFailure::Other(msg.clone()),
        _ => CheckInFailure::Other("Check-in failed. Please try again.".to_string()),
    }
}

/// The backend sometimes sends validation errors as a list literal:
/// `["msg"]` or `['msg']`. Unwrap the first element.
pub fn clean_error_message(message: &str) -> String {
    let trimmed = message.trim();
    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(trimmed) {
            if let Some(first) = items.into_iter().next() {
                return first;
            }
            return trimmed.to_string();
        }
        if let Some(caps) = QUOTED_LIST.captures(trimmed) {
            return caps[1].to_string();
        }
    }
    trimmed.to_string()
}

pub fn is_activity_status_error(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("already ended") || lower.contains("not started")
}
