//! Who is calling and with which credentials. Built once at startup and
//! handed to the API implementation; nothing else reads the token.

use crate::models::role::Role;

#[derive(Debug, Clone)]
pub struct Session {
    pub base_url: String,
    token: Option<String>,
    pub role: Role,
    pub student_id: Option<i64>,
}

impl Session {
    pub fn new(base_url: &str, token: Option<String>, role: Role, student_id: Option<i64>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            role,
            student_id,
        }
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
