use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Who is looking at an activity. Drives which control is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Organizer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Organizer => "organizer",
            Role::Admin => "admin",
        }
    }

    pub fn is_student(&self) -> bool {
        matches!(self, Role::Student)
    }

    pub fn is_organizer(&self) -> bool {
        matches!(self, Role::Organizer)
    }
}
