use crate::models::role::Role;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for rvolunteer
#[derive(Parser)]
#[command(
    name = "rvolunteer",
    version = env!("CARGO_PKG_VERSION"),
    about = "Volunteer activities from the terminal: apply, check in, watch attendance and export it",
    long_about = None
)]
pub struct Cli {
    /// Use this configuration file instead of ~/.rvolunteer/rvolunteer.conf
    #[arg(global = true, long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the operation-log database path
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the backend base URL
    #[arg(global = true, long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Bearer token for this invocation
    #[arg(global = true, long = "token")]
    pub token: Option<String>,

    /// Act as this role
    #[arg(global = true, long = "role", value_enum)]
    pub role: Option<Role>,

    /// Student id of the caller (needed by offline snapshots)
    #[arg(global = true, long = "student-id")]
    pub student_id: Option<i64>,

    /// Serve every request from a JSON snapshot file instead of the backend
    #[arg(global = true, long = "snapshot", value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Pretend the current time is this RFC 3339 timestamp
    #[arg(global = true, long = "now", value_name = "TIMESTAMP")]
    pub now: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration and the operation log
    Init,

    /// View or update the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "set-token",
            value_name = "TOKEN",
            help = "Store a bearer token in the configuration file"
        )]
        set_token: Option<String>,
    },

    /// Print the internal operation log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Show an activity with your status and the available action
    Show {
        /// Activity id
        id: i64,
    },

    /// Apply to an activity
    Apply {
        /// Activity id
        id: i64,
    },

    /// Cancel your application to an activity
    Cancel {
        /// Activity id
        id: i64,
    },

    /// Check in to an ongoing activity with the organizer's code
    Checkin {
        /// Activity id
        id: i64,

        /// Six-character code, e.g. AB1234
        code: String,
    },

    /// Show today's check-in code (organizers)
    Code {
        /// Activity id
        id: i64,
    },

    /// List applications with their attendance status (organizers)
    Applicants {
        /// Activity id
        id: i64,
    },

    /// Approve or reject an application (organizers)
    #[command(group(
        ArgGroup::new("decision")
            .required(true)
            .args(["approve", "reject"])
    ))]
    Review {
        /// Application id
        application_id: i64,

        #[arg(long)]
        approve: bool,

        #[arg(long)]
        reject: bool,

        /// Reason shown to the student (required when rejecting)
        #[arg(long)]
        reason: Option<String>,
    },

    /// Keep your status up to date and print every change
    Watch {
        /// Activity id
        id: i64,

        /// Poll period in seconds (defaults to the configured periods)
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,

        /// Exit after the first status is known
        #[arg(long)]
        once: bool,
    },

    /// List your notifications, or keep their count up to date
    Notifications {
        /// Mark every listed notification as read
        #[arg(long = "mark-read", conflicts_with = "watch")]
        mark_read: bool,

        /// Poll and print the unread and new counts on every change
        #[arg(long)]
        watch: bool,

        /// Poll period in seconds (defaults to the configured period)
        #[arg(long, value_name = "SECS", requires = "watch")]
        interval: Option<u64>,

        /// Exit after the first count is known
        #[arg(long, requires = "watch")]
        once: bool,
    },

    /// Export the attendance of an activity as CSV
    Export {
        /// Activity id
        id: i64,

        /// Output file path (absolute path required)
        #[arg(long, value_name = "FILE")]
        file: String,

        /// Overwrite output file without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },
}
