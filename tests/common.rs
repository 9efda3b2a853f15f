#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Activity 1 is ongoing at this instant (09:00-12:00 UTC).
pub const NOW: &str = "2025-03-01T10:00:00Z";
pub const AFTER_END: &str = "2025-03-01T13:00:00Z";

pub fn rvo() -> Command {
    cargo_bin_cmd!("rvolunteer")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rvolunteer.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub const SNAPSHOT: &str = r#"{
  "student": { "id": 7, "name": "Somchai Dee", "email": "somchai@uni.test" },
  "activities": [
    {
      "id": 1,
      "title": "Beach Cleanup",
      "description": "Collect litter along the north shore.",
      "location": "North Beach",
      "start_at": "2025-03-01T09:00:00Z",
      "end_at": "2025-03-01T12:00:00Z",
      "max_participants": 10,
      "current_participants": 2,
      "status": "open",
      "organizer_name": "Green Club",
      "organizer_email": "green@uni.test",
      "hours_awarded": 3.0
    },
    {
      "id": 2,
      "title": "Tree Planting",
      "location": "Campus Park",
      "start_at": "2025-03-05T09:00:00Z",
      "end_at": "2025-03-05T12:00:00Z",
      "max_participants": 20,
      "current_participants": 0,
      "status": "open"
    },
    {
      "id": 3,
      "title": "Food Bank",
      "start_at": "2025-03-08T09:00:00Z",
      "end_at": "2025-03-08T12:00:00Z",
      "max_participants": 5,
      "current_participants": 5,
      "capacity_reached": true,
      "status": "full"
    }
  ],
  "applications": [
    { "id": 1, "activity": 1, "activity_title": "Beach Cleanup", "studentid": 7,
      "student_name": "Somchai Dee", "student_email": "somchai@uni.test", "status": "approved" },
    { "id": 2, "activity": 1, "activity_title": "Beach Cleanup", "studentid": 8,
      "student_name": "Nok Ariya", "student_email": "nok@uni.test", "status": "approved" },
    { "id": 3, "activity": 1, "activity_title": "Beach Cleanup", "studentid": 9,
      "student_name": "Pim Lee", "student_email": "pim@uni.test", "status": "pending" },
    { "id": 4, "activity": 2, "activity_title": "Tree Planting", "studentid": 8,
      "student_name": "Nok Ariya", "student_email": "nok@uni.test", "status": "pending" }
  ],
  "checkins": [
    { "id": 1, "student": 8, "student_name": "Nok Ariya", "student_email": "nok@uni.test",
      "activity": 1, "attendance_status": "present", "checked_in_at": "2025-03-01T09:15:00Z" }
  ],
  "checkin_codes": { "1": "AB1234" }
}"#;

/// Snapshot file, log database and (absent) config file for one test.
pub struct Fixture {
    pub snapshot: String,
    pub db: String,
    pub config: String,
}

impl Fixture {
    pub fn new(name: &str) -> Self {
        let snapshot = temp_out(&format!("{name}_snapshot"), "json");
        fs::write(&snapshot, SNAPSHOT).expect("write snapshot");
        let config = temp_out(&format!("{name}_config"), "conf");

        Self {
            snapshot,
            db: setup_test_db(name),
            config,
        }
    }

    /// Command bound to this fixture, acting at [`NOW`].
    pub fn cmd(&self) -> Command {
        self.cmd_at(NOW)
    }

    pub fn cmd_at(&self, now: &str) -> Command {
        let mut cmd = rvo();
        cmd.env_remove("RVOLUNTEER_TOKEN")
            .env_remove("RVOLUNTEER_API_URL")
            .args([
                "--config",
                &self.config,
                "--db",
                &self.db,
                "--snapshot",
                &self.snapshot,
                "--now",
                now,
            ]);
        cmd
    }

    pub fn snapshot_json(&self) -> serde_json::Value {
        let content = fs::read_to_string(&self.snapshot).expect("read snapshot");
        serde_json::from_str(&content).expect("parse snapshot")
    }
}
