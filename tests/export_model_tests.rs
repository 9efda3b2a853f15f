use chrono::{TimeZone, Utc};
use rvolunteer::core::log::LogLogic;
use rvolunteer::db::log::oplog;
use rvolunteer::db::pool::DbPool;
use rvolunteer::export::build_rows;
use rvolunteer::models::activity::Activity;
use rvolunteer::models::application::{Application, ApplicationStatus};
use rvolunteer::models::checkin::{AttendanceStatus, CheckInRecord};

fn app(id: i64, student: i64, status: ApplicationStatus) -> Application {
    Application {
        id,
        activity: Some(1),
        studentid: student,
        student_name: Some(format!("Student {student}")),
        status,
        ..Default::default()
    }
}

#[test]
fn test_rows_match_approved_applications() {
    let activity = Activity {
        id: 1,
        start_at: Some(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()),
        end_at: Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()),
        ..Default::default()
    };
    let applications = vec![
        app(1, 7, ApplicationStatus::Approved),
        app(2, 8, ApplicationStatus::Approved),
        app(3, 9, ApplicationStatus::Pending),
        app(4, 10, ApplicationStatus::Rejected),
        Application {
            activity: Some(2),
            ..app(5, 11, ApplicationStatus::Approved)
        },
    ];
    let checkins = vec![CheckInRecord {
        id: 1,
        student: 8,
        activity: 1,
        attendance_status: AttendanceStatus::Present,
        checked_in_at: Some(Utc.with_ymd_and_hms(2025, 3, 1, 9, 10, 0).unwrap()),
        ..Default::default()
    }];

    let after_end = Utc.with_ymd_and_hms(2025, 3, 1, 15, 0, 0).unwrap();
    let rows = build_rows(&activity, &applications, &checkins, after_end);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].student_id, 7);
    assert_eq!(rows[0].attendance, "Absent");
    assert_eq!(rows[0].checked_in_at, "");
    assert_eq!(rows[1].student_id, 8);
    assert_eq!(rows[1].attendance, "Checked In");
    assert_eq!(rows[1].application_status, "approved");
    assert!(rows[1].checked_in_at.starts_with("2025-03-01T09:10:00"));
}

#[test]
fn test_oplog_entries_in_order() {
    let pool = DbPool::in_memory().expect("in-memory db");
    oplog(&pool.conn, "apply", "2", "Applied to 'Tree Planting'").unwrap();
    oplog(&pool.conn, "checkin", "1", "Checked in").unwrap();

    let entries = LogLogic::entries(&pool).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].operation, "apply");
    assert_eq!(entries[0].target, "2");
    assert_eq!(entries[1].message, "Checked in");
}

#[test]
fn test_mark_read_is_idempotent() {
    use rvolunteer::db::notifications::{mark_read, read_ids};

    let pool = DbPool::in_memory().expect("in-memory db");
    let ids = vec!["app-approved-1".to_string(), "app-rejected-2".to_string()];

    assert_eq!(mark_read(&pool.conn, &ids).unwrap(), 2);
    assert_eq!(mark_read(&pool.conn, &ids[..1]).unwrap(), 0);

    let read = read_ids(&pool.conn).unwrap();
    assert_eq!(read.len(), 2);
    assert!(read.contains("app-rejected-2"));
}
