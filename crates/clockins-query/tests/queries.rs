// Reporting queries against an in-memory shift table.

use std::sync::Arc;

use clockins_core::config::ShiftsConfig;
use clockins_core::{ManualClock, MS_PER_DAY};
use clockins_query::{ClockinEntry, JobHours, JobTotal, LeaderboardEntry, QueryService};
use clockins_store::ShiftStore;

const NOW: i64 = 1_750_000_000_000;
const HOUR: i64 = 60 * 60 * 1000;
const MIN: i64 = 60 * 1000;

fn setup() -> (ShiftStore, QueryService) {
    let store = ShiftStore::new(rusqlite::Connection::open_in_memory().unwrap(), "clockins").unwrap();
    let clock = Arc::new(ManualClock::new(NOW));
    let shifts = ShiftsConfig::default(); // 30 s minimum
    let queries = QueryService::new(store.connection(), store.table(), &shifts, clock).unwrap();
    (store, queries)
}

fn insert_closed(store: &ShiftStore, identifier: &str, job: &str, clockin: i64, total: i64) {
    let conn = store.connection();
    let conn = conn.lock().unwrap();
    conn.execute(
        "INSERT INTO clockins (identifier, job, clockin, clockout, total) VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![identifier, job, clockin, clockin + total, total],
    )
    .unwrap();
}

#[test]
fn hours_grouped_by_job_skip_open_and_old_shifts() {
    let (store, queries) = setup();
    insert_closed(&store, "A", "police", NOW - 2 * HOUR, 30 * MIN);
    insert_closed(&store, "A", "police", NOW - 3 * HOUR, 15 * MIN);
    insert_closed(&store, "A", "tow", NOW - 4 * HOUR, 10 * MIN);
    insert_closed(&store, "A", "police", NOW - 8 * MS_PER_DAY, 5 * HOUR);
    insert_closed(&store, "B", "police", NOW - HOUR, 20 * MIN);
    store.apply_transition("A", Some("police"), NOW - MIN).unwrap();

    let hours = queries.get_player_hours("A", None).unwrap();
    assert_eq!(
        hours,
        vec![
            JobHours { job: "police".into(), total_time: 45 * MIN },
            JobHours { job: "tow".into(), total_time: 10 * MIN },
        ]
    );

    // widening the window pulls in the 8-day-old shift
    let hours = queries.get_player_hours("A", Some(10)).unwrap();
    assert_eq!(hours[0].total_time, 45 * MIN + 5 * HOUR);
}

#[test]
fn seven_day_window_excludes_old_and_keeps_recent() {
    let (store, queries) = setup();
    insert_closed(&store, "A", "police", NOW - 7 * MS_PER_DAY - 1, HOUR);
    insert_closed(&store, "A", "police", NOW - HOUR, 40 * MIN);

    let history = queries.get_player_clockins("A", "police", Some(7), Some(10)).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].start_time, NOW - HOUR);
}

#[test]
fn clockins_drop_short_shifts_and_sort_newest_first() {
    let (store, queries) = setup();
    insert_closed(&store, "A", "police", NOW - 3 * HOUR, 20 * MIN);
    insert_closed(&store, "A", "police", NOW - 2 * HOUR, 5_000); // below the 30 s minimum
    insert_closed(&store, "A", "police", NOW - HOUR, 30_000); // equal to minimum, not above it
    insert_closed(&store, "A", "police", NOW - 30 * MIN, 10 * MIN);
    insert_closed(&store, "A", "tow", NOW - 10 * MIN, 5 * MIN);

    let history = queries.get_player_clockins("A", "police", Some(7), Some(10)).unwrap();
    assert_eq!(
        history,
        vec![
            ClockinEntry { job: "police".into(), start_time: NOW - 30 * MIN, total_time: 10 * MIN },
            ClockinEntry { job: "police".into(), start_time: NOW - 3 * HOUR, total_time: 20 * MIN },
        ]
    );

    let limited = queries.get_player_clockins("A", "police", None, Some(1)).unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].start_time, NOW - 30 * MIN);
}

#[test]
fn department_leaderboard_ranks_ties_like_sql_rank() {
    let (store, queries) = setup();
    insert_closed(&store, "A", "police", NOW - HOUR, 60 * MIN);
    insert_closed(&store, "A", "police", NOW - 2 * HOUR, 40 * MIN);
    insert_closed(&store, "B", "police", NOW - HOUR, 100 * MIN);
    insert_closed(&store, "C", "police", NOW - HOUR, 50 * MIN);
    insert_closed(&store, "D", "police", NOW - HOUR, 10 * MIN);
    insert_closed(&store, "E", "tow", NOW - HOUR, 500 * MIN);

    let board = queries.get_department_clockin_leaderboard("police", Some(7), Some(10)).unwrap();
    assert_eq!(
        board,
        vec![
            LeaderboardEntry { identifier: "A".into(), total_time: 100 * MIN, rank: 1 },
            LeaderboardEntry { identifier: "B".into(), total_time: 100 * MIN, rank: 1 },
            LeaderboardEntry { identifier: "C".into(), total_time: 50 * MIN, rank: 3 },
            LeaderboardEntry { identifier: "D".into(), total_time: 10 * MIN, rank: 4 },
        ]
    );

    let top = queries.get_department_clockin_leaderboard("police", None, Some(3)).unwrap();
    assert_eq!(top.len(), 3);
    assert_eq!(top[2].rank, 3);
}

#[test]
fn global_leaderboard_orders_jobs_by_total() {
    let (store, queries) = setup();
    insert_closed(&store, "A", "police", NOW - HOUR, 30 * MIN);
    insert_closed(&store, "B", "tow", NOW - HOUR, 90 * MIN);
    insert_closed(&store, "C", "police", NOW - HOUR, 20 * MIN);
    insert_closed(&store, "D", "mechanic", NOW - 9 * MS_PER_DAY, 900 * MIN);

    let board = queries.get_global_clockin_leaderboard(None).unwrap();
    assert_eq!(
        board,
        vec![
            JobTotal { job: "tow".into(), total_time: 90 * MIN },
            JobTotal { job: "police".into(), total_time: 50 * MIN },
        ]
    );
}

#[test]
fn missing_arguments_yield_empty_results() {
    let (store, queries) = setup();
    insert_closed(&store, "A", "police", NOW - HOUR, 30 * MIN);

    assert!(queries.get_player_hours("", None).unwrap().is_empty());
    assert!(queries.get_player_clockins("A", "", None, None).unwrap().is_empty());
    assert!(queries.get_player_clockins("", "police", None, None).unwrap().is_empty());
    assert!(queries.get_department_clockin_leaderboard("  ", None, None).unwrap().is_empty());
}

#[test]
fn zero_days_falls_back_to_default_window() {
    let (store, queries) = setup();
    insert_closed(&store, "A", "police", NOW - 3 * MS_PER_DAY, 30 * MIN);

    let hours = queries.get_player_hours("A", Some(0)).unwrap();
    assert_eq!(hours.len(), 1);
}

#[test]
fn tracked_department_check_uses_config_list() {
    let (_store, queries) = setup();
    assert!(queries.is_department_clocked("police"));
    assert!(queries.is_department_clocked("unemployed"));
    assert!(!queries.is_department_clocked("ambulance"));
    assert!(!queries.is_department_clocked(""));
}

#[test]
fn leaderboard_rows_serialize_with_camel_case_keys() {
    let entry = LeaderboardEntry { identifier: "A".into(), total_time: 5, rank: 1 };
    let json = serde_json::to_string(&entry).unwrap();
    assert!(json.contains(r#""totalTime":5"#));
    assert!(json.contains(r#""rank":1"#));
}
