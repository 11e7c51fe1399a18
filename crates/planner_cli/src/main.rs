//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `planner_core` wiring end to
//!   end: local store, service toasts and upcoming agenda.
//! - Keep output deterministic enough for quick local sanity checks.

use chrono::Local;
use planner_core::db::{open_db, open_db_in_memory};
use planner_core::{ActivityDraft, ActivityType, PlannerService, SqliteActivityStore, ToastQueue};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("planner_core version={}", planner_core::core_version());

    let conn = match std::env::args().nth(1) {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    };
    let conn = match conn {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("cannot open planner database: {err}");
            return ExitCode::FAILURE;
        }
    };

    let service = PlannerService::new(SqliteActivityStore::new(conn), ToastQueue::new());

    let today = Local::now().format("%Y-%m-%d").to_string();
    let mut draft = ActivityDraft::new(&today, "Smoke-test study block");
    draft.kind = ActivityType::Study;
    draft.time = "23:59".to_string();
    if let Err(err) = service.create_activity(&draft) {
        eprintln!("create failed: {err}");
        return ExitCode::FAILURE;
    }

    match service.upcoming(Local::now(), 5) {
        Ok(upcoming) => {
            println!("upcoming activities: {}", upcoming.len());
            for activity in upcoming {
                println!(
                    "  {} {} [{}] {}",
                    activity.date,
                    activity.time,
                    activity.kind.as_str(),
                    activity.title
                );
            }
        }
        Err(err) => {
            eprintln!("agenda query failed: {err}");
            return ExitCode::FAILURE;
        }
    }

    for toast in service.toasts().active_now() {
        println!("toast: {}", toast.message);
    }
    ExitCode::SUCCESS
}
