//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `study_core` linkage, configuration and logging wiring.
//! - Run one deterministic create/update/list round on an in-memory store.

use std::process::ExitCode;
use study_core::{
    init_logging_with_config, now_epoch_ms, AssignmentService, CoreConfig,
    InMemoryAssignmentStore, NewAssignment, STATUS_IN_PROGRESS,
};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

fn main() -> ExitCode {
    let config = match CoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("study_cli config error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_logging_with_config(&config) {
        eprintln!("study_cli logging error: {err}");
        return ExitCode::FAILURE;
    }

    println!("study_core version={}", study_core::core_version());

    let service = AssignmentService::new(InMemoryAssignmentStore::new());
    let now = now_epoch_ms();
    let created = service.create_assignment(NewAssignment {
        title: Some("Write report".to_string()),
        course: Some("CS101".to_string()),
        due_date: Some(now + 7 * DAY_MS),
        priority: Some("high".to_string()),
        estimated_hours: Some(10),
        ..NewAssignment::default()
    });
    let created = match created {
        Ok(assignment) => assignment,
        Err(err) => {
            eprintln!("study_cli create failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    match service.update_assignment_status(created.id(), Some(STATUS_IN_PROGRESS)) {
        Ok(message) => println!("{message}"),
        Err(err) => {
            eprintln!("study_cli update failed: {err}");
            return ExitCode::FAILURE;
        }
    }

    for assignment in service.get_all_assignments() {
        println!("{assignment}");
    }
    let summary = service.get_assignment_summary();
    println!(
        "total={} todo={} in_progress={} completed={} overdue={} hours={}",
        summary.total,
        summary.todo,
        summary.in_progress,
        summary.completed,
        summary.overdue,
        summary.total_estimated_hours
    );
    log::info!("event=cli_smoke module=cli status=ok total={}", summary.total);

    ExitCode::SUCCESS
}
