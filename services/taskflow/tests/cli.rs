mod common;

use clap::Parser;
use common::{memory, PlainHasher};
use serde_json::Value;
use std::sync::Arc;
use taskflow_lib::cli::{run, Cli};
use taskflow_lib::error::AppError;
use taskflow_lib::state::AppState;

fn state() -> AppState {
    AppState::new(memory(), Arc::new(PlainHasher))
}

fn exec(state: &AppState, args: &[&str]) -> Result<Value, AppError> {
    let cli = Cli::try_parse_from(std::iter::once("taskflow").chain(args.iter().copied()))
        .unwrap_or_else(|e| panic!("{args:?}: {e}"));
    run(state, cli.command)
}

fn signed_in() -> AppState {
    let state = state();
    exec(
        &state,
        &["register", "--name", "Ada", "--email", "ada@example.com", "--password", "secret1"],
    )
    .unwrap();
    state
}

fn titles(value: &Value) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn record_commands_need_a_session() {
    let state = state();

    for args in [
        &["task", "list"][..],
        &["task", "add", "Anything"][..],
        &["task", "stats"][..],
        &["event", "list"][..],
        &["event", "month"][..],
        &["finance", "summary"][..],
    ] {
        assert!(
            matches!(exec(&state, args), Err(AppError::NotLoggedIn)),
            "{args:?}"
        );
    }
    assert_eq!(exec(&state, &["whoami"]).unwrap(), Value::Null);

    exec(
        &state,
        &["register", "--name", "Ada", "--email", "ada@example.com", "--password", "secret1"],
    )
    .unwrap();
    assert!(exec(&state, &["task", "list"]).is_ok());
    assert_eq!(exec(&state, &["whoami"]).unwrap()["email"], "ada@example.com");

    exec(&state, &["logout"]).unwrap();
    assert!(matches!(
        exec(&state, &["task", "list"]),
        Err(AppError::NotLoggedIn)
    ));

    exec(
        &state,
        &["login", "--email", "ada@example.com", "--password", "secret1"],
    )
    .unwrap();
    assert!(exec(&state, &["finance", "list"]).is_ok());
}

#[test]
fn list_narrows_by_column_and_search() {
    let state = signed_in();
    exec(&state, &["task", "add", "Write docs", "--status", "approval"]).unwrap();
    exec(&state, &["task", "add", "Docs review", "--status", "in-progress"]).unwrap();
    exec(&state, &["task", "add", "Fix login bug", "--status", "approval"]).unwrap();
    exec(
        &state,
        &["task", "add", "Plan sprint", "--description", "include DOCS budget"],
    )
    .unwrap();

    let listed = exec(
        &state,
        &["task", "list", "--column", "approval", "--search", "docs"],
    )
    .unwrap();
    assert_eq!(titles(&listed), ["Write docs"]);

    let listed = exec(
        &state,
        &["task", "list", "--search", "docs", "--sort", "title", "--order", "asc"],
    )
    .unwrap();
    assert_eq!(titles(&listed), ["Docs review", "Plan sprint", "Write docs"]);

    let listed = exec(&state, &["task", "list", "--status", "pending"]).unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 4);
}

#[test]
fn added_tasks_land_in_the_requested_column() {
    let state = signed_in();
    let task = exec(&state, &["task", "add", "Deploy", "--status", "in-progress"]).unwrap();
    assert_eq!(task["inProgress"], true);
    assert_eq!(task["completed"], false);

    let task = exec(&state, &["task", "add", "Plain"]).unwrap();
    assert_eq!(task["inProgress"], false);
    assert_eq!(task["approval"], false);
}

#[test]
fn stats_report_every_section() {
    let state = signed_in();
    let done = exec(&state, &["task", "add", "Done", "--priority", "high"]).unwrap();
    exec(&state, &["task", "toggle", done["id"].as_str().unwrap()]).unwrap();
    exec(&state, &["task", "add", "Late", "--priority", "low", "--due", "2000-01-01"]).unwrap();

    let stats = exec(&state, &["task", "stats"]).unwrap();
    for key in [
        "total",
        "completed",
        "pending",
        "overdue",
        "completionRate",
        "priorityStats",
        "columns",
        "overdueTasks",
    ] {
        assert!(stats.get(key).is_some(), "missing {key}");
    }
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["completionRate"], 50);
    assert_eq!(stats["priorityStats"]["low"], 1);
    assert!(stats["priorityStats"].get("high").is_none());
    assert_eq!(stats["columns"]["completed"], 1);
    assert_eq!(stats["columns"]["approval"], 0);
    assert_eq!(titles(&stats["overdueTasks"]), ["Late"]);
}

#[test]
fn archive_can_sort_by_title() {
    let state = signed_in();
    for title in ["walk dog", "Answer mail", "Still open"] {
        exec(&state, &["task", "add", title]).unwrap();
    }
    let listed = exec(&state, &["task", "list"]).unwrap();
    for task in listed.as_array().unwrap() {
        if task["title"] != "Still open" {
            exec(&state, &["task", "toggle", task["id"].as_str().unwrap()]).unwrap();
        }
    }

    let archived = exec(&state, &["task", "archive", "--sort", "title"]).unwrap();
    assert_eq!(titles(&archived), ["Answer mail", "walk dog"]);

    let archived = exec(&state, &["task", "archive", "--search", "mail"]).unwrap();
    assert_eq!(titles(&archived), ["Answer mail"]);
}

#[test]
fn month_view_rejects_bad_months() {
    let state = signed_in();

    for month in ["0", "13"] {
        assert!(matches!(
            exec(&state, &["event", "month", "--year", "2024", "--month", month]),
            Err(AppError::Parse(_))
        ));
    }
    assert!(matches!(
        exec(&state, &["event", "month", "--year", "200000000", "--month", "1"]),
        Err(AppError::Parse(_))
    ));
}

#[test]
fn month_view_counts_events_and_due_tasks() {
    let state = signed_in();
    exec(&state, &["event", "add", "Standup", "--date", "2024-09-02", "--time", "09:30"]).unwrap();
    exec(&state, &["task", "add", "Report", "--due", "2024-09-02"]).unwrap();

    let view = exec(
        &state,
        &["event", "month", "--year", "2024", "--month", "10", "--shift", "-1"],
    )
    .unwrap();
    assert_eq!(view["year"], 2024);
    assert_eq!(view["month"], 9);

    let cells = view["cells"].as_array().unwrap();
    // 1 September 2024 is a Sunday.
    assert_eq!(cells.len(), 6 + 30);
    assert!(cells[..6].iter().all(Value::is_null));
    let second = &cells[7];
    assert_eq!(second["date"], "2024-09-02");
    assert_eq!(second["events"], 1);
    assert_eq!(second["tasksDue"], 1);
    assert_eq!(cells[8]["events"], 0);
}

#[test]
fn finance_summary_totals_the_ledger() {
    let state = signed_in();
    exec(&state, &["finance", "add", "income", "1000", "salary", "Pay"]).unwrap();
    let lunch = exec(&state, &["finance", "add", "expense", "12.5", "food", "Lunch"]).unwrap();
    exec(
        &state,
        &["finance", "edit", lunch["id"].as_str().unwrap(), "expense", "20", "food", "Dinner"],
    )
    .unwrap();

    let summary = exec(&state, &["finance", "summary"]).unwrap();
    assert_eq!(summary["totalIncome"], 1000.0);
    assert_eq!(summary["totalExpenses"], 20.0);
    assert_eq!(summary["balance"], 980.0);
    assert_eq!(summary["expensesByCategory"]["food"], 20.0);
}
