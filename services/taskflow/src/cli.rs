//! services/taskflow/src/cli.rs
//!
//! The command-line surface: argument definitions and the dispatch from a parsed
//! command to the stores. Every command produces a JSON value.

use crate::adapters::records::{
    parse_time, EventRecord, SessionUserRecord, TaskRecord, TransactionRecord,
};
use crate::error::AppError;
use crate::state::AppState;
use chrono::{Datelike, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use taskflow_core::domain::{
    Category, NewEvent, NewTask, NewTransaction, ParseError, Priority, SessionUser, Task,
    TaskPatch, TaskStatus, TransactionKind,
};
use taskflow_core::tasks::{
    archive_order, filter_tasks, search_tasks, sort_tasks, task_stats, tasks_in_status,
    ArchiveSort, SortKey, SortOrder, StatusFilter, TaskFilter,
};
use taskflow_core::{calendar, finance};

//=========================================================================================
// CLI arguments
//=========================================================================================

#[derive(Parser, Debug)]
#[command(version, about = "Personal tasks, calendar and finances")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account and sign in.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "TASKFLOW_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign in to an existing account.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TASKFLOW_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out.
    Logout,
    /// Show the signed-in user.
    Whoami,
    #[command(subcommand)]
    Task(TaskCommand),
    #[command(subcommand)]
    Event(EventCommand),
    #[command(subcommand)]
    Finance(FinanceCommand),
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Due date, YYYY-MM-DD.
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Kanban column to create the task in.
        #[arg(long, default_value = "pending")]
        status: TaskStatus,
    },
    List(TaskListArgs),
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,
        #[arg(long)]
        clear_due: bool,
    },
    /// Move a task to pending, approval, in-progress or completed.
    Move { id: String, status: TaskStatus },
    Toggle { id: String },
    Delete { id: String },
    Stats,
    /// Completed tasks, most recently finished first.
    Archive {
        #[arg(long)]
        search: Option<String>,
        /// completedAt, createdAt or title.
        #[arg(long, default_value = "completedAt")]
        sort: ArchiveSort,
    },
}

#[derive(Args, Debug)]
pub struct TaskListArgs {
    /// createdAt, dueDate, priority or title.
    #[arg(long, default_value = "createdAt")]
    pub sort: SortKey,
    #[arg(long, default_value = "desc")]
    pub order: SortOrder,
    /// completed or pending.
    #[arg(long)]
    pub status: Option<StatusFilter>,
    #[arg(long)]
    pub priority: Option<Priority>,
    #[arg(long)]
    pub overdue: bool,
    /// Only the tasks of one kanban column.
    #[arg(long)]
    pub column: Option<TaskStatus>,
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum EventCommand {
    Add {
        title: String,
        #[arg(long)]
        date: NaiveDate,
        /// HH:MM
        #[arg(long, value_parser = time_arg)]
        time: Option<NaiveTime>,
        #[arg(long, default_value = "")]
        description: String,
        /// Id of the task this event belongs to.
        #[arg(long)]
        task: Option<String>,
    },
    List {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    Delete { id: String },
    /// Month grid with the events and due tasks of each day.
    Month {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
        /// Months to move from the chosen month, e.g. -1 for the previous one.
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        shift: i32,
    },
}

#[derive(Args, Debug)]
pub struct TransactionArgs {
    /// expense or income.
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: Category,
    pub description: String,
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl TransactionArgs {
    fn into_new(self) -> NewTransaction {
        NewTransaction {
            kind: self.kind,
            amount: self.amount,
            category: self.category,
            description: self.description,
            date: self.date.unwrap_or_else(|| Utc::now().date_naive()),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum FinanceCommand {
    Add(TransactionArgs),
    Edit {
        id: String,
        #[command(flatten)]
        fields: TransactionArgs,
    },
    List,
    Delete { id: String },
    Summary,
}

fn time_arg(raw: &str) -> Result<NaiveTime, String> {
    parse_time(raw).ok_or_else(|| format!("'{}' is not a time (HH:MM)", raw))
}

//=========================================================================================
// Dispatch
//=========================================================================================

/// Runs one parsed command against the stores.
pub fn run(state: &AppState, command: Command) -> Result<Value, AppError> {
    match command {
        Command::Register {
            name,
            email,
            password,
        } => {
            let user = state.sessions.register(&name, &email, &password)?;
            Ok(session_json(&user))
        }
        Command::Login { email, password } => {
            let user = state.sessions.login(&email, &password)?;
            Ok(session_json(&user))
        }
        Command::Logout => {
            state.sessions.logout()?;
            Ok(json!({ "loggedOut": true }))
        }
        Command::Whoami => Ok(state
            .sessions
            .current_session()
            .map_or(Value::Null, |user| session_json(&user))),
        Command::Task(command) => run_task(state, &require_session(state)?, command),
        Command::Event(command) => run_event(state, &require_session(state)?, command),
        Command::Finance(command) => run_finance(state, &require_session(state)?, command),
    }
}

fn invalid_month(year: i32, month: u32) -> AppError {
    AppError::Parse(ParseError {
        kind: "month",
        value: format!("{}-{:02}", year, month),
    })
}

fn require_session(state: &AppState) -> Result<SessionUser, AppError> {
    state.sessions.current_session().ok_or(AppError::NotLoggedIn)
}

fn session_json(user: &SessionUser) -> Value {
    json!(SessionUserRecord::from_domain(user))
}

fn tasks_json<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Value {
    json!(tasks
        .into_iter()
        .map(TaskRecord::from_domain)
        .collect::<Vec<_>>())
}

/// Keeps the already-selected tasks that also match `term`, preserving their order.
fn narrow_by_search<'a>(
    all: &'a [Task],
    selected: Vec<&'a Task>,
    term: Option<&str>,
) -> Vec<&'a Task> {
    let Some(term) = term else {
        return selected;
    };
    let hits: Vec<&str> = search_tasks(all, term).into_iter().map(|t| t.id.as_str()).collect();
    selected
        .into_iter()
        .filter(|t| hits.contains(&t.id.as_str()))
        .collect()
}

fn run_task(
    state: &AppState,
    user: &SessionUser,
    command: TaskCommand,
) -> Result<Value, AppError> {
    let tasks = &state.tasks;
    match command {
        TaskCommand::Add {
            title,
            description,
            priority,
            due,
            status,
        } => {
            let task = tasks.add_task(
                &user.id,
                NewTask {
                    title,
                    description,
                    priority,
                    due_date: due,
                    status,
                },
            )?;
            Ok(json!(TaskRecord::from_domain(&task)))
        }
        TaskCommand::List(args) => {
            let all = tasks.load_tasks(&user.id);
            let filter = TaskFilter {
                status: args.status,
                priority: args.priority,
                overdue: args.overdue,
            };
            let now = Utc::now();
            let selected: Vec<&Task> = sort_tasks(&all, args.sort, args.order)
                .into_iter()
                .filter(|t| filter.matches(t, now))
                .filter(|t| args.column.map_or(true, |column| t.status == column))
                .collect();
            Ok(tasks_json(narrow_by_search(&all, selected, args.search.as_deref())))
        }
        TaskCommand::Edit {
            id,
            title,
            description,
            priority,
            due,
            clear_due,
        } => {
            let due_date = if clear_due { Some(None) } else { due.map(Some) };
            let patch = TaskPatch {
                title,
                description,
                priority,
                due_date,
            };
            let task = tasks.update_task(&user.id, &id, patch)?;
            Ok(json!(TaskRecord::from_domain(&task)))
        }
        TaskCommand::Move { id, status } => {
            let task = tasks.move_task(&user.id, &id, status)?;
            Ok(json!(TaskRecord::from_domain(&task)))
        }
        TaskCommand::Toggle { id } => {
            let task = tasks.toggle_complete(&user.id, &id)?;
            Ok(json!(TaskRecord::from_domain(&task)))
        }
        TaskCommand::Delete { id } => {
            let task = tasks.delete_task(&user.id, &id)?;
            Ok(json!(TaskRecord::from_domain(&task)))
        }
        TaskCommand::Stats => {
            let all = tasks.load_tasks(&user.id);
            let now = Utc::now();
            let stats = task_stats(&all, now);
            let priority_stats: serde_json::Map<String, Value> = stats
                .priority_stats
                .iter()
                .map(|(priority, count)| (priority.as_str().to_string(), json!(count)))
                .collect();
            let columns: serde_json::Map<String, Value> = TaskStatus::ALL
                .into_iter()
                .map(|status| {
                    (
                        status.as_str().to_string(),
                        json!(tasks_in_status(&all, status).len()),
                    )
                })
                .collect();
            let overdue = filter_tasks(
                &all,
                &TaskFilter {
                    overdue: true,
                    ..TaskFilter::default()
                },
                now,
            );
            Ok(json!({
                "total": stats.total,
                "completed": stats.completed,
                "pending": stats.pending,
                "overdue": stats.overdue,
                "completionRate": stats.completion_rate,
                "priorityStats": priority_stats,
                "columns": columns,
                "overdueTasks": tasks_json(overdue),
            }))
        }
        TaskCommand::Archive { search, sort } => {
            let all = tasks.load_tasks(&user.id);
            let archived = archive_order(&all, sort);
            Ok(tasks_json(narrow_by_search(&all, archived, search.as_deref())))
        }
    }
}

fn run_event(
    state: &AppState,
    user: &SessionUser,
    command: EventCommand,
) -> Result<Value, AppError> {
    let events = &state.events;
    match command {
        EventCommand::Add {
            title,
            date,
            time,
            description,
            task,
        } => {
            let event = events.add_event(
                &user.id,
                NewEvent {
                    title,
                    description,
                    date,
                    time,
                    linked_task_id: task,
                },
            )?;
            Ok(json!(EventRecord::from_domain(&event)))
        }
        EventCommand::List { date } => {
            let all = events.load_events(&user.id);
            let selected: Vec<EventRecord> = match date {
                Some(date) => calendar::events_on(&all, date)
                    .into_iter()
                    .map(EventRecord::from_domain)
                    .collect(),
                None => all.iter().map(EventRecord::from_domain).collect(),
            };
            Ok(json!(selected))
        }
        EventCommand::Delete { id } => {
            let event = events.delete_event(&user.id, &id)?;
            Ok(json!(EventRecord::from_domain(&event)))
        }
        EventCommand::Month { year, month, shift } => {
            let today = Utc::now().date_naive();
            let (year, month) = (year.unwrap_or(today.year()), month.unwrap_or(today.month()));
            let (year, month) = calendar::shift_month(year, month, shift)
                .ok_or_else(|| invalid_month(year, month))?;
            let grid =
                calendar::month_grid(year, month).ok_or_else(|| invalid_month(year, month))?;
            let all_events = events.load_events(&user.id);
            let all_tasks = state.tasks.load_tasks(&user.id);
            let cells: Vec<Value> = grid
                .into_iter()
                .map(|cell| {
                    let Some(date) = cell.and_then(|day| NaiveDate::from_ymd_opt(year, month, day))
                    else {
                        return Value::Null;
                    };
                    json!({
                        "date": date,
                        "today": date == today,
                        "events": calendar::events_on(&all_events, date).len(),
                        "tasksDue": calendar::tasks_due_on(&all_tasks, date).len(),
                    })
                })
                .collect();
            Ok(json!({ "year": year, "month": month, "cells": cells }))
        }
    }
}

fn run_finance(
    state: &AppState,
    user: &SessionUser,
    command: FinanceCommand,
) -> Result<Value, AppError> {
    let ledger = &state.finance;
    match command {
        FinanceCommand::Add(args) => {
            let transaction = ledger.add_transaction(&user.id, args.into_new())?;
            Ok(json!(TransactionRecord::from_domain(&transaction)))
        }
        FinanceCommand::Edit { id, fields } => {
            let transaction = ledger.update_transaction(&user.id, &id, fields.into_new())?;
            Ok(json!(TransactionRecord::from_domain(&transaction)))
        }
        FinanceCommand::List => {
            let records: Vec<TransactionRecord> = ledger
                .load_transactions(&user.id)
                .iter()
                .map(TransactionRecord::from_domain)
                .collect();
            Ok(json!(records))
        }
        FinanceCommand::Delete { id } => {
            let transaction = ledger.delete_transaction(&user.id, &id)?;
            Ok(json!(TransactionRecord::from_domain(&transaction)))
        }
        FinanceCommand::Summary => {
            let all = ledger.load_transactions(&user.id);
            let totals = finance::summary(&all);
            let by_category: serde_json::Map<String, Value> = finance::expenses_by_category(&all)
                .into_iter()
                .map(|(category, amount)| (category.as_str().to_string(), json!(amount)))
                .collect();
            Ok(json!({
                "totalIncome": totals.total_income,
                "totalExpenses": totals.total_expenses,
                "balance": totals.balance,
                "expensesByCategory": by_category,
            }))
        }
    }
}
