//! crates/taskflow_core/src/tasks.rs
//!
//! Derived views over a task collection: validation, ordering, filtering and
//! aggregate statistics. Everything here is pure; "now" is always passed in.

use crate::domain::{start_of_day, NewTask, Priority, Task, TaskStatus};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

//=========================================================================================
// Validation
//=========================================================================================

/// Outcome of validating task input. Field names map to a human-readable message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub field_errors: BTreeMap<&'static str, String>,
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self
            .field_errors
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect();
        f.write_str(&messages.join("; "))
    }
}

/// A task is valid iff its title is present and not blank.
pub fn validate_task(candidate: &NewTask) -> ValidationReport {
    validate_title(&candidate.title)
}

pub fn validate_title(title: &str) -> ValidationReport {
    let mut field_errors = BTreeMap::new();
    if title.trim().is_empty() {
        field_errors.insert("title", "task title is required".to_string());
    }
    ValidationReport {
        valid: field_errors.is_empty(),
        field_errors,
    }
}

//=========================================================================================
// Sorting
//=========================================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    CreatedAt,
    DueDate,
    Priority,
    /// Case-insensitive; titles differing only in case fall back to byte order.
    Title,
}

impl FromStr for SortKey {
    type Err = crate::domain::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" | "created-at" => Ok(Self::CreatedAt),
            "dueDate" | "due-date" => Ok(Self::DueDate),
            "priority" => Ok(Self::Priority),
            "title" => Ok(Self::Title),
            other => Err(crate::domain::ParseError {
                kind: "sort key",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = crate::domain::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(crate::domain::ParseError {
                kind: "sort order",
                value: other.to_string(),
            }),
        }
    }
}

/// Missing due dates sort as the epoch.
fn due_millis(task: &Task) -> i64 {
    task.due_date
        .map_or(0, |due| start_of_day(due).timestamp_millis())
}

fn title_order(a: &Task, b: &Task) -> Ordering {
    a.title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.title.cmp(&b.title))
}

fn compare(a: &Task, b: &Task, key: SortKey) -> Ordering {
    match key {
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        SortKey::DueDate => due_millis(a).cmp(&due_millis(b)),
        SortKey::Priority => a.priority.rank().cmp(&b.priority.rank()),
        SortKey::Title => title_order(a, b),
    }
}

/// Stable sort; ties keep their insertion order in both directions.
pub fn sort_tasks(tasks: &[Task], key: SortKey, order: SortOrder) -> Vec<&Task> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by(|a, b| match order {
        SortOrder::Asc => compare(a, b, key),
        SortOrder::Desc => compare(a, b, key).reverse(),
    });
    sorted
}

//=========================================================================================
// Filtering
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Completed,
    Pending,
}

impl FromStr for StatusFilter {
    type Err = crate::domain::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            other => Err(crate::domain::ParseError {
                kind: "status filter",
                value: other.to_string(),
            }),
        }
    }
}

/// Independent predicates, combined with AND. Unset predicates match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<StatusFilter>,
    pub priority: Option<Priority>,
    pub overdue: bool,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task, now: DateTime<Utc>) -> bool {
        let status_ok = match self.status {
            Some(StatusFilter::Completed) => task.is_completed(),
            Some(StatusFilter::Pending) => !task.is_completed(),
            None => true,
        };
        let priority_ok = self.priority.map_or(true, |p| task.priority == p);
        let overdue_ok = !self.overdue || task.is_overdue(now);
        status_ok && priority_ok && overdue_ok
    }
}

pub fn filter_tasks<'a>(
    tasks: &'a [Task],
    filter: &TaskFilter,
    now: DateTime<Utc>,
) -> Vec<&'a Task> {
    tasks.iter().filter(|t| filter.matches(t, now)).collect()
}

/// The tasks of one kanban column, in collection order.
pub fn tasks_in_status(tasks: &[Task], status: TaskStatus) -> Vec<&Task> {
    tasks.iter().filter(|t| t.status == status).collect()
}

/// Case-insensitive substring match on title or description.
pub fn search_tasks<'a>(tasks: &'a [Task], term: &str) -> Vec<&'a Task> {
    let needle = term.to_lowercase();
    tasks
        .iter()
        .filter(|t| {
            t.title.to_lowercase().contains(&needle)
                || t.description.to_lowercase().contains(&needle)
        })
        .collect()
}

/// How the archive orders completed tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArchiveSort {
    /// Most recently finished first; a task's last update stands in for completion.
    #[default]
    CompletedAt,
    /// Newest first.
    CreatedAt,
    /// Alphabetical, as `SortKey::Title` ascending.
    Title,
}

impl FromStr for ArchiveSort {
    type Err = crate::domain::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completedAt" | "completed-at" => Ok(Self::CompletedAt),
            "createdAt" | "created-at" => Ok(Self::CreatedAt),
            "title" => Ok(Self::Title),
            other => Err(crate::domain::ParseError {
                kind: "archive sort",
                value: other.to_string(),
            }),
        }
    }
}

/// The completed tasks, in the requested archive order. Stable.
pub fn archive_order(tasks: &[Task], sort: ArchiveSort) -> Vec<&Task> {
    let mut done: Vec<&Task> = tasks.iter().filter(|t| t.is_completed()).collect();
    match sort {
        ArchiveSort::CompletedAt => done.sort_by(|a, b| {
            let a_at = a.updated_at.unwrap_or(a.created_at);
            let b_at = b.updated_at.unwrap_or(b.created_at);
            b_at.cmp(&a_at)
        }),
        ArchiveSort::CreatedAt => done.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        ArchiveSort::Title => done.sort_by(|a, b| title_order(a, b)),
    }
    done
}

//=========================================================================================
// Statistics
//=========================================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    /// Percentage of completed tasks, rounded half up; 0 for an empty list.
    pub completion_rate: u32,
    /// Incomplete tasks per priority. Completed tasks are not counted.
    pub priority_stats: BTreeMap<Priority, usize>,
}

pub fn task_stats(tasks: &[Task], now: DateTime<Utc>) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.is_completed()).count();
    let overdue = tasks.iter().filter(|t| t.is_overdue(now)).count();

    let mut priority_stats = BTreeMap::new();
    for task in tasks.iter().filter(|t| !t.is_completed()) {
        *priority_stats.entry(task.priority).or_insert(0) += 1;
    }

    let completion_rate = if total == 0 {
        0
    } else {
        u32::try_from((200 * completed + total) / (2 * total)).unwrap_or(100)
    };

    TaskStats {
        total,
        completed,
        pending: total - completed,
        overdue,
        completion_rate,
        priority_stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    fn task(title: &str, priority: Priority) -> Task {
        Task::new(
            NewTask {
                title: title.to_string(),
                priority,
                ..NewTask::default()
            },
            now(),
        )
    }

    fn titles(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn blank_title_is_invalid() {
        let report = validate_task(&NewTask {
            title: "   ".to_string(),
            ..NewTask::default()
        });
        assert!(!report.valid);
        assert!(report.field_errors.contains_key("title"));

        let report = validate_task(&NewTask {
            title: "Write report".to_string(),
            ..NewTask::default()
        });
        assert!(report.valid);
        assert!(report.field_errors.is_empty());
    }

    #[test]
    fn priority_desc_is_stable() {
        let tasks = vec![
            task("m", Priority::Medium),
            task("h1", Priority::High),
            task("l", Priority::Low),
            task("h2", Priority::High),
        ];
        let sorted = sort_tasks(&tasks, SortKey::Priority, SortOrder::Desc);
        assert_eq!(titles(&sorted), ["h1", "h2", "m", "l"]);

        let sorted = sort_tasks(&tasks, SortKey::Priority, SortOrder::Asc);
        assert_eq!(titles(&sorted), ["l", "m", "h1", "h2"]);
    }

    #[test]
    fn missing_due_dates_sort_as_epoch() {
        let mut early = task("early", Priority::Medium);
        early.due_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        let none = task("none", Priority::Medium);
        let mut late = task("late", Priority::Medium);
        late.due_date = NaiveDate::from_ymd_opt(2024, 6, 1);

        let tasks = vec![late, none, early];
        let sorted = sort_tasks(&tasks, SortKey::DueDate, SortOrder::Asc);
        assert_eq!(titles(&sorted), ["none", "early", "late"]);
    }

    #[test]
    fn sorts_by_creation_and_title() {
        let mut older = task("b", Priority::Low);
        older.created_at = now() - Duration::days(2);
        let newer = task("a", Priority::Low);
        let tasks = vec![older, newer];

        let sorted = sort_tasks(&tasks, SortKey::CreatedAt, SortOrder::Desc);
        assert_eq!(titles(&sorted), ["a", "b"]);

        let sorted = sort_tasks(&tasks, SortKey::Title, SortOrder::Asc);
        assert_eq!(titles(&sorted), ["a", "b"]);
    }

    #[test]
    fn overdue_filter_excludes_completed_tasks() {
        let mut late = task("late", Priority::Medium);
        late.due_date = Some(now().date_naive() - Duration::days(1));
        let filter = TaskFilter {
            overdue: true,
            ..TaskFilter::default()
        };

        assert_eq!(filter_tasks(std::slice::from_ref(&late), &filter, now()).len(), 1);

        late.transition(TaskStatus::Completed, now());
        assert!(filter_tasks(std::slice::from_ref(&late), &filter, now()).is_empty());
    }

    #[test]
    fn due_today_is_overdue_once_the_day_has_started() {
        let mut today = task("today", Priority::Medium);
        today.due_date = Some(now().date_naive());
        assert!(today.is_overdue(now()));

        let mut tomorrow = task("tomorrow", Priority::Medium);
        tomorrow.due_date = Some(now().date_naive() + Duration::days(1));
        assert!(!tomorrow.is_overdue(now()));
    }

    #[test]
    fn filters_combine_with_and() {
        let mut done_high = task("done-high", Priority::High);
        done_high.transition(TaskStatus::Completed, now());
        let open_high = task("open-high", Priority::High);
        let open_low = task("open-low", Priority::Low);
        let tasks = vec![done_high, open_high, open_low];

        let filter = TaskFilter {
            status: Some(StatusFilter::Pending),
            priority: Some(Priority::High),
            overdue: false,
        };
        assert_eq!(titles(&filter_tasks(&tasks, &filter, now())), ["open-high"]);

        let filter = TaskFilter {
            status: Some(StatusFilter::Completed),
            ..TaskFilter::default()
        };
        assert_eq!(titles(&filter_tasks(&tasks, &filter, now())), ["done-high"]);

        assert_eq!(filter_tasks(&tasks, &TaskFilter::default(), now()).len(), 3);
    }

    #[test]
    fn stats_counts_add_up() {
        let mut done = task("done", Priority::High);
        done.transition(TaskStatus::Completed, now());
        let mut late = task("late", Priority::Low);
        late.due_date = Some(now().date_naive() - Duration::days(3));
        let mut review = task("review", Priority::Low);
        review.transition(TaskStatus::Approval, now());
        let tasks = vec![done, late, review];

        let stats = task_stats(&tasks, now());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed + stats.pending, stats.total);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.completion_rate, 33);
        assert_eq!(stats.priority_stats.get(&Priority::Low), Some(&2));
        assert_eq!(stats.priority_stats.get(&Priority::High), None);
    }

    #[test]
    fn completion_rate_rounds_half_up() {
        let mut done = task("done", Priority::Medium);
        done.transition(TaskStatus::Completed, now());
        let open = task("open", Priority::Medium);

        let stats = task_stats(&[done, open], now());
        assert_eq!(stats.completion_rate, 50);

        assert_eq!(task_stats(&[], now()), TaskStats::default());
    }

    #[test]
    fn kanban_search_and_archive_views() {
        let mut shipped = task("Ship release", Priority::High);
        shipped.description = "Tag and publish".to_string();
        shipped.transition(TaskStatus::Completed, now());
        let mut older = task("Write notes", Priority::Low);
        older.transition(TaskStatus::Completed, now() - Duration::hours(5));
        let mut doing = task("Review PR", Priority::Medium);
        doing.transition(TaskStatus::InProgress, now());
        let tasks = vec![older, doing, shipped];

        assert_eq!(
            titles(&tasks_in_status(&tasks, TaskStatus::InProgress)),
            ["Review PR"]
        );
        assert!(tasks_in_status(&tasks, TaskStatus::Approval).is_empty());
        assert_eq!(titles(&search_tasks(&tasks, "PUBLISH")), ["Ship release"]);
        assert_eq!(
            titles(&archive_order(&tasks, ArchiveSort::CompletedAt)),
            ["Ship release", "Write notes"]
        );
    }

    #[test]
    fn archive_sorts_by_creation_or_title() {
        let mut first = task("write notes", Priority::Low);
        first.created_at = now() - Duration::days(3);
        first.transition(TaskStatus::Completed, now());
        let mut second = task("Archive photos", Priority::Low);
        second.created_at = now() - Duration::days(1);
        second.transition(TaskStatus::Completed, now() - Duration::days(1));
        let open = task("Still open", Priority::Low);
        let tasks = vec![first, open, second];

        assert_eq!(
            titles(&archive_order(&tasks, ArchiveSort::CreatedAt)),
            ["Archive photos", "write notes"]
        );
        assert_eq!(
            titles(&archive_order(&tasks, ArchiveSort::Title)),
            ["Archive photos", "write notes"]
        );
        assert_eq!(
            titles(&archive_order(&tasks, ArchiveSort::CompletedAt)),
            ["write notes", "Archive photos"]
        );
        assert_eq!("completedAt".parse::<ArchiveSort>(), Ok(ArchiveSort::CompletedAt));
        assert!("priority".parse::<ArchiveSort>().is_err());
    }

    #[test]
    fn title_sort_ignores_case() {
        let tasks = vec![
            task("banana", Priority::Low),
            task("Cherry", Priority::Low),
            task("apple", Priority::Low),
            task("Apple", Priority::Low),
        ];
        let sorted = sort_tasks(&tasks, SortKey::Title, SortOrder::Asc);
        assert_eq!(titles(&sorted), ["Apple", "apple", "banana", "Cherry"]);
    }

    #[test]
    fn parses_sort_and_filter_names() {
        assert_eq!("dueDate".parse::<SortKey>(), Ok(SortKey::DueDate));
        assert_eq!("asc".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert_eq!("pending".parse::<StatusFilter>(), Ok(StatusFilter::Pending));
        assert!("sideways".parse::<SortOrder>().is_err());
    }
}
