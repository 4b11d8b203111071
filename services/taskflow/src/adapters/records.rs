//! services/taskflow/src/adapters/records.rs
//!
//! "Impure" persistence records: the JSON shapes stored under each key, and their
//! conversion to and from the pure domain types of the `core` crate.
//!
//! Field names are camelCase so that documents written by earlier versions of the
//! application still load.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use taskflow_core::domain::{
    Category, Event, Priority, SessionUser, Task, TaskStatus, Transaction, TransactionKind, User,
};
use taskflow_core::ParseError;

//=========================================================================================
// Accounts
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(alias = "password")]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn to_domain(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            created_at: self.created_at,
        }
    }

    pub fn from_domain(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl SessionUserRecord {
    pub fn to_domain(self) -> SessionUser {
        SessionUser {
            id: self.id,
            name: self.name,
            email: self.email,
            created_at: self.created_at,
        }
    }

    pub fn from_domain(user: &SessionUser) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

//=========================================================================================
// Tasks
//=========================================================================================

/// The stored task shape. Workflow state is spread over three flags on the wire;
/// at most one of them is ever written as `true`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub in_progress: bool,
    #[serde(default)]
    pub approval: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TaskRecord {
    /// Flags resolve with the kanban precedence: completed, in progress, approval.
    fn status(&self) -> TaskStatus {
        if self.completed {
            TaskStatus::Completed
        } else if self.in_progress {
            TaskStatus::InProgress
        } else if self.approval {
            TaskStatus::Approval
        } else {
            TaskStatus::Pending
        }
    }

    pub fn to_domain(self) -> Task {
        let status = self.status();
        // Unknown priorities rank as medium.
        let priority = self
            .priority
            .as_deref()
            .and_then(|p| p.parse::<Priority>().ok())
            .unwrap_or_default();
        let due_date = self.due_date.as_deref().and_then(parse_date);
        Task {
            id: self.id,
            title: self.title,
            description: self.description.unwrap_or_default(),
            priority,
            due_date,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn from_domain(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: Some(task.description.clone()),
            priority: Some(task.priority.as_str().to_string()),
            due_date: task.due_date.map(|d| d.format(DATE_FORMAT).to_string()),
            completed: task.status == TaskStatus::Completed,
            in_progress: task.status == TaskStatus::InProgress,
            approval: task.status == TaskStatus::Approval,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Accepts a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp. Empty means none.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
}

//=========================================================================================
// Calendar
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub linked_task_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

fn format_time(time: NaiveTime) -> String {
    if time.second() == 0 {
        time.format("%H:%M").to_string()
    } else {
        time.format("%H:%M:%S").to_string()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl EventRecord {
    pub fn to_domain(self) -> Event {
        Event {
            id: self.id,
            title: self.title,
            description: self.description.unwrap_or_default(),
            date: self.date,
            time: self.time.as_deref().and_then(parse_time),
            linked_task_id: non_empty(self.linked_task_id),
            created_at: self.created_at,
        }
    }

    pub fn from_domain(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            description: Some(event.description.clone()),
            date: event.date,
            time: event.time.map(format_time),
            linked_task_id: event.linked_task_id.clone(),
            created_at: event.created_at,
        }
    }
}

//=========================================================================================
// Finance
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Fails on an unknown transaction type. Unknown categories fall back to `other`.
    pub fn to_domain(self) -> Result<Transaction, ParseError> {
        let kind = self.kind.parse::<TransactionKind>()?;
        let category = self
            .category
            .parse::<Category>()
            .ok()
            .filter(|c| c.allowed_for(kind))
            .unwrap_or(Category::Other);
        Ok(Transaction {
            id: self.id,
            kind,
            amount: self.amount,
            category,
            description: self.description,
            date: self.date,
            created_at: self.created_at,
        })
    }

    pub fn from_domain(transaction: &Transaction) -> Self {
        Self {
            id: transaction.id.clone(),
            kind: transaction.kind.as_str().to_string(),
            amount: transaction.amount,
            category: transaction.category.as_str().to_string(),
            description: transaction.description.clone(),
            date: transaction.date,
            created_at: transaction.created_at,
        }
    }
}
