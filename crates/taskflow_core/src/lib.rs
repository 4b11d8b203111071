pub mod calendar;
pub mod domain;
pub mod finance;
pub mod ports;
pub mod tasks;

pub use domain::{
    Category, Event, NewEvent, NewTask, NewTransaction, ParseError, Priority, SessionUser, Task,
    TaskPatch, TaskStatus, Transaction, TransactionKind, User,
};
pub use ports::{KeyValueStore, PasswordHasher, PortError, PortResult};
pub use tasks::{
    ArchiveSort, SortKey, SortOrder, StatusFilter, TaskFilter, TaskStats, ValidationReport,
};
pub use finance::FinanceSummary;
