//! Storage keys. Every user-owned collection is namespaced by user id.

pub const USERS: &str = "taskflow-users";
pub const CURRENT_USER: &str = "taskflow-current-user";

pub fn tasks(user_id: &str) -> String {
    format!("taskflow-tasks-{}", user_id)
}

pub fn events(user_id: &str) -> String {
    format!("taskflow-events-{}", user_id)
}

pub fn transactions(user_id: &str) -> String {
    format!("taskflow-transactions-{}", user_id)
}
