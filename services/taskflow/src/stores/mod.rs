pub mod events;
pub mod finance;
pub(crate) mod json;
pub mod keys;
pub mod session;
pub mod tasks;

pub use events::EventStore;
pub use finance::FinanceStore;
pub use session::SessionStore;
pub use tasks::TaskStore;
