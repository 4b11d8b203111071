pub mod file;
pub mod memory;
pub mod password;
pub mod records;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use password::Argon2PasswordHasher;
