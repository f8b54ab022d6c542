pub mod memory;
pub mod mysql;

pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
pub use tinylink_core::repository::{NewUrlRecord, ReadRepository, Repository, UrlRecord};
pub use tinylink_core::StorageError;
