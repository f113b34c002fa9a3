pub mod mock;
pub mod persistence;
pub mod repositories;

pub use persistence::{Database, SqliteTickRepository};
pub use repositories::InMemoryTickRepository;
