//! SQLite storage backend.

pub mod repo;
pub mod schema;

pub use repo::Database;
pub use schema::SCHEMA_VERSION;
