//! Relational backend (MySQL in production, SQLite in tests) built on sea-orm.

mod config;
pub mod entities;
mod error;
pub mod store;

pub use config::SqlConfig;
pub use error::SqlDaoError;
pub use store::SqlQuizStore;

use crate::dao::storage::StorageError;

impl From<SqlDaoError> for StorageError {
    fn from(err: SqlDaoError) -> Self {
        StorageError::unavailable(err.to_string(), err)
    }
}
