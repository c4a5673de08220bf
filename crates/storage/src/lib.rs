#![forbid(unsafe_code)]

pub mod gateway;
pub mod repository;
pub mod sqlite;

pub use gateway::{Gateway, StorageKeys};
pub use repository::{InMemoryStore, KeyValueStore, Storage, StorageError};
