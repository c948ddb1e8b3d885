pub mod manager;
pub mod memory;
pub mod models;
pub mod query_builder;
pub mod repository;
pub mod store;

pub use manager::{Database, DatabaseError, Stores};
pub use memory::MemoryStore;
pub use repository::Repository;
pub use store::{Lookup, Relation, Store, StoreError};
