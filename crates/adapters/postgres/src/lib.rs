//! inventory-adapter-postgres - PostgreSQL 适配器

mod config;
mod connection;
mod inventory_repository;
mod retry;
mod schema;

pub use config::*;
pub use connection::*;
pub use inventory_repository::*;
pub use retry::*;
pub use schema::*;
