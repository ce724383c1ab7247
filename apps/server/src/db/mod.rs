//! Database layer
//!
//! `store` talks to PostgreSQL; `filter` compiles list parameters into the
//! parameterized queries the store executes.

pub mod filter;
pub mod store;

pub use store::PersonStore;
