//! Census server library
//!
//! HTTP service for person records. Created persons are enriched with age,
//! gender and nationality inferred from their first name by three public
//! lookup services; records are stored in PostgreSQL and can be listed with
//! per-field operator filters.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;

pub use error::{Error, Result};
