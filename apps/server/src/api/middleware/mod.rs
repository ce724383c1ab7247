pub mod metrics;
pub mod security;
