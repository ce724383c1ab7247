//! Business logic layer
//!
//! Services orchestrate operations by coordinating the store, the
//! enrichment lookups and filter compilation, and applying business rules.

pub mod persons;

pub use persons::PersonService;
