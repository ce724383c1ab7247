//! Domain types for person records
//!
//! `Person` is the persisted record. `NewPerson` and `PersonUpdate` are the
//! request payloads for create and update, kept separate because create
//! accepts only the name fields (age, gender and nationality are filled in
//! by enrichment) while update may touch any column.

use serde::{Deserialize, Serialize};

/// A stored person record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub surname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patronymic: Option<String>,
    pub age: i32,
    pub gender: String,
    pub nationality: String,
}

/// Payload for creating a person. Only the name triple is client-supplied;
/// the remaining fields come from the enrichment lookups.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPerson {
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub patronymic: Option<String>,
}

/// Partial update payload. Absent, empty-string and zero-age fields leave
/// the stored value unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonUpdate {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub patronymic: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
}

/// Raw query-string parameters of a list request. Each field value is an
/// `operator:comparand` pair, e.g. `name=is:Ivan` or `age=mt:30`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
