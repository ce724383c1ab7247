//! Person service - business logic for person records

use census_lookup::LookupClient;

use crate::{
    config::SearchConfig,
    db::{filter, PersonStore},
    models::{ListParams, NewPerson, Person, PersonUpdate},
    Error, Result,
};

pub struct PersonService {
    store: PersonStore,
    lookups: LookupClient,
    search: SearchConfig,
}

impl PersonService {
    pub fn new(store: PersonStore, lookups: LookupClient, search: SearchConfig) -> Self {
        Self {
            store,
            lookups,
            search,
        }
    }

    /// Create a person (POST /persons)
    ///
    /// Validates the name fields, enriches the record with age, gender and
    /// nationality from the name lookups, then persists it. Nothing is
    /// written when validation or enrichment fails.
    pub async fn create(&self, mut person: NewPerson) -> Result<i64> {
        validate_new_person(&person)?;

        // An empty patronymic means "absent" and is stored as NULL.
        if person.patronymic.as_deref() == Some("") {
            person.patronymic = None;
        }

        let profile = self.lookups.profile(&person.name).await?;
        tracing::debug!(name = %person.name, ?profile, "Enrichment lookups completed");

        let id = self
            .store
            .insert(&person, profile.age, &profile.gender, &profile.nationality)
            .await?;

        tracing::info!(id, name = %person.name, "Person created");
        Ok(id)
    }

    /// Read a person by id (GET /persons/:id)
    pub async fn get(&self, id: i64) -> Result<Person> {
        self.store
            .get(id)
            .await?
            .ok_or(Error::PersonNotFound { id })
    }

    /// List persons matching operator filters (GET /persons)
    pub async fn list(&self, params: &ListParams) -> Result<Vec<Person>> {
        let filter = filter::compile(params, &self.search)?;
        self.store.list(&filter).await
    }

    /// Merge an update into an existing person (PUT /persons)
    ///
    /// Absent, empty-string and zero-age fields keep the stored values.
    pub async fn update(&self, update: PersonUpdate) -> Result<()> {
        let id = update.id;
        let current = self.get(id).await?;
        let merged = merge_update(current, update);

        // The row can disappear between the read and the write.
        if !self.store.update(&merged).await? {
            return Err(Error::PersonNotFound { id });
        }

        tracing::info!(id, "Person updated");
        Ok(())
    }

    /// Delete a person (DELETE /persons/:id)
    ///
    /// Deleting an id that does not exist is not an error.
    pub async fn delete(&self, id: i64) -> Result<()> {
        if self.store.delete(id).await? {
            tracing::info!(id, "Person deleted");
        } else {
            tracing::debug!(id, "Delete matched no person");
        }
        Ok(())
    }
}

fn validate_new_person(person: &NewPerson) -> Result<()> {
    if person.name.is_empty() {
        return Err(Error::Validation("name must not be empty".to_string()));
    }
    if !person.name.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::Validation("name must be latin".to_string()));
    }
    if person.surname.is_empty() {
        return Err(Error::Validation("surname must not be empty".to_string()));
    }
    Ok(())
}

fn merge_update(current: Person, update: PersonUpdate) -> Person {
    Person {
        id: current.id,
        name: non_empty(update.name).unwrap_or(current.name),
        surname: non_empty(update.surname).unwrap_or(current.surname),
        patronymic: non_empty(update.patronymic).or(current.patronymic),
        age: update.age.filter(|a| *a != 0).unwrap_or(current.age),
        gender: non_empty(update.gender).unwrap_or(current.gender),
        nationality: non_empty(update.nationality).unwrap_or(current.nationality),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
