//! PostgreSQL-backed person store

use sqlx::{postgres::PgRow, PgPool, Row};

use crate::{
    db::filter::{FilterValue, PersonFilter},
    models::{NewPerson, Person},
    Error, Result,
};

const PERSON_COLUMNS: &str = "id, name, surname, patronymic, age, gender, nationality";

/// PostgreSQL-backed person store
#[derive(Clone)]
pub struct PersonStore {
    pub(crate) pool: PgPool,
}

impl PersonStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: i64) -> Result<Option<Person>> {
        let sql = format!("SELECT {PERSON_COLUMNS} FROM persons WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.map(person_from_row))
    }

    /// Execute a compiled list query.
    ///
    /// Only fixed column names and operators from the filter are rendered
    /// into the SQL text; every comparand and the paging values are bound.
    pub async fn list(&self, filter: &PersonFilter) -> Result<Vec<Person>> {
        let mut sql = format!("SELECT {PERSON_COLUMNS} FROM persons WHERE 1 = 1");

        let mut next_bind = 1u32;
        for clause in &filter.clauses {
            sql.push_str(&format!(
                " AND {} {} ${next_bind}",
                clause.column,
                clause.op.as_sql()
            ));
            next_bind += 1;
        }
        sql.push_str(&format!(
            " ORDER BY id LIMIT ${next_bind} OFFSET ${}",
            next_bind + 1
        ));

        let mut q = sqlx::query(&sql);
        for clause in &filter.clauses {
            q = match &clause.value {
                FilterValue::Text(v) => q.bind(v.clone()),
                FilterValue::Int(v) => q.bind(*v),
            };
        }
        q = q.bind(filter.limit).bind(filter.offset);

        let rows = q.fetch_all(&self.pool).await.map_err(Error::Database)?;

        Ok(rows.into_iter().map(person_from_row).collect())
    }

    /// Insert a new person with enrichment results, returning the new id.
    pub async fn insert(
        &self,
        person: &NewPerson,
        age: i32,
        gender: &str,
        nationality: &str,
    ) -> Result<i64> {
        let row = sqlx::query(
            "INSERT INTO persons (name, surname, patronymic, age, gender, nationality)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(person.name.clone())
        .bind(person.surname.clone())
        .bind(person.patronymic.clone())
        .bind(age)
        .bind(gender)
        .bind(nationality)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.get("id"))
    }

    /// Overwrite all columns of an existing person. Returns false when no
    /// row has the given id.
    pub async fn update(&self, person: &Person) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE persons
             SET name = $1, surname = $2, patronymic = $3, age = $4, gender = $5, nationality = $6
             WHERE id = $7",
        )
        .bind(person.name.clone())
        .bind(person.surname.clone())
        .bind(person.patronymic.clone())
        .bind(person.age)
        .bind(person.gender.clone())
        .bind(person.nationality.clone())
        .bind(person.id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a person. Returns false when no row has the given id.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM persons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(result.rows_affected() > 0)
    }
}

fn person_from_row(row: PgRow) -> Person {
    Person {
        id: row.get("id"),
        name: row.get("name"),
        surname: row.get("surname"),
        patronymic: row.get("patronymic"),
        age: row.get("age"),
        gender: row.get("gender"),
        nationality: row.get("nationality"),
    }
}
