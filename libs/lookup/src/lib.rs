//! Client for the name-based demographic lookup services
//!
//! Three public HTTP APIs infer demographics from a bare first name: agify.io
//! (age), genderize.io (gender) and nationalize.io (nationality). Each takes a
//! `?name=` query and answers with a small JSON document. [`LookupClient`]
//! queries all three concurrently under a single shared deadline and merges
//! the answers into a [`NameProfile`].

mod error;

pub use error::{Error, Lookup, Result};

use serde::Deserialize;
use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_AGE_URL: &str = "https://api.agify.io";
pub const DEFAULT_GENDER_URL: &str = "https://api.genderize.io";
pub const DEFAULT_NATIONALITY_URL: &str = "https://api.nationalize.io";

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;

/// Configuration for [`LookupClient`].
///
/// Base URLs are configurable so tests and air-gapped deployments can point
/// the client at a stand-in service.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    pub age_url: String,
    pub gender_url: String,
    pub nationality_url: String,
    /// Shared budget covering all three lookups of one profile call.
    pub timeout: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            age_url: DEFAULT_AGE_URL.to_string(),
            gender_url: DEFAULT_GENDER_URL.to_string(),
            nationality_url: DEFAULT_NATIONALITY_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

/// Demographics inferred for a first name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameProfile {
    pub age: i32,
    pub gender: String,
    /// Two-letter country code; empty when the service had no candidates.
    pub nationality: String,
}

#[derive(Debug, Default, Deserialize)]
struct AgeResponse {
    age: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
struct GenderResponse {
    gender: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NationalityResponse {
    #[serde(default)]
    country: Vec<CountryCandidate>,
}

#[derive(Debug, Deserialize)]
struct CountryCandidate {
    country_id: String,
}

/// Client for the three demographic lookup services.
#[derive(Debug, Clone)]
pub struct LookupClient {
    http: reqwest::Client,
    config: LookupConfig,
}

impl LookupClient {
    pub fn new(config: LookupConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// Look up age, gender and nationality for a first name.
    ///
    /// The three requests run concurrently and share one deadline; the first
    /// failure cancels whatever is still in flight. A successful profile has
    /// all three fields populated (nationality may be empty, see
    /// [`NameProfile::nationality`]).
    pub async fn profile(&self, name: &str) -> Result<NameProfile> {
        let deadline = Instant::now() + self.config.timeout;

        let (age, gender, nationality) = tokio::try_join!(
            self.fetch_age(name, deadline),
            self.fetch_gender(name, deadline),
            self.fetch_nationality(name, deadline),
        )?;

        Ok(NameProfile {
            age,
            gender,
            nationality,
        })
    }

    async fn fetch_age(&self, name: &str, deadline: Instant) -> Result<i32> {
        let body: AgeResponse = self
            .fetch_json(Lookup::Age, &self.config.age_url, name, deadline)
            .await?;
        Ok(body.age.unwrap_or(0))
    }

    async fn fetch_gender(&self, name: &str, deadline: Instant) -> Result<String> {
        let body: GenderResponse = self
            .fetch_json(Lookup::Gender, &self.config.gender_url, name, deadline)
            .await?;
        Ok(body.gender.unwrap_or_default())
    }

    async fn fetch_nationality(&self, name: &str, deadline: Instant) -> Result<String> {
        let body: NationalityResponse = self
            .fetch_json(
                Lookup::Nationality,
                &self.config.nationality_url,
                name,
                deadline,
            )
            .await?;
        // The service ranks candidates by probability; take the best one.
        Ok(body
            .country
            .into_iter()
            .next()
            .map(|c| c.country_id)
            .unwrap_or_default())
    }

    async fn fetch_json<T>(
        &self,
        lookup: Lookup,
        base_url: &str,
        name: &str,
        deadline: Instant,
    ) -> Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        let request = self.http.get(base_url).query(&[("name", name)]).send();

        let response = tokio::time::timeout_at(deadline, request)
            .await
            .map_err(|_| Error::Timeout { lookup })?
            .map_err(|e| classify(lookup, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status { lookup, status });
        }

        match tokio::time::timeout_at(deadline, response.json::<T>()).await {
            Err(_) => Err(Error::Timeout { lookup }),
            Ok(Ok(body)) => Ok(body),
            Ok(Err(e)) if e.is_decode() => {
                // The public services occasionally answer with unexpected
                // shapes. Treat that as "no data" instead of failing the
                // whole profile.
                tracing::warn!(
                    lookup = %lookup,
                    error = %e,
                    "Lookup returned an undecodable body, using defaults"
                );
                Ok(T::default())
            }
            Ok(Err(e)) => Err(classify(lookup, e)),
        }
    }
}

fn classify(lookup: Lookup, e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout { lookup }
    } else {
        Error::Request { lookup, source: e }
    }
}
