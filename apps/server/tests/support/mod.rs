//! Shared test harness
//!
//! Spins up the full application (router, state, per-test database) plus a
//! local stub standing in for the three demographic lookup services. Tests
//! drive the router directly through `tower::ServiceExt::oneshot`, no real
//! network listener involved.
//!
//! Database-backed tests need an admin connection URL in
//! `CENSUS__DATABASE__TEST_DATABASE_URL`; without it they skip with a note.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    routing::{get, MethodRouter},
    Json, Router,
};
use census::{
    api::create_router,
    config::Config,
    state::{AppState, AppStateOptions},
};
use futures::future::BoxFuture;
use serde_json::{json, Value};
use sqlx::{Connection, PgConnection, PgPool, Row};
use tower::ServiceExt;
use uuid::Uuid;

/// Stub server for the age, gender and nationality lookups.
///
/// Serves `/age`, `/gender` and `/nationality` and counts every request it
/// receives, so tests can assert that validation failures make no outbound
/// calls.
pub struct LookupStub {
    router: Router,
    hits: Arc<AtomicUsize>,
}

impl LookupStub {
    /// All three lookups answer instantly with realistic payloads.
    pub fn happy() -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(
                "/age",
                counted(hits.clone(), json!({ "age": 42, "count": 1234 })),
            )
            .route(
                "/gender",
                counted(
                    hits.clone(),
                    json!({ "gender": "male", "probability": 0.98, "count": 1234 }),
                ),
            )
            .route(
                "/nationality",
                counted(
                    hits.clone(),
                    json!({ "country": [
                        { "country_id": "UA", "probability": 0.42 },
                        { "country_id": "RU", "probability": 0.21 },
                    ]}),
                ),
            );
        Self { router, hits }
    }

    /// The nationality service knows nothing about the name.
    pub fn without_country_candidates() -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(
                "/age",
                counted(hits.clone(), json!({ "age": 42, "count": 1234 })),
            )
            .route(
                "/gender",
                counted(hits.clone(), json!({ "gender": "male", "probability": 0.98 })),
            )
            .route(
                "/nationality",
                counted(hits.clone(), json!({ "country": [] })),
            );
        Self { router, hits }
    }

    /// The gender lookup never answers within the test deadline.
    pub fn with_stalled_gender() -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(
                "/age",
                counted(hits.clone(), json!({ "age": 42, "count": 1234 })),
            )
            .route("/gender", stalled(hits.clone()))
            .route(
                "/nationality",
                counted(
                    hits.clone(),
                    json!({ "country": [{ "country_id": "UA", "probability": 0.42 }] }),
                ),
            );
        Self { router, hits }
    }

    /// Bind to an ephemeral port and serve until the test runtime shuts down.
    async fn spawn(self) -> anyhow::Result<(String, Arc<AtomicUsize>)> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, self.router).await;
        });
        Ok((format!("http://{addr}"), self.hits))
    }
}

fn counted(hits: Arc<AtomicUsize>, body: Value) -> MethodRouter {
    get(move || {
        let hits = hits.clone();
        let body = body.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            Json(body)
        }
    })
}

fn stalled(hits: Arc<AtomicUsize>) -> MethodRouter {
    get(move || {
        let hits = hits.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            // Far beyond the harness lookup deadline.
            tokio::time::sleep(Duration::from_secs(30)).await;
            Json(json!({ "gender": "male" }))
        }
    })
}

/// A fully wired application under test.
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    lookup_hits: Arc<AtomicUsize>,
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Body>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        self.request_with_extra_headers(method, path, body, &[])
            .await
    }

    pub async fn request_with_extra_headers(
        &self,
        method: Method,
        path: &str,
        body: Option<Body>,
        extra_headers: &[(&str, &str)],
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let mut builder = Request::builder().method(method).uri(path);
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        for (name, value) in extra_headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(body.unwrap_or_else(Body::empty))?;

        let response = self.router.clone().oneshot(request).await?;

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;

        Ok((status, headers, bytes))
    }

    /// How many requests the lookup stub has served so far.
    pub fn lookup_hits(&self) -> usize {
        self.lookup_hits.load(Ordering::SeqCst)
    }
}

/// Run a test against an app whose lookups always succeed.
pub async fn with_test_app<F>(test: F) -> anyhow::Result<()>
where
    F: FnOnce(TestApp) -> BoxFuture<'static, anyhow::Result<()>>,
{
    with_test_app_with_lookups(LookupStub::happy(), test).await
}

/// Run a test against an app wired to the given lookup stub.
///
/// Each invocation creates its own database so tests can run concurrently;
/// the database is dropped afterwards even when the test fails.
pub async fn with_test_app_with_lookups<F>(stub: LookupStub, test: F) -> anyhow::Result<()>
where
    F: FnOnce(TestApp) -> BoxFuture<'static, anyhow::Result<()>>,
{
    let mut config = Config::load()?;

    let Some(admin_url) = config.database.test_database_url.clone() else {
        eprintln!(
            "Skipping test: set CENSUS__DATABASE__TEST_DATABASE_URL to run database-backed tests"
        );
        return Ok(());
    };

    let db_name = format!("census_test_{}", Uuid::new_v4().simple());
    create_database(&admin_url, &db_name).await?;

    let (lookup_base, lookup_hits) = stub.spawn().await?;

    config.database.url = with_database_name(&admin_url, &db_name);
    config.lookup.age_url = format!("{lookup_base}/age");
    config.lookup.gender_url = format!("{lookup_base}/gender");
    config.lookup.nationality_url = format!("{lookup_base}/nationality");
    // Short shared deadline so stalled-lookup tests fail fast.
    config.lookup.timeout_seconds = 2;

    let state = AppState::new_with_options(
        config,
        AppStateOptions {
            run_migrations: true,
        },
    )
    .await?;

    let router = create_router(state.clone());

    let app = TestApp {
        state: state.clone(),
        router,
        lookup_hits,
    };

    let result = test(app).await;

    state.db_pool.close().await;
    if let Err(e) = drop_database(&admin_url, &db_name).await {
        eprintln!("Failed to drop test database {db_name}: {e}");
    }

    result
}

pub fn to_json_body(value: &Value) -> anyhow::Result<Body> {
    Ok(Body::from(serde_json::to_vec(value)?))
}

pub fn assert_status(got: StatusCode, want: StatusCode, context: &str) {
    assert_eq!(got, want, "unexpected status for {context}");
}

/// Insert a person row directly, bypassing enrichment. For seeding list and
/// filter tests.
pub async fn insert_person(
    pool: &PgPool,
    name: &str,
    surname: &str,
    patronymic: Option<&str>,
    age: i32,
    gender: &str,
    nationality: &str,
) -> anyhow::Result<i64> {
    let row = sqlx::query(
        "INSERT INTO persons (name, surname, patronymic, age, gender, nationality)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id",
    )
    .bind(name)
    .bind(surname)
    .bind(patronymic)
    .bind(age)
    .bind(gender)
    .bind(nationality)
    .fetch_one(pool)
    .await?;

    Ok(row.get("id"))
}

async fn create_database(admin_url: &str, db_name: &str) -> anyhow::Result<()> {
    let mut conn = PgConnection::connect(admin_url).await?;
    sqlx::query(&format!(r#"CREATE DATABASE "{db_name}""#))
        .execute(&mut conn)
        .await?;
    Ok(())
}

async fn drop_database(admin_url: &str, db_name: &str) -> anyhow::Result<()> {
    let mut conn = PgConnection::connect(admin_url).await?;
    sqlx::query(&format!(r#"DROP DATABASE IF EXISTS "{db_name}""#))
        .execute(&mut conn)
        .await?;
    Ok(())
}

/// Swap the database name of a connection URL, keeping any query string.
fn with_database_name(admin_url: &str, db_name: &str) -> String {
    let (base, query) = match admin_url.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (admin_url, None),
    };

    let authority_start = base.find("://").map(|i| i + 3).unwrap_or(0);
    let without_path = match base[authority_start..].find('/') {
        Some(i) => &base[..authority_start + i],
        None => base,
    };

    match query {
        Some(query) => format!("{without_path}/{db_name}?{query}"),
        None => format!("{without_path}/{db_name}"),
    }
}
