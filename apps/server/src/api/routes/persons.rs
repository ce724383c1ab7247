use crate::api::handlers::persons;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn person_routes() -> Router<AppState> {
    Router::new()
        // Collection: create, filtered list, merge-update
        .route(
            "/persons",
            post(persons::create_person)
                .get(persons::list_persons)
                .put(persons::update_person),
        )
        // Single record by id
        .route(
            "/persons/:id",
            get(persons::get_person).delete(persons::delete_person),
        )
}
