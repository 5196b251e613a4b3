//! University and student routes. Paths keep their trailing slashes (`/universites/`, `/etudiant/`).

use crate::handlers::student::{create_student, delete_student, list_students, read_student, update_student};
use crate::handlers::university::{list_universities, read_university};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn entity_routes(state: AppState) -> Router {
    Router::new()
        .route("/universites/", get(list_universities))
        .route("/universite/:id", get(read_university))
        .route("/etudiants/", get(list_students))
        .route("/etudiant/", post(create_student))
        .route(
            "/etudiant/:id",
            get(read_student).put(update_student).delete(delete_student),
        )
        .with_state(state)
}
