//! Student handlers: list, create, read, update, delete.

use crate::error::{AppError, ErrorBody};
use crate::extractors::{ValidJson, ValidQuery};
use crate::handlers::parse_id;
use crate::model::{NewStudent, Student, StudentPatch, StudentQuery};
use crate::service::CrudService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

#[utoipa::path(
    get,
    path = "/etudiants/",
    params(StudentQuery),
    responses((status = 200, description = "Students matching every supplied filter", body = [Student]))
)]
pub async fn list_students(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<StudentQuery>,
) -> Result<Json<Vec<Student>>, AppError> {
    let mut conn = state.connection().await?;
    let rows = CrudService::list_students(&mut conn, &query).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    post,
    path = "/etudiant/",
    request_body = NewStudent,
    responses(
        (status = 200, description = "The created student", body = Student),
        (status = 422, description = "Missing or invalid fields", body = ErrorBody)
    )
)]
pub async fn create_student(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<NewStudent>,
) -> Result<Json<Student>, AppError> {
    let mut conn = state.connection().await?;
    let student = CrudService::create_student(&mut conn, &body).await?;
    tracing::info!(id = student.id, universite_id = student.universite_id, "student created");
    Ok(Json(student))
}

#[utoipa::path(
    get,
    path = "/etudiant/{id}",
    params(("id" = i64, Path, description = "Student id")),
    responses(
        (status = 200, description = "The student", body = Student),
        (status = 404, description = "No student with that id", body = ErrorBody)
    )
)]
pub async fn read_student(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<Student>, AppError> {
    let id = parse_id(&id_str)?;
    let mut conn = state.connection().await?;
    let student = CrudService::read_student(&mut conn, id)
        .await?
        .ok_or_else(AppError::student_not_found)?;
    Ok(Json(student))
}

#[utoipa::path(
    put,
    path = "/etudiant/{id}",
    params(("id" = i64, Path, description = "Student id")),
    request_body = StudentPatch,
    responses(
        (status = 200, description = "The updated student", body = Student),
        (status = 404, description = "No student with that id", body = ErrorBody),
        (status = 422, description = "Invalid fields", body = ErrorBody)
    )
)]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    ValidJson(patch): ValidJson<StudentPatch>,
) -> Result<Json<Student>, AppError> {
    let id = parse_id(&id_str)?;
    let mut conn = state.connection().await?;
    let student = CrudService::update_student(&mut conn, id, patch)
        .await?
        .ok_or_else(AppError::student_not_found)?;
    Ok(Json(student))
}

#[utoipa::path(
    delete,
    path = "/etudiant/{id}",
    params(("id" = i64, Path, description = "Student id")),
    responses(
        (status = 204, description = "Plain-text confirmation", content_type = "text/plain", body = String),
        (status = 404, description = "No student with that id", body = ErrorBody)
    )
)]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<(StatusCode, String), AppError> {
    let id = parse_id(&id_str)?;
    let mut conn = state.connection().await?;
    if !CrudService::delete_student(&mut conn, id).await? {
        return Err(AppError::student_not_found());
    }
    tracing::info!(id, "student deleted");
    Ok((
        StatusCode::NO_CONTENT,
        format!("Étudiant avec l'ID {} supprimé avec succès", id),
    ))
}
