//! University handlers: list and read. Universities are read-only through the API.

use crate::error::{AppError, ErrorBody};
use crate::extractors::ValidQuery;
use crate::handlers::parse_id;
use crate::model::{University, UniversityQuery};
use crate::service::CrudService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

#[utoipa::path(
    get,
    path = "/universites/",
    params(UniversityQuery),
    responses(
        (status = 200, description = "Universities matching the filters", body = [University]),
        (status = 422, description = "Invalid paging parameters", body = ErrorBody)
    )
)]
pub async fn list_universities(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<UniversityQuery>,
) -> Result<Json<Vec<University>>, AppError> {
    let mut conn = state.connection().await?;
    let rows = CrudService::list_universities(&mut conn, &query).await?;
    let settings = &state.settings;
    Ok(Json(
        rows.into_iter()
            .map(|row| University::from_row(row, |id| settings.student_url(id)))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/universite/{id}",
    params(("id" = i64, Path, description = "University id")),
    responses(
        (status = 200, description = "The university", body = University),
        (status = 404, description = "No university with that id", body = ErrorBody)
    )
)]
pub async fn read_university(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<University>, AppError> {
    let id = parse_id(&id_str)?;
    let mut conn = state.connection().await?;
    let row = CrudService::read_university(&mut conn, id)
        .await?
        .ok_or_else(AppError::university_not_found)?;
    Ok(Json(University::from_row(row, |id| state.settings.student_url(id))))
}
