//! OpenAPI document and the ReDoc page that renders it.

use crate::error::{ErrorBody, ErrorDetail};
use crate::handlers::{student, university};
use crate::model::{NewStudent, Student, StudentPatch, University};
use axum::{
    response::{Html, Redirect},
    Json,
};
use utoipa::OpenApi;

pub const OPENAPI_PATH: &str = "/openapi.json";
pub const REDOC_PATH: &str = "/redoc";

#[derive(OpenApi)]
#[openapi(
    info(title = "campus-registry", description = "Universities and their students"),
    paths(
        university::list_universities,
        university::read_university,
        student::list_students,
        student::create_student,
        student::read_student,
        student::update_student,
        student::delete_student,
    ),
    components(schemas(University, Student, NewStudent, StudentPatch, ErrorBody, ErrorDetail))
)]
pub struct ApiDoc;

const REDOC_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>campus-registry - ReDoc</title>
    <meta charset="utf-8"/>
    <meta name="viewport" content="width=device-width, initial-scale=1">
  </head>
  <body>
    <redoc spec-url="/openapi.json"></redoc>
    <script src="https://cdn.redoc.ly/redoc/latest/bundles/redoc.standalone.js"></script>
  </body>
</html>
"#;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub async fn redoc() -> Html<&'static str> {
    Html(REDOC_HTML)
}

/// GET / sends clients to the documentation.
pub async fn redirect_to_docs() -> Redirect {
    Redirect::temporary(REDOC_PATH)
}
