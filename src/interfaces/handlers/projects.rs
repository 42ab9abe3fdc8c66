use std::collections::HashMap;

use actix_multipart::form::MultipartForm;
use actix_web::error::ResponseError;
use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::entities::project::NewProjectForm;
use crate::errors::AppError;
use crate::AppState;

/// Creates one project per call. The optional `image` part is validated
/// and persisted before the row is written; no authorization is applied
/// on this route.
pub async fn add_project(
    state: web::Data<AppState>,
    MultipartForm(mut form): MultipartForm<NewProjectForm>,
) -> impl Responder {
    let image = match form.image.take() {
        Some(file) => match state.image_store.save(&file).await {
            Ok(name) => Some(name),
            Err(e) => {
                tracing::warn!("Rejected project image: {}", e);
                return e.error_response();
            }
        },
        None => None,
    };

    match state.project_handler.create_project(form, image).await {
        Ok(response) => HttpResponse::Created().json(response),
        Err(e @ AppError::ValidationError(_)) => e.to_http_response(),
        Err(e) => {
            tracing::error!("Project creation failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to create project"
            }))
        }
    }
}

#[instrument(skip(state, query))]
pub async fn get_all_projects(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let page = query.get("page").and_then(|v| v.parse::<u32>().ok()).unwrap_or(1);
    let per_page = query.get("per_page")
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(10)
        .min(100);

    let projects = state.project_handler.get_all_projects(page, per_page).await?;

    Ok(HttpResponse::Ok().json(projects))
}

#[instrument(skip(state))]
pub async fn get_project_by_id(
    project_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.get_project_by_id(&project_id).await?;
    Ok(HttpResponse::Ok().json(project))
}
