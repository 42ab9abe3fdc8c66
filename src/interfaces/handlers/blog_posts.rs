use std::collections::HashMap;

use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::entities::blog_post::NewBlogPostRequest;
use crate::errors::AppError;
use crate::use_cases::extractors::AdminSession;
use crate::AppState;

#[instrument(skip(_session, state, data))]
pub async fn create_blog_post(
    _session: AdminSession,
    state: web::Data<AppState>,
    data: web::Json<NewBlogPostRequest>,
) -> Result<impl Responder, AppError> {
    let response = state
        .blog_handler
        .create_blog_post(data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(state, query))]
pub async fn get_all_blog_posts(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let page = query.get("page").and_then(|v| v.parse::<u32>().ok()).unwrap_or(1);
    let per_page = query.get("per_page")
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(10)
        .min(100);

    let (posts, total) = state.blog_handler.get_all_blog_posts(page, per_page).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "posts": posts,
        "total": total,
        "page": page,
        "per_page": per_page
    })))
}

#[instrument(skip(state))]
pub async fn get_blog_post_by_slug(
    slug: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let post = state.blog_handler.get_blog_post_by_slug(&slug).await?;
    Ok(HttpResponse::Ok().json(post))
}
