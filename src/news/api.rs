//! News API Endpoints
//! Mission: Public reads, bearer-protected writes

use crate::auth::models::{Claims, MessageResponse};
use crate::error::ServiceError;
use crate::news::{
    models::{
        CreateNewsRequest, CreatedResponse, ListNewsQuery, News, NewsListResponse, NewsPatch,
        PageRequest, DEFAULT_PAGE, DEFAULT_PAGE_SIZE,
    },
    service::NewsService,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

/// Shared news state
#[derive(Clone)]
pub struct NewsState {
    pub news_service: Arc<NewsService>,
}

fn parse_page_param(raw: Option<&str>, default: i64, name: &str) -> Result<i64, ServiceError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse::<i64>()
            .map_err(|_| ServiceError::validation(format!("{} must be an integer", name))),
    }
}

/// List news - GET /api/v1/news?title=&page=&pageSize=
pub async fn list_news(
    State(state): State<NewsState>,
    query: Result<Query<ListNewsQuery>, QueryRejection>,
) -> Result<Json<NewsListResponse>, ServiceError> {
    let Query(query) = query?;

    let page = PageRequest::new(
        parse_page_param(query.page.as_deref(), DEFAULT_PAGE, "page")?,
        parse_page_param(query.page_size.as_deref(), DEFAULT_PAGE_SIZE, "pageSize")?,
    );
    let title = query.title.unwrap_or_default();

    let result = state.news_service.list(&title, page)?;
    Ok(Json(result.into()))
}

/// Get one article - GET /api/v1/news/:id
pub async fn get_news(
    State(state): State<NewsState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<News>, ServiceError> {
    let Path(id) = id?;
    Ok(Json(state.news_service.get(id)?))
}

/// Create article - POST /api/v1/news (auth required)
pub async fn create_news(
    State(state): State<NewsState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CreateNewsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ServiceError> {
    let Json(payload) = payload?;

    // Author always comes from the validated token
    let news = state
        .news_service
        .create(&payload.title, &payload.content, claims.user_id)?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "News created successfully".to_string(),
            id: news.id,
        }),
    ))
}

/// Update article - PUT /api/v1/news/:id (author or admin)
pub async fn update_news(
    State(state): State<NewsState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NewsPatch>, JsonRejection>,
) -> Result<Json<MessageResponse>, ServiceError> {
    let Path(id) = id?;
    let Json(patch) = payload?;

    state
        .news_service
        .update(id, &patch, claims.user_id, claims.role)?;

    Ok(Json(MessageResponse {
        message: "News updated successfully".to_string(),
    }))
}

/// Delete article - DELETE /api/v1/news/:id (author or admin)
pub async fn delete_news(
    State(state): State<NewsState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ServiceError> {
    let Path(id) = id?;

    state
        .news_service
        .delete(id, claims.user_id, claims.role)?;

    Ok(Json(MessageResponse {
        message: "News deleted successfully".to_string(),
    }))
}
