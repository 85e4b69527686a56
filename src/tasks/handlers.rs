use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: String,
    pub completed: bool,
}

/// GET /tasks/all — todos straight from the external API, nothing stored.
pub async fn fetch_all(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    debug!("{} requested external todos", user.0.email);

    let todos = state.tasks.fetch_remote().await?;
    if todos.is_empty() {
        return Ok(HttpResponse::NoContent().finish());
    }
    Ok(HttpResponse::Ok().json(todos))
}

/// GET /tasks/fetch-and-store — pull the external todos into the store.
pub async fn fetch_and_store(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("{} triggered external todo sync", user.0.email);

    let stored = state.tasks.fetch_and_store().await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Tasks stored successfully.",
        "stored": stored
    })))
}

/// GET /tasks/ — every stored task.
pub async fn list(
    _user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let tasks = state.tasks.list().await?;
    if tasks.is_empty() {
        return Ok(HttpResponse::NoContent().finish());
    }
    Ok(HttpResponse::Ok().json(tasks))
}

/// GET /tasks/paginated?page=0&size=10
pub async fn paginated(
    _user: AuthenticatedUser,
    params: web::Query<PageParams>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let page = state
        .tasks
        .page(params.page.unwrap_or(0), params.size.unwrap_or(10))
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /tasks/grouped — tasks split into completed and pending.
pub async fn grouped(
    _user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let groups = state.tasks.grouped().await?;
    Ok(HttpResponse::Ok().json(groups))
}

/// GET /tasks/{id}
pub async fn get_by_id(
    _user: AuthenticatedUser,
    id: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let task = state.tasks.get(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// PUT /tasks/{id}
pub async fn update(
    _user: AuthenticatedUser,
    id: web::Path<i64>,
    req: web::Json<UpdateTaskRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let task = state
        .tasks
        .update(id.into_inner(), &req.title, req.completed)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// DELETE /tasks/{id}
pub async fn delete(
    _user: AuthenticatedUser,
    id: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    state.tasks.delete(id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Task {} deleted successfully.", id)
    })))
}
