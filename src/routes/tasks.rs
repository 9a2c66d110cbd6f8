use crate::{
    auth::AuthenticatedAccountId,
    error::AppError,
    models::{TaskChanges, TaskInput, TaskUpdateInput, TasksResponse},
    services::TaskService,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use validator::Validate;

/// Lists the caller's tasks, newest first.
///
/// ## Responses:
/// - `200 OK`: `{"tasks": [...]}`, possibly empty.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
#[get("")]
pub async fn get_tasks(
    tasks: web::Data<TaskService>,
    caller: AuthenticatedAccountId,
) -> Result<impl Responder, AppError> {
    let tasks = tasks.list(caller.0).await?;
    Ok(HttpResponse::Ok().json(TasksResponse { tasks }))
}

/// Creates a new, open task owned by the caller.
///
/// ## Request Body:
/// - `title`: 1 to 200 characters.
/// - `description` (optional): up to 1000 characters.
///
/// ## Responses:
/// - `201 Created`: the stored task.
/// - `400 Bad Request`: undecodable body.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `422 Unprocessable Entity`: If input validation fails.
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskService>,
    caller: AuthenticatedAccountId,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = tasks
        .create(caller.0, &task_data.title, &task_data.description)
        .await?;

    Ok(HttpResponse::Created().json(task))
}

/// Retrieves one of the caller's tasks.
///
/// ## Responses:
/// - `200 OK`: the task.
/// - `400 Bad Request`: non-numeric id.
/// - `404 Not Found`: missing, or owned by another account.
#[get("/{id}")]
pub async fn get_task(
    tasks: web::Data<TaskService>,
    caller: AuthenticatedAccountId,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let task = tasks.get(task_id.into_inner(), caller.0).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Replaces title, description and status of one of the caller's tasks.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `404 Not Found`: missing, or owned by another account.
/// - `422 Unprocessable Entity`: If input validation fails.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<TaskService>,
    caller: AuthenticatedAccountId,
    task_id: web::Path<i64>,
    task_data: web::Json<TaskUpdateInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let changes = TaskChanges::from_input(task_id.into_inner(), caller.0, task_data.into_inner());
    let task = tasks.update(changes).await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Marks one of the caller's tasks as completed. No body.
#[patch("/{id}/complete")]
pub async fn complete_task(
    tasks: web::Data<TaskService>,
    caller: AuthenticatedAccountId,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let task = tasks.complete(task_id.into_inner(), caller.0).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes one of the caller's tasks.
///
/// ## Responses:
/// - `204 No Content`: On successful deletion.
/// - `404 Not Found`: missing, or owned by another account.
#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<TaskService>,
    caller: AuthenticatedAccountId,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    tasks.delete(task_id.into_inner(), caller.0).await?;
    Ok(HttpResponse::NoContent().finish())
}
