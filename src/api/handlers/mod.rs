use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::Database;
use crate::error::Error;
use crate::models::*;

// ============================================================
// Error Handling
// ============================================================

/// Map a typed engine error to a transport status.
///
/// Business failures keep their message; storage faults are logged
/// server-side and the client only sees a generic message to avoid
/// leaking internal details.
fn error_response(e: Error) -> (StatusCode, String) {
    match &e {
        Error::NotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
        Error::Conflict { .. } | Error::InUse { .. } => (StatusCode::CONFLICT, e.to_string()),
        Error::DepartmentMismatch => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        Error::Storage(err) => {
            tracing::error!("Storage error: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Departments
// ============================================================

pub async fn list_departments(
    State(db): State<Database>,
) -> Result<Json<Vec<DepartmentSummary>>, (StatusCode, String)> {
    db.department_summaries().map(Json).map_err(error_response)
}

pub async fn create_department(
    State(db): State<Database>,
    Json(input): Json<CreateDepartmentInput>,
) -> Result<(StatusCode, Json<Department>), (StatusCode, String)> {
    db.create_department(input)
        .map(|d| (StatusCode::CREATED, Json(d)))
        .map_err(error_response)
}

pub async fn get_department(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<Department>>, (StatusCode, String)> {
    db.get_department(id).map(Json).map_err(error_response)
}

pub async fn update_department(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateDepartmentInput>,
) -> Result<Json<Department>, (StatusCode, String)> {
    db.update_department(id, input)
        .map(Json)
        .map_err(error_response)
}

pub async fn delete_department(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<String, (StatusCode, String)> {
    db.delete_department(id)
        .map(|_| "Department deleted successfully".to_string())
        .map_err(error_response)
}

// ============================================================
// People
// ============================================================

pub async fn list_people(
    State(db): State<Database>,
) -> Result<Json<Vec<PersonSummary>>, (StatusCode, String)> {
    db.person_summaries().map(Json).map_err(error_response)
}

/// Query parameters for the expense report.
#[derive(Debug, Deserialize)]
pub struct ExpensesQuery {
    /// Exact person name to report on.
    pub name: String,
}

pub async fn list_person_expenses(
    State(db): State<Database>,
    Query(query): Query<ExpensesQuery>,
) -> Result<Json<Vec<PersonExpense>>, (StatusCode, String)> {
    db.person_expenses(&query.name)
        .map(Json)
        .map_err(error_response)
}

pub async fn create_person(
    State(db): State<Database>,
    Json(input): Json<CreatePersonInput>,
) -> Result<(StatusCode, Json<Person>), (StatusCode, String)> {
    db.create_person(input)
        .map(|p| (StatusCode::CREATED, Json(p)))
        .map_err(error_response)
}

pub async fn get_person(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<Person>>, (StatusCode, String)> {
    db.get_person(id).map(Json).map_err(error_response)
}

pub async fn update_person(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdatePersonInput>,
) -> Result<Json<Person>, (StatusCode, String)> {
    db.update_person(id, input).map(Json).map_err(error_response)
}

pub async fn delete_person(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<String, (StatusCode, String)> {
    db.delete_person(id)
        .map(|_| "Person deleted successfully".to_string())
        .map_err(error_response)
}

// ============================================================
// Tasks
// ============================================================

pub async fn list_tasks(
    State(db): State<Database>,
) -> Result<Json<Vec<Task>>, (StatusCode, String)> {
    db.get_all_tasks().map(Json).map_err(error_response)
}

pub async fn list_pending_tasks(
    State(db): State<Database>,
) -> Result<Json<Vec<Task>>, (StatusCode, String)> {
    db.pending_tasks().map(Json).map_err(error_response)
}

pub async fn create_task(
    State(db): State<Database>,
    Json(input): Json<CreateTaskInput>,
) -> Result<(StatusCode, Json<Task>), (StatusCode, String)> {
    db.create_task(input)
        .map(|t| (StatusCode::CREATED, Json(t)))
        .map_err(error_response)
}

pub async fn get_task(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<Task>>, (StatusCode, String)> {
    db.get_task(id).map(Json).map_err(error_response)
}

pub async fn allocate_task(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(input): Json<AllocateTaskInput>,
) -> Result<Json<Task>, (StatusCode, String)> {
    db.allocate_task(id, input.person_id)
        .map(Json)
        .map_err(error_response)
}

pub async fn finish_task(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, (StatusCode, String)> {
    db.finish_task(id).map(Json).map_err(error_response)
}

pub async fn delete_task(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<String, (StatusCode, String)> {
    db.delete_task(id)
        .map(|_| "Task deleted successfully".to_string())
        .map_err(error_response)
}
