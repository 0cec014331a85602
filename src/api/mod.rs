mod handlers;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Database;

pub fn create_router(db: Database) -> Router {
    Router::new()
        // Departments
        .route("/departments", get(handlers::list_departments))
        .route("/departments", post(handlers::create_department))
        .route("/departments/{id}", get(handlers::get_department))
        .route("/departments/{id}", put(handlers::update_department))
        .route("/departments/{id}", delete(handlers::delete_department))
        // People
        .route("/people", get(handlers::list_people))
        .route("/people", post(handlers::create_person))
        .route("/people/expenses", get(handlers::list_person_expenses))
        .route("/people/{id}", get(handlers::get_person))
        .route("/people/{id}", put(handlers::update_person))
        .route("/people/{id}", delete(handlers::delete_person))
        // Tasks
        .route("/tasks", get(handlers::list_tasks))
        .route("/tasks", post(handlers::create_task))
        .route("/tasks/pending", get(handlers::list_pending_tasks))
        .route("/tasks/{id}", get(handlers::get_task))
        .route("/tasks/allocate/{id}", put(handlers::allocate_task))
        .route("/tasks/finish/{id}", put(handlers::finish_task))
        .route("/tasks/{id}", delete(handlers::delete_task))
        // Health
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(db)
}
