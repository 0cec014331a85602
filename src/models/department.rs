use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An organizational unit that people and tasks belong to.
///
/// Titles are unique (case-sensitive, exact match). A department does not
/// own its people or tasks; they merely reference it by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDepartmentInput {
    pub title: String,
}

/// Input for renaming a department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDepartmentInput {
    pub title: String,
}

/// Aggregate view of a department that has at least one person **and** at
/// least one task. Departments missing either relation do not appear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentSummary {
    pub id: Uuid,
    pub title: String,
    /// Distinct people in the department.
    pub person_count: i64,
    /// Distinct tasks in the department.
    pub task_count: i64,
}
