use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A member of exactly one department. Names carry no uniqueness
/// constraint; the expense report filters by exact name match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub name: String,
    pub department_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new person. The department must already exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePersonInput {
    pub name: String,
    pub department_id: Uuid,
}

/// Input for updating a person. Both fields are overwritten; moving a
/// person to another department releases their allocated tasks back to
/// the unassigned pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePersonInput {
    pub name: String,
    pub department_id: Uuid,
}

/// Aggregate view of a person with at least one allocated task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonSummary {
    pub id: Uuid,
    pub name: String,
    /// Title of the person's department.
    pub department: String,
    /// Sum of durations across the person's tasks.
    pub total_duration: i64,
}

/// Expense view: arithmetic mean of task durations for a person with at
/// least one task, filtered by exact name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonExpense {
    pub id: Uuid,
    pub name: String,
    pub avg_duration: f64,
}
