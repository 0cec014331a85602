use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unit of work scoped to a department.
///
/// The department reference is fixed at creation. `person_id` is set only
/// through allocation, which requires the person to belong to the task's
/// department — the one invariant-bearing transition in the engine.
///
/// `finished` is a flag, not a terminal state: a task may be finished
/// while unassigned, and a finished task may still be allocated. Both are
/// deliberate; tests pin them down.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Calendar date the task is due; drives the pending-task ordering.
    pub deadline: NaiveDate,
    /// Effort/cost measure summed and averaged by the reporting views.
    pub duration: i64,
    pub finished: bool,
    pub department_id: Uuid,
    /// Present only after allocation.
    pub person_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task. The department must already exist.
///
/// `person_id` is accepted on the wire but ignored: new tasks always start
/// unassigned and only `allocate_task` may bind a person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskInput {
    pub title: String,
    pub description: String,
    pub deadline: NaiveDate,
    pub duration: i64,
    #[serde(default)]
    pub finished: bool,
    pub department_id: Uuid,
    #[serde(default)]
    pub person_id: Option<Uuid>,
}

/// Input for allocating a person to a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocateTaskInput {
    pub person_id: Uuid,
}
