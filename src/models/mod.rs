//! Domain models for Taskboard.
//!
//! # Core Concepts
//!
//! - [`Department`]: Organizational unit. People and tasks both belong to
//!   exactly one department; the department owns neither lifecycle.
//! - [`Person`]: A member of a department, eligible for task allocation.
//! - [`Task`]: A unit of work scoped to a department. Unassigned until a
//!   person from the same department is allocated; `finished` is an
//!   orthogonal flag, not a terminal state.
//!
//! Relationships are identifier-based (`department_id`, `person_id`) rather
//! than embedded object graphs, so entities serialize without cycles. The
//! aggregate read views ([`DepartmentSummary`], [`PersonSummary`],
//! [`PersonExpense`]) come from the store's reporting queries and are
//! distinct from raw entity reads.

mod department;
mod person;
mod task;

pub use department::*;
pub use person::*;
pub use task::*;
