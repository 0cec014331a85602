//! Taskboard: department-scoped task tracking and allocation.
//!
//! The engine lives in [`db::Database`]: invariant-checked task
//! transitions (creation, person allocation, completion) and the aggregate
//! reporting views over departments and people. [`api`] is the thin HTTP
//! boundary that maps typed engine errors to status codes.

pub mod api;
pub mod db;
pub mod error;
pub mod models;
