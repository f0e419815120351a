//! Database layer for Escola.
//!
//! Provides SQLite connection pooling (via `r2d2`), the single-statement
//! [`Gateway`] every HTTP handler goes through, and the fixed statement set
//! for students, subjects and enrollments.
//!
//! # Design decisions
//!
//! - **One statement per call**: each gateway call acquires a pooled
//!   connection, runs one parameterized statement, commits if it writes and
//!   releases the connection on every exit path. There are no multi-statement
//!   transactions.
//! - **Typed failures**: not-found is a normal result (`None` or zero rows
//!   affected). Connectivity and statement failures are [`GatewayError`] so
//!   callers can tell them apart from absence.
//! - **Pre-existing schema**: the store is expected to carry its tables.
//!   [`ensure_schema`] exists for development stores and tests.

mod enrollments;
mod gateway;
mod pool;
mod schema;
mod students;
mod subjects;

pub use enrollments::{delete_enrollment, get_enrollment, insert_enrollment, list_enrollments};
pub use gateway::{Gateway, GatewayError, Statement, WriteOutcome};
pub use pool::{create_pool, DbPool, DbSettings, PoolError};
pub use schema::{ensure_schema, missing_tables, SchemaError};
pub use students::{delete_student, get_student, insert_student, list_students, update_student};
pub use subjects::{delete_subject, get_subject, insert_subject, list_subjects, update_subject};
