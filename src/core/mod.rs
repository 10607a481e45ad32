//! Core business logic - framework-agnostic operations over the expense store.
//!
//! Everything in this module takes a database connection and explicit inputs
//! (including "now" where time matters) and returns structured results, so it
//! can be driven equally by the scheduler, the CLI, or tests.

/// Budget CRUD and spending-progress aggregation
pub mod budget;
/// Category CRUD with per-user name uniqueness
pub mod category;
/// Expense store operations: CRUD, template queries, occurrence creation
pub mod expense;
/// Idempotent catch-up generation of recurring occurrences
pub mod generator;
/// Pure recurrence date arithmetic and continuation policy
pub mod recurrence;
/// Historical monthly spending aggregation
pub mod report;
