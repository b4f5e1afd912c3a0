//! Core business logic for LeaveFlow.
//!
//! This crate contains the leave workflow with ZERO web dependencies.
//! Domain types, validation rules and balance arithmetic live here; storage
//! is reached only through the traits in [`repository`].
//!
//! # Modules
//!
//! - `leave` - Leave request types and the three-stage approval state machine
//! - `ledger` - Per-employee allotment and consumption
//! - `auth` - Password hashing and staff roles
//! - `directory` - Staff records
//! - `manager` - Workflow wired to storage, ledger and locks
//! - `export` - Rows for the spreadsheet export
//! - `repository` - Storage traits and the in-memory store

pub mod auth;
pub mod directory;
pub mod export;
pub mod leave;
pub mod ledger;
pub mod locks;
pub mod manager;
pub mod repository;

pub use manager::{LeaveManager, RequestFilter};
