//! Shared types, errors, and configuration for LeaveFlow.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for leave requests and cancellations
//! - Employee codes
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and token service

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

#[cfg(test)]
mod error_tests;
#[cfg(test)]
mod jwt_tests;

pub use auth::{Claims, LoginRequest, LoginResponse, StaffInfo};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
