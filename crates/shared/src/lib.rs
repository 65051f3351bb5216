//! Shared types, errors, and configuration for FinanceFlow.
//!
//! This crate provides common types used across all other crates:
//! - Money conversion between decimals and stored minor units
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - JWT issuing and validation

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

#[cfg(test)]
mod error_tests;
#[cfg(test)]
mod jwt_tests;

pub use auth::{Claims, UserRole};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
