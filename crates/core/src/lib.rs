//! Core business logic for FinanceFlow.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `account` - Account kinds
//! - `transaction` - Transaction records and validation rules
//! - `category` - Category kinds and name uniqueness keys
//! - `repository` - Storage traits the recalculation services run against
//! - `balance` - Balance recalculation and balance history
//! - `budget` - Budget spent aggregation and derived metrics
//! - `reports` - Period summaries and category statistics
//! - `forecast` - Projection of fixed transactions
//! - `export` - CSV export in Brazilian locale
//! - `auth` - Password hashing

mod macros;

pub mod account;
pub mod auth;
pub mod balance;
pub mod budget;
pub mod category;
pub mod export;
pub mod forecast;
pub mod reports;
pub mod repository;
pub mod transaction;

#[cfg(test)]
pub(crate) mod testing;
