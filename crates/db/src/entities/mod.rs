//! `SeaORM` entity definitions.
//!
//! Money columns hold integer minor units (cents) and carry a `_cents` suffix.

pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod sea_orm_active_enums;
pub mod transactions;
pub mod users;
