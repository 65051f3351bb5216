//! Common types used across the application.

pub mod money;
pub mod pagination;


pub use money::{MoneyError, from_minor_units, to_minor_units};
pub use pagination::{PageMeta, PageRequest, PageResponse};
