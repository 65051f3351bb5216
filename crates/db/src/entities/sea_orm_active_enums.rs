//! String-backed enums shared by the entities.
//!
//! Each mirrors a domain enum and converts to and from it losslessly.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use financeflow_core::account::AccountType as CoreAccountType;
use financeflow_core::budget::BudgetPeriod as CoreBudgetPeriod;
use financeflow_core::category::CategoryKind;
use financeflow_core::transaction::{
    FixedFrequency as CoreFixedFrequency, TransactionKind, TransactionStatus as CoreStatus,
};
use financeflow_shared::UserRole as CoreUserRole;

/// Generates `From` conversions between a column enum and its domain enum.
macro_rules! mirror {
    ($db:ident <=> $core:ident { $($variant:ident => $core_variant:ident),+ $(,)? }) => {
        impl From<$core> for $db {
            fn from(value: $core) -> Self {
                match value {
                    $($core::$core_variant => Self::$variant,)+
                }
            }
        }

        impl From<$db> for $core {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$core_variant,)+
                }
            }
        }
    };
}

/// Role column of `users`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "user")]
    User,
}

mirror!(UserRole <=> CoreUserRole { Admin => Admin, User => User });

/// Type column of `accounts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AccountType {
    #[sea_orm(string_value = "checking")]
    Checking,
    #[sea_orm(string_value = "savings")]
    Savings,
    #[sea_orm(string_value = "credit")]
    Credit,
    #[sea_orm(string_value = "investment")]
    Investment,
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "credit_card")]
    CreditCard,
    #[sea_orm(string_value = "other")]
    Other,
}

mirror!(AccountType <=> CoreAccountType {
    Checking => Checking,
    Savings => Savings,
    Credit => Credit,
    Investment => Investment,
    Cash => Cash,
    CreditCard => CreditCard,
    Other => Other,
});

/// Type column of `categories`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum CategoryType {
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "expense")]
    Expense,
}

mirror!(CategoryType <=> CategoryKind { Income => Income, Expense => Expense });

/// Type column of `transactions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TransactionType {
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "expense")]
    Expense,
    #[sea_orm(string_value = "transfer")]
    Transfer,
}

mirror!(TransactionType <=> TransactionKind {
    Income => Income,
    Expense => Expense,
    Transfer => Transfer,
});

/// Status column of `transactions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TransactionStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

mirror!(TransactionStatus <=> CoreStatus {
    Pending => Pending,
    Completed => Completed,
    Cancelled => Cancelled,
});

/// Recurrence column of `transactions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum FixedFrequency {
    #[sea_orm(string_value = "weekly")]
    Weekly,
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

mirror!(FixedFrequency <=> CoreFixedFrequency {
    Weekly => Weekly,
    Monthly => Monthly,
    Yearly => Yearly,
});

/// Period column of `budgets`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum BudgetPeriod {
    #[sea_orm(string_value = "weekly")]
    Weekly,
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

mirror!(BudgetPeriod <=> CoreBudgetPeriod {
    Weekly => Weekly,
    Monthly => Monthly,
    Yearly => Yearly,
});
