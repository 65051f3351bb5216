//! Account kinds.

use crate::macros::wire_enum;

wire_enum! {
    /// Kind of money holder a user tracks.
    pub enum AccountType {
        /// Checking account.
        Checking => "checking",
        /// Savings account.
        Savings => "savings",
        /// Credit line.
        Credit => "credit",
        /// Brokerage or investment account.
        Investment => "investment",
        /// Physical cash.
        Cash => "cash",
        /// Credit card.
        CreditCard => "credit_card",
        /// Anything else.
        Other => "other",
    }
}
