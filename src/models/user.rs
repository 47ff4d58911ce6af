//! User model and borrowing eligibility

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// User model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub name: String,
}

impl User {
    /// Maximum concurrent active loans per user.
    pub const MAX_ACTIVE_LOANS: i64 = 3;

    /// Whether the user may take another book, given how many loans they
    /// currently have open. The count comes from the loans repository.
    pub fn can_borrow(&self, active_loan_count: i64) -> bool {
        active_loan_count < Self::MAX_ACTIVE_LOANS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            name: "Ada".to_string(),
        }
    }

    #[test]
    fn can_borrow_below_the_limit() {
        assert!(user().can_borrow(0));
        assert!(user().can_borrow(2));
    }

    #[test]
    fn cannot_borrow_at_or_above_the_limit() {
        assert!(!user().can_borrow(3));
        assert!(!user().can_borrow(4));
    }
}
