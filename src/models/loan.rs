//! Loan model and the late-fee rule

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book::Book;
use super::user::User;

/// Number of days a book may be kept before fees accrue
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Fee charged per day past the loan period, in cents
pub const LATE_FEE_CENTS_PER_DAY: i64 = 50;

/// Whole calendar days between two instants.
///
/// Day counting is by date difference, not elapsed-hours / 24: a book
/// borrowed late in the evening still ages a full day at midnight.
pub(crate) fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    to.date_naive()
        .signed_duration_since(from.date_naive())
        .num_days()
}

/// Fee owed for a loan running from `from` until `as_of`: zero within the
/// loan period, 0.50 per day beyond it.
pub(crate) fn late_return_fee(from: DateTime<Utc>, as_of: DateTime<Utc>) -> Decimal {
    let days_elapsed = days_between(from, as_of);
    if days_elapsed <= LOAN_PERIOD_DAYS {
        return Decimal::ZERO;
    }
    Decimal::new((days_elapsed - LOAN_PERIOD_DAYS) * LATE_FEE_CENTS_PER_DAY, 2)
}

/// Loan model from database
///
/// References its user and book by identifier; the repositories resolve
/// them. A loan is active while `returned_at` is null. Loans are never
/// deleted by the borrow/return flow, so the table doubles as the lending
/// history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub late_fee: Option<Decimal>,
}

impl Loan {
    /// A loan is active until it has a return timestamp.
    pub fn is_active(&self) -> bool {
        self.returned_at.is_none()
    }

    /// Close the loan: set `returned_at` and store the late fee.
    ///
    /// This is the authoritative fee computation for a completed loan;
    /// both fields are written exactly once, here.
    pub fn mark_returned(&mut self, now: DateTime<Utc>) {
        self.returned_at = Some(now);
        self.late_fee = Some(late_return_fee(self.borrowed_at, now));
    }
}

/// Loan joined with its book title/author and user name for display
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanDetails {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub book_title: String,
    pub book_author: String,
    pub user_name: String,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub late_fee: Option<Decimal>,
}

impl LoanDetails {
    /// Build the display view from a loan and the entities already in hand,
    /// avoiding a re-fetch right after a write.
    pub fn from_parts(loan: Loan, book: &Book, user: &User) -> Self {
        Self {
            id: loan.id,
            user_id: loan.user_id,
            book_id: loan.book_id,
            book_title: book.title.clone(),
            book_author: book.author.clone(),
            user_name: user.name.clone(),
            borrowed_at: loan.borrowed_at,
            returned_at: loan.returned_at,
            late_fee: loan.late_fee,
        }
    }
}

/// An overdue loan decorated with how late it is and the fee it would
/// incur if returned now
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OverdueLoanDetails {
    pub loan: LoanDetails,
    pub days_overdue: i64,
    pub estimated_fee: Decimal,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn loan(borrowed_at: DateTime<Utc>) -> Loan {
        Loan {
            id: 1,
            user_id: 1,
            book_id: 1,
            borrowed_at,
            returned_at: None,
            late_fee: None,
        }
    }

    #[test]
    fn no_fee_on_the_last_day_of_the_loan_period() {
        let mut loan = loan(dt(2026, 3, 1, 10, 0));
        loan.mark_returned(dt(2026, 3, 15, 10, 0));

        assert_eq!(loan.returned_at, Some(dt(2026, 3, 15, 10, 0)));
        assert_eq!(loan.late_fee, Some(Decimal::ZERO));
    }

    #[test]
    fn one_day_late_costs_fifty_cents() {
        let mut loan = loan(dt(2026, 3, 1, 10, 0));
        loan.mark_returned(dt(2026, 3, 16, 10, 0));

        assert_eq!(loan.late_fee, Some(Decimal::new(50, 2)));
    }

    #[test]
    fn six_days_late_costs_three_euros() {
        let mut loan = loan(dt(2026, 3, 1, 10, 0));
        loan.mark_returned(dt(2026, 3, 21, 10, 0));

        assert_eq!(loan.late_fee, Some(Decimal::new(300, 2)));
    }

    #[test]
    fn days_are_counted_by_calendar_date_not_elapsed_hours() {
        // Borrowed just before midnight: barely 14 days elapse by the
        // clock, but 15 calendar days have passed.
        let fee = late_return_fee(dt(2026, 3, 1, 23, 50), dt(2026, 3, 16, 0, 10));
        assert_eq!(fee, Decimal::new(50, 2));
    }

    #[test]
    fn loan_is_active_until_returned() {
        let mut loan = loan(dt(2026, 3, 1, 10, 0));
        assert!(loan.is_active());

        loan.mark_returned(dt(2026, 3, 2, 10, 0));
        assert!(!loan.is_active());
        assert_eq!(loan.late_fee, Some(Decimal::ZERO));
    }
}
