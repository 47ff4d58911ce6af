//! Book model and borrow-state transitions

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::loan::late_return_fee;

/// Book model from database
///
/// `borrowed` is true exactly while an active loan references the book;
/// the loan policy keeps the two in sync by writing them in the same
/// transaction. Titles are unique so that lookup-by-title stays
/// well-defined.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub borrowed: bool,
    pub borrowed_at: Option<DateTime<Utc>>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl Book {
    /// Flag the book as out on loan.
    pub fn mark_borrowed(&mut self, now: DateTime<Utc>) {
        self.borrowed = true;
        self.borrowed_at = Some(now);
    }

    /// Flag the book as back on the shelf.
    pub fn mark_returned(&mut self, now: DateTime<Utc>) {
        self.borrowed = false;
        self.returned_at = Some(now);
    }

    /// Preview of the fee owed if the book came back at `as_of`.
    ///
    /// Zero for a book that was never borrowed. The authoritative fee for
    /// a completed loan is stored by [`crate::models::Loan::mark_returned`];
    /// this path only feeds overdue estimates.
    pub fn calculate_late_fee(&self, as_of: DateTime<Utc>) -> Decimal {
        match self.borrowed_at {
            Some(borrowed_at) => late_return_fee(borrowed_at, as_of),
            None => Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn dt(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn book() -> Book {
        Book {
            id: 1,
            title: "The Left Hand of Darkness".to_string(),
            author: "Ursula K. Le Guin".to_string(),
            borrowed: false,
            borrowed_at: None,
            returned_at: None,
        }
    }

    #[test]
    fn never_borrowed_owes_nothing() {
        assert_eq!(book().calculate_late_fee(dt(2026, 6, 1)), Decimal::ZERO);
    }

    #[test]
    fn no_fee_within_the_loan_period() {
        let mut book = book();
        book.mark_borrowed(dt(2026, 6, 1));

        assert_eq!(book.calculate_late_fee(dt(2026, 6, 15)), Decimal::ZERO);
    }

    #[test]
    fn fee_accrues_per_day_past_the_period() {
        let mut book = book();
        book.mark_borrowed(dt(2026, 6, 1));

        assert_eq!(book.calculate_late_fee(dt(2026, 6, 16)), Decimal::new(50, 2));
        assert_eq!(book.calculate_late_fee(dt(2026, 6, 21)), Decimal::new(300, 2));
    }

    #[test]
    fn mark_borrowed_then_returned_round_trips() {
        let mut book = book();

        book.mark_borrowed(dt(2026, 6, 1));
        assert!(book.borrowed);
        assert_eq!(book.borrowed_at, Some(dt(2026, 6, 1)));

        book.mark_returned(dt(2026, 6, 10));
        assert!(!book.borrowed);
        assert_eq!(book.returned_at, Some(dt(2026, 6, 10)));
    }
}
