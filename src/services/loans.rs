//! Loan policy service
//!
//! Owns the borrow/return state machine: a book cycles between available
//! and borrowed, and the loans table keeps the audit trail. All rule
//! checks live here; the repositories only read and write state.

use chrono::{Duration, Utc};

use crate::{
    error::{AppResult, BorrowError, ReturnError},
    models::{
        loan::{days_between, late_return_fee},
        LoanDetails, OverdueLoanDetails, User, LOAN_PERIOD_DAYS,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow a book for a user.
    ///
    /// The check order is part of the contract: book lookup, then user
    /// lookup, then already-borrowed, then the borrowing limit. Callers
    /// observe which failure wins.
    pub async fn borrow(&self, title: &str, user_id: i32) -> Result<LoanDetails, BorrowError> {
        let mut book = self
            .repository
            .books
            .find_by_title(title)
            .await?
            .ok_or_else(|| BorrowError::BookNotFound(title.to_string()))?;

        let user = self
            .repository
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(BorrowError::UserNotFound(user_id))?;

        if book.borrowed {
            return Err(BorrowError::AlreadyBorrowed(book.title));
        }

        let active_loans = self.repository.loans.count_active_for_user(user.id).await?;
        if !user.can_borrow(active_loans) {
            return Err(BorrowError::TooManyBooks(user.id));
        }

        let now = Utc::now();
        book.mark_borrowed(now);

        let loan = self.repository.loans.create(user.id, &book, now).await?;

        tracing::info!(
            loan_id = loan.id,
            book_id = book.id,
            user_id = user.id,
            "book borrowed"
        );

        Ok(LoanDetails::from_parts(loan, &book, &user))
    }

    /// Return a borrowed book.
    ///
    /// Closes the active loan linking exactly this user to this book,
    /// computing the late fee as of now, and frees the book.
    pub async fn return_book(&self, title: &str, user_id: i32) -> Result<LoanDetails, ReturnError> {
        let mut book = self
            .repository
            .books
            .find_by_title(title)
            .await?
            .ok_or_else(|| ReturnError::BookNotFound(title.to_string()))?;

        let user = self
            .repository
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ReturnError::UserNotFound(user_id))?;

        let mut loan = self
            .repository
            .loans
            .find_active_by_user_and_book(user.id, book.id)
            .await?
            .ok_or_else(|| ReturnError::LoanNotFound {
                title: book.title.clone(),
                user_id: user.id,
            })?;

        let now = Utc::now();
        loan.mark_returned(now);
        book.mark_returned(now);

        self.repository.loans.finalize_return(&loan, &book).await?;

        tracing::info!(
            loan_id = loan.id,
            book_id = book.id,
            user_id = user.id,
            late_fee = %loan.late_fee.unwrap_or_default(),
            "book returned"
        );

        Ok(LoanDetails::from_parts(loan, &book, &user))
    }

    /// All currently open loans
    pub async fn active_loans(&self) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.find_active().await
    }

    /// Open loans for one user; the user must exist.
    pub async fn active_loans_for_user(&self, user_id: i32) -> AppResult<(User, Vec<LoanDetails>)> {
        let user = self.repository.users.get_by_id(user_id).await?;
        let loans = self.repository.loans.find_active_for_user(user.id).await?;

        Ok((user, loans))
    }

    /// Active loans past the loan period, evaluated against now.
    ///
    /// Pull-based: there is no background job flagging loans overdue, this
    /// query is the overdue detection.
    pub async fn overdue_loans(&self) -> AppResult<Vec<OverdueLoanDetails>> {
        let now = Utc::now();
        let cutoff = now - Duration::days(LOAN_PERIOD_DAYS);

        let loans = self.repository.loans.find_overdue(cutoff).await?;

        Ok(loans
            .into_iter()
            .map(|loan| {
                let days_overdue = days_between(loan.borrowed_at, now) - LOAN_PERIOD_DAYS;
                let estimated_fee = late_return_fee(loan.borrowed_at, now);
                OverdueLoanDetails {
                    loan,
                    days_overdue,
                    estimated_fee,
                }
            })
            .collect())
    }
}
