//! Loans repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Book, Loan, LoanDetails},
};

const LOAN_DETAILS_SELECT: &str = r#"
    SELECT l.id, l.user_id, l.book_id,
           b.title AS book_title, b.author AS book_author,
           u.name AS user_name,
           l.borrowed_at, l.returned_at, l.late_fee
    FROM loans l
    JOIN books b ON l.book_id = b.id
    JOIN users u ON l.user_id = u.id
"#;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a new loan and persist the book's borrowed state.
    ///
    /// Both writes happen in one transaction: a loan without the borrowed
    /// flag (or the flag without a loan) would break the book/loan
    /// consistency invariant.
    pub async fn create(
        &self,
        user_id: i32,
        book: &Book,
        borrowed_at: DateTime<Utc>,
    ) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (user_id, book_id, borrowed_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(book.id)
        .bind(borrowed_at)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE books SET borrowed = $2, borrowed_at = $3, returned_at = $4 WHERE id = $1",
        )
        .bind(book.id)
        .bind(book.borrowed)
        .bind(book.borrowed_at)
        .bind(book.returned_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(loan)
    }

    /// Persist a completed return: the closed loan and the freed book,
    /// together in one transaction.
    pub async fn finalize_return(&self, loan: &Loan, book: &Book) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE loans SET returned_at = $2, late_fee = $3 WHERE id = $1")
            .bind(loan.id)
            .bind(loan.returned_at)
            .bind(loan.late_fee)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE books SET borrowed = $2, borrowed_at = $3, returned_at = $4 WHERE id = $1",
        )
        .bind(book.id)
        .bind(book.borrowed)
        .bind(book.borrowed_at)
        .bind(book.returned_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// The active loan linking this user to this book, if any
    pub async fn find_active_by_user_and_book(
        &self,
        user_id: i32,
        book_id: i32,
    ) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            SELECT * FROM loans
            WHERE user_id = $1 AND book_id = $2 AND returned_at IS NULL
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loan)
    }

    /// How many loans the user currently has open
    pub async fn count_active_for_user(&self, user_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE user_id = $1 AND returned_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// All active loans
    pub async fn find_active(&self) -> AppResult<Vec<LoanDetails>> {
        let query = format!(
            "{} WHERE l.returned_at IS NULL ORDER BY l.borrowed_at",
            LOAN_DETAILS_SELECT
        );

        let loans = sqlx::query_as::<_, LoanDetails>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(loans)
    }

    /// Active loans belonging to one user
    pub async fn find_active_for_user(&self, user_id: i32) -> AppResult<Vec<LoanDetails>> {
        let query = format!(
            "{} WHERE l.user_id = $1 AND l.returned_at IS NULL ORDER BY l.borrowed_at",
            LOAN_DETAILS_SELECT
        );

        let loans = sqlx::query_as::<_, LoanDetails>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(loans)
    }

    /// Active loans borrowed before `cutoff`
    pub async fn find_overdue(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<LoanDetails>> {
        let query = format!(
            "{} WHERE l.returned_at IS NULL AND l.borrowed_at < $1 ORDER BY l.borrowed_at",
            LOAN_DETAILS_SELECT
        );

        let loans = sqlx::query_as::<_, LoanDetails>(&query)
            .bind(cutoff)
            .fetch_all(&self.pool)
            .await?;

        Ok(loans)
    }
}
