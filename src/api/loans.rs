//! Loan endpoints: borrow, return, and the loan queries

use axum::{
    extract::{Path, State},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{LoanDetails, OverdueLoanDetails, User},
};

use super::format_timestamp;

/// Borrow request
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    /// Title of the book to borrow
    pub title: String,
    /// ID of the borrowing user
    pub user_id: i32,
}

/// Return request
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    /// Title of the book to return
    pub title: String,
    /// ID of the returning user
    pub user_id: i32,
}

/// Loan as presented after a borrow or in listings
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanSummary {
    /// Loan ID
    pub id: i32,
    /// Borrowed book title
    pub book_title: String,
    /// Borrowing user name
    pub user_name: String,
    /// When the book was borrowed
    pub borrowed_at: String,
}

impl From<&LoanDetails> for LoanSummary {
    fn from(loan: &LoanDetails) -> Self {
        Self {
            id: loan.id,
            book_title: loan.book_title.clone(),
            user_name: loan.user_name.clone(),
            borrowed_at: format_timestamp(loan.borrowed_at),
        }
    }
}

/// Loan as presented after a return
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnedLoanSummary {
    /// Loan ID
    pub id: i32,
    /// Returned book title
    pub book_title: String,
    /// Returning user name
    pub user_name: String,
    /// When the book was borrowed
    pub borrowed_at: String,
    /// When the book came back
    pub returned_at: String,
}

/// Late fee details, present only when a fee was charged
#[derive(Serialize, ToSchema)]
pub struct LateFeeBlock {
    /// Fee amount in currency units
    pub amount: Decimal,
    /// Human-readable notice
    pub message: String,
}

/// Borrow response
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    /// Status message
    pub message: String,
    /// The created loan
    pub loan: LoanSummary,
}

/// Return response
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnResponse {
    /// Status message
    pub message: String,
    /// The closed loan
    pub loan: ReturnedLoanSummary,
    /// Fee block, omitted when nothing is owed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub late_fee: Option<LateFeeBlock>,
}

/// Active loans listing
#[derive(Serialize, ToSchema)]
pub struct ActiveLoansResponse {
    pub loans: Vec<LoanSummary>,
}

/// Overdue loan as listed by the overdue query
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverdueLoanSummary {
    /// Loan ID
    pub id: i32,
    /// Borrowed book title
    pub book_title: String,
    /// Borrowing user name
    pub user_name: String,
    /// When the book was borrowed
    pub borrowed_at: String,
    /// Days past the loan period
    pub days_overdue: i64,
    /// Fee owed if the book came back now
    pub estimated_fee: Decimal,
}

impl From<OverdueLoanDetails> for OverdueLoanSummary {
    fn from(overdue: OverdueLoanDetails) -> Self {
        Self {
            id: overdue.loan.id,
            book_title: overdue.loan.book_title,
            user_name: overdue.loan.user_name,
            borrowed_at: format_timestamp(overdue.loan.borrowed_at),
            days_overdue: overdue.days_overdue,
            estimated_fee: overdue.estimated_fee,
        }
    }
}

/// Overdue loans listing
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverdueLoansResponse {
    pub overdue_loans: Vec<OverdueLoanSummary>,
}

/// User summary in the user-loans response
#[derive(Serialize, ToSchema)]
pub struct UserSummary {
    /// User ID
    pub id: i32,
    /// Name
    pub name: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
        }
    }
}

/// Active loan as listed for a single user
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserLoanSummary {
    /// Loan ID
    pub id: i32,
    /// Borrowed book title
    pub book_title: String,
    /// Borrowed book author
    pub book_author: String,
    /// When the book was borrowed
    pub borrowed_at: String,
}

impl From<LoanDetails> for UserLoanSummary {
    fn from(loan: LoanDetails) -> Self {
        Self {
            id: loan.id,
            book_title: loan.book_title,
            book_author: loan.book_author,
            borrowed_at: format_timestamp(loan.borrowed_at),
        }
    }
}

/// A user's active loans
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserLoansResponse {
    pub user: UserSummary,
    pub active_loans: Vec<UserLoanSummary>,
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/books/borrow",
    tag = "loans",
    request_body = BorrowRequest,
    responses(
        (status = 200, description = "Book borrowed", body = BorrowResponse),
        (status = 400, description = "Book already borrowed or borrow limit reached", body = crate::error::ErrorResponse),
        (status = 404, description = "Book or user not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    Json(request): Json<BorrowRequest>,
) -> AppResult<Json<BorrowResponse>> {
    let loan = state
        .services
        .loans
        .borrow(&request.title, request.user_id)
        .await?;

    Ok(Json(BorrowResponse {
        message: "Book borrowed successfully".to_string(),
        loan: LoanSummary::from(&loan),
    }))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/books/return",
    tag = "loans",
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Book returned, with the late fee when one applies", body = ReturnResponse),
        (status = 404, description = "Book, user, or matching active loan not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    Json(request): Json<ReturnRequest>,
) -> AppResult<Json<ReturnResponse>> {
    let loan = state
        .services
        .loans
        .return_book(&request.title, request.user_id)
        .await?;

    let late_fee = loan
        .late_fee
        .filter(|fee| *fee > Decimal::ZERO)
        .map(|amount| LateFeeBlock {
            amount,
            message: "A late return fee has been applied.".to_string(),
        });

    // returned_at is always set on the loan the return operation hands back
    let returned_at = loan.returned_at.map(format_timestamp).unwrap_or_default();

    Ok(Json(ReturnResponse {
        message: "Book returned successfully".to_string(),
        loan: ReturnedLoanSummary {
            id: loan.id,
            book_title: loan.book_title,
            user_name: loan.user_name,
            borrowed_at: format_timestamp(loan.borrowed_at),
            returned_at,
        },
        late_fee,
    }))
}

/// List all active loans
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    responses(
        (status = 200, description = "All currently open loans", body = ActiveLoansResponse)
    )
)]
pub async fn list_active_loans(
    State(state): State<crate::AppState>,
) -> AppResult<Json<ActiveLoansResponse>> {
    let loans = state.services.loans.active_loans().await?;

    Ok(Json(ActiveLoansResponse {
        loans: loans.iter().map(LoanSummary::from).collect(),
    }))
}

/// List overdue loans
#[utoipa::path(
    get,
    path = "/loans/overdue",
    tag = "loans",
    responses(
        (status = 200, description = "Active loans past the loan period", body = OverdueLoansResponse)
    )
)]
pub async fn list_overdue_loans(
    State(state): State<crate::AppState>,
) -> AppResult<Json<OverdueLoansResponse>> {
    let overdue = state.services.loans.overdue_loans().await?;

    Ok(Json(OverdueLoansResponse {
        overdue_loans: overdue.into_iter().map(OverdueLoanSummary::from).collect(),
    }))
}

/// List a user's active loans
#[utoipa::path(
    get,
    path = "/users/{id}/loans",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "The user's open loans", body = UserLoansResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_user_loans(
    State(state): State<crate::AppState>,
    Path(user_id): Path<i32>,
) -> AppResult<Json<UserLoansResponse>> {
    let (user, loans) = state.services.loans.active_loans_for_user(user_id).await?;

    Ok(Json(UserLoansResponse {
        user: user.into(),
        active_loans: loans.into_iter().map(UserLoanSummary::from).collect(),
    }))
}
