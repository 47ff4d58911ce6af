//! Error types for Biblio server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable numeric error codes returned in JSON error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    DbFailure = 2,
    NoSuchBook = 3,
    NoSuchUser = 4,
    NoActiveLoan = 5,
    BookBorrowed = 6,
    MaxBorrowsReached = 7,
    BadValue = 8,
    Duplicate = 9,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("No active loan: {0}")]
    LoanNotFound(String),

    #[error("Book already borrowed: {0}")]
    BookAlreadyBorrowed(String),

    #[error("Borrow limit reached: {0}")]
    TooManyBooks(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Failures of the borrow operation, in the order the policy checks them.
///
/// The request layer maps each kind to a response without inspecting
/// message strings.
#[derive(Error, Debug)]
pub enum BorrowError {
    #[error("the book '{0}' was not found")]
    BookNotFound(String),

    #[error("user {0} was not found")]
    UserNotFound(i32),

    #[error("the book '{0}' is already borrowed")]
    AlreadyBorrowed(String),

    #[error("user {0} already has the maximum number of books on loan")]
    TooManyBooks(i32),

    #[error(transparent)]
    Storage(#[from] AppError),
}

/// Failures of the return operation.
///
/// `LoanNotFound` means "no matching active loan for this user and book",
/// which is distinct from the book or the user being missing.
#[derive(Error, Debug)]
pub enum ReturnError {
    #[error("the book '{0}' was not found")]
    BookNotFound(String),

    #[error("user {0} was not found")]
    UserNotFound(i32),

    #[error("user {user_id} has no active loan for '{title}'")]
    LoanNotFound { title: String, user_id: i32 },

    #[error(transparent)]
    Storage(#[from] AppError),
}

impl From<BorrowError> for AppError {
    fn from(err: BorrowError) -> Self {
        let message = err.to_string();
        match err {
            BorrowError::BookNotFound(_) => AppError::BookNotFound(message),
            BorrowError::UserNotFound(_) => AppError::UserNotFound(message),
            BorrowError::AlreadyBorrowed(_) => AppError::BookAlreadyBorrowed(message),
            BorrowError::TooManyBooks(_) => AppError::TooManyBooks(message),
            BorrowError::Storage(e) => e,
        }
    }
}

impl From<ReturnError> for AppError {
    fn from(err: ReturnError) -> Self {
        let message = err.to_string();
        match err {
            ReturnError::BookNotFound(_) => AppError::BookNotFound(message),
            ReturnError::UserNotFound(_) => AppError::UserNotFound(message),
            ReturnError::LoanNotFound { .. } => AppError::LoanNotFound(message),
            ReturnError::Storage(e) => e,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error, message) = match &self {
            AppError::BookNotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorCode::NoSuchBook,
                "book_not_found",
                msg.clone(),
            ),
            AppError::UserNotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorCode::NoSuchUser,
                "user_not_found",
                msg.clone(),
            ),
            AppError::LoanNotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorCode::NoActiveLoan,
                "no_active_loan",
                msg.clone(),
            ),
            AppError::BookAlreadyBorrowed(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::BookBorrowed,
                "book_already_borrowed",
                msg.clone(),
            ),
            AppError::TooManyBooks(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::MaxBorrowsReached,
                "too_many_books",
                msg.clone(),
            ),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::BadValue,
                "validation",
                msg.clone(),
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorCode::Duplicate,
                "conflict",
                msg.clone(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "database",
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "internal",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: error.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borrow_errors_keep_their_kind() {
        let err = AppError::from(BorrowError::BookNotFound("Dune".to_string()));
        assert!(matches!(err, AppError::BookNotFound(_)));

        let err = AppError::from(BorrowError::UserNotFound(7));
        assert!(matches!(err, AppError::UserNotFound(_)));

        let err = AppError::from(BorrowError::AlreadyBorrowed("Dune".to_string()));
        assert!(matches!(err, AppError::BookAlreadyBorrowed(_)));

        let err = AppError::from(BorrowError::TooManyBooks(7));
        assert!(matches!(err, AppError::TooManyBooks(_)));
    }

    #[test]
    fn return_loan_not_found_is_its_own_kind() {
        let err = AppError::from(ReturnError::LoanNotFound {
            title: "Dune".to_string(),
            user_id: 7,
        });
        assert!(matches!(err, AppError::LoanNotFound(_)));
    }

    #[test]
    fn storage_errors_pass_through_unchanged() {
        let err = AppError::from(BorrowError::Storage(AppError::Internal("boom".to_string())));
        assert!(matches!(err, AppError::Internal(_)));
    }
}
