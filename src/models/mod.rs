//! Data models for Biblio

pub mod book;
pub mod loan;
pub mod user;

// Re-export commonly used types
pub use book::Book;
pub use loan::{Loan, LoanDetails, OverdueLoanDetails, LOAN_PERIOD_DAYS};
pub use user::User;
