//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, loans, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblio API",
        version = "0.1.0",
        description = "Library Lending Tracker REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::list_available_books,
        books::search_books,
        books::create_book,
        books::delete_book,
        // Loans
        loans::borrow_book,
        loans::return_book,
        loans::list_active_loans,
        loans::list_overdue_loans,
        loans::get_user_loans,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
    ),
    components(
        schemas(
            // Books
            books::BookSummary,
            books::AvailableBook,
            books::BooksResponse,
            books::AvailableBooksResponse,
            books::CreateBookRequest,
            books::CreateBookResponse,
            // Loans
            loans::BorrowRequest,
            loans::ReturnRequest,
            loans::LoanSummary,
            loans::ReturnedLoanSummary,
            loans::LateFeeBlock,
            loans::BorrowResponse,
            loans::ReturnResponse,
            loans::ActiveLoansResponse,
            loans::OverdueLoanSummary,
            loans::OverdueLoansResponse,
            loans::UserSummary,
            loans::UserLoanSummary,
            loans::UserLoansResponse,
            // Users
            users::CreateUserRequest,
            users::UsersResponse,
            crate::models::User,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog management"),
        (name = "loans", description = "Borrowing, returns, and loan queries"),
        (name = "users", description = "User management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
