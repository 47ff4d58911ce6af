//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::Book,
};

/// Book as listed in catalog responses
#[derive(Serialize, ToSchema)]
pub struct BookSummary {
    /// Book ID
    pub id: i32,
    /// Title
    pub title: String,
    /// Author
    pub author: String,
    /// Whether the book is currently out on loan
    pub borrowed: bool,
}

impl From<Book> for BookSummary {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            borrowed: book.borrowed,
        }
    }
}

/// Book as listed in the available-books response
#[derive(Serialize, ToSchema)]
pub struct AvailableBook {
    /// Book ID
    pub id: i32,
    /// Title
    pub title: String,
    /// Author
    pub author: String,
}

impl From<Book> for AvailableBook {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
        }
    }
}

/// Catalog listing response
#[derive(Serialize, ToSchema)]
pub struct BooksResponse {
    pub books: Vec<BookSummary>,
}

/// Available-books response
#[derive(Serialize, ToSchema)]
pub struct AvailableBooksResponse {
    pub books: Vec<AvailableBook>,
}

/// Search query parameters
#[derive(Deserialize)]
pub struct SearchQuery {
    pub term: Option<String>,
}

/// Create book request
#[derive(Deserialize, Validate, ToSchema)]
pub struct CreateBookRequest {
    /// Title (unique within the catalog)
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    /// Author
    #[validate(length(min = 1, message = "author must not be empty"))]
    pub author: String,
}

/// Create book response
#[derive(Serialize, ToSchema)]
pub struct CreateBookResponse {
    /// Status message
    pub message: String,
    /// The created book
    pub book: AvailableBook,
}

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books in the catalog", body = BooksResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
) -> AppResult<Json<BooksResponse>> {
    let books = state.services.catalog.list_books().await?;

    Ok(Json(BooksResponse {
        books: books.into_iter().map(BookSummary::from).collect(),
    }))
}

/// List books available for borrowing
#[utoipa::path(
    get,
    path = "/books/available",
    tag = "books",
    responses(
        (status = 200, description = "Books not currently on loan", body = AvailableBooksResponse)
    )
)]
pub async fn list_available_books(
    State(state): State<crate::AppState>,
) -> AppResult<Json<AvailableBooksResponse>> {
    let books = state.services.catalog.available_books().await?;

    Ok(Json(AvailableBooksResponse {
        books: books.into_iter().map(AvailableBook::from).collect(),
    }))
}

/// Search books by title or author substring
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(
        ("term" = String, Query, description = "Search term (matched case-insensitively against title and author)")
    ),
    responses(
        (status = 200, description = "Matching books", body = BooksResponse),
        (status = 400, description = "Missing or empty search term", body = crate::error::ErrorResponse)
    )
)]
pub async fn search_books(
    State(state): State<crate::AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<BooksResponse>> {
    // Reject blank terms before they reach the catalog
    let term = match query.term.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => term,
        _ => {
            return Err(AppError::Validation(
                "A search term is required".to_string(),
            ))
        }
    };

    let books = state.services.catalog.search_books(term).await?;

    Ok(Json(BooksResponse {
        books: books.into_iter().map(BookSummary::from).collect(),
    }))
}

/// Add a book to the catalog
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created", body = CreateBookResponse),
        (status = 400, description = "Missing title or author", body = crate::error::ErrorResponse),
        (status = 409, description = "A book with this title already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateBookRequest>,
) -> AppResult<(StatusCode, Json<CreateBookResponse>)> {
    request.validate()?;

    let book = state
        .services
        .catalog
        .create_book(&request.title, &request.author)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateBookResponse {
            message: "Book added successfully".to_string(),
            book: book.into(),
        }),
    ))
}

/// Delete a book from the catalog
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_book(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
