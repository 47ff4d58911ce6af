//! Catalog management service

use crate::{
    error::{AppError, AppResult},
    models::Book,
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a new book to the catalog, unborrowed.
    pub async fn create_book(&self, title: &str, author: &str) -> AppResult<Book> {
        let book = self.repository.books.create(title, author).await?;

        tracing::info!(book_id = book.id, title = %book.title, "book added to catalog");

        Ok(book)
    }

    /// All books, regardless of borrowed state
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list_all().await
    }

    /// Books currently available for borrowing
    pub async fn available_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list_available().await
    }

    /// Search books whose title or author contains `term`.
    ///
    /// Matching is a case-insensitive substring match on either field and
    /// ignores borrowed state.
    pub async fn search_books(&self, term: &str) -> AppResult<Vec<Book>> {
        self.repository.books.search(term).await
    }

    /// Find a book by its exact title.
    pub async fn find_by_title(&self, title: &str) -> AppResult<Book> {
        self.repository
            .books
            .find_by_title(title)
            .await?
            .ok_or_else(|| AppError::BookNotFound(format!("The book '{}' was not found", title)))
    }

    /// Remove a book permanently.
    ///
    /// No active-loan check: a book can be deleted out from under its loan
    /// history. The loan policy never calls this.
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;

        tracing::info!(book_id = id, "book deleted from catalog");

        Ok(())
    }
}
