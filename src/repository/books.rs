//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::Book,
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a new book, unborrowed.
    pub async fn create(&self, title: &str, author: &str) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, borrowed)
            VALUES ($1, $2, FALSE)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(author)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                AppError::Conflict(format!("A book titled '{}' already exists", title))
            } else {
                AppError::Database(e)
            }
        })
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::BookNotFound(format!("Book with id {} not found", id)))
    }

    /// Look up a book by its exact title, the catalog's natural key.
    pub async fn find_by_title(&self, title: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE title = $1")
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    /// All books, borrowed or not
    pub async fn list_all(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title")
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    /// Books currently on the shelf
    pub async fn list_available(&self) -> AppResult<Vec<Book>> {
        let books =
            sqlx::query_as::<_, Book>("SELECT * FROM books WHERE borrowed = FALSE ORDER BY title")
                .fetch_all(&self.pool)
                .await?;

        Ok(books)
    }

    /// Case-insensitive substring search over title and author.
    pub async fn search(&self, term: &str) -> AppResult<Vec<Book>> {
        let pattern = format!("%{}%", term.to_lowercase());

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM books
            WHERE LOWER(title) LIKE $1 OR LOWER(author) LIKE $1
            ORDER BY title
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Delete a book permanently.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::BookNotFound(format!(
                "Book with id {} not found",
                id
            )));
        }

        Ok(())
    }
}
