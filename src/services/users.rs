//! User management service

use crate::{error::AppResult, models::User, repository::Repository};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a new user
    pub async fn create_user(&self, name: &str) -> AppResult<User> {
        let user = self.repository.users.create(name).await?;

        tracing::info!(user_id = user.id, "user created");

        Ok(user)
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// All users
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list_all().await
    }
}
