//! User management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{error::AppResult, models::User};

/// Create user request
#[derive(Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// Name of the user
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
}

/// Users listing response
#[derive(Serialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "All registered users", body = UsersResponse)
    )
)]
pub async fn list_users(State(state): State<crate::AppState>) -> AppResult<Json<UsersResponse>> {
    let users = state.services.users.list_users().await?;

    Ok(Json(UsersResponse { users }))
}

/// Get user details by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_user(id).await?;

    Ok(Json(user))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Missing or empty name", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    request.validate()?;

    let user = state.services.users.create_user(&request.name).await?;

    Ok((StatusCode::CREATED, Json(user)))
}
