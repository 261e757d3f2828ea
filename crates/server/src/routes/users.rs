use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use models::user::User;
use service::errors::ServiceError;
use tracing::{debug, info};

use crate::errors::ApiError;
use crate::routes::ServerState;

/// Raw body to user. Empty, `null` and malformed bodies all mean "no user".
fn parse_user(body: &[u8]) -> Option<User> {
    serde_json::from_slice::<Option<User>>(body).ok().flatten()
}

#[utoipa::path(
    post, path = "/api/users", tag = "Users",
    request_body(content = crate::openapi::UserDoc, description = "User object to create", content_type = "application/json"),
    responses(
        (status = 201, description = "User created successfully", body = crate::openapi::UserDoc),
        (status = 400, description = "Invalid user data"),
        (status = 409, description = "User with this ID already exists")
    )
)]
pub async fn create_user(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    info!("processing POST request to create a user");
    debug!(body = %String::from_utf8_lossy(&body), "request body");

    let created = state.users.create(parse_user(&body)).await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("/users/{}", created.id)) {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(created)))
}

#[utoipa::path(
    get, path = "/api/users/{id}", tag = "Users",
    params(("id" = String, Path, description = "The user ID")),
    responses(
        (status = 200, description = "The OK response", body = crate::openapi::UserDoc),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    info!(user_id = %id, "processing GET request");
    match state.users.get_by_id(&id).await? {
        Some(user) => Ok(Json(user)),
        None => Err(ServiceError::user_not_found(&id).into()),
    }
}

#[utoipa::path(
    get, path = "/api/users", tag = "Users",
    responses((status = 200, description = "The list of users", body = [crate::openapi::UserDoc]))
)]
pub async fn get_all_users(State(state): State<ServerState>) -> Result<Json<Vec<User>>, ApiError> {
    info!("processing GET request for all users");
    let users = state.users.get_all().await?;
    Ok(Json(users))
}

#[utoipa::path(
    put, path = "/api/users/{id}", tag = "Users",
    params(("id" = String, Path, description = "The user ID")),
    request_body(content = crate::openapi::UserDoc, description = "Updated user data", content_type = "application/json"),
    responses(
        (status = 200, description = "The updated user", body = crate::openapi::UserDoc),
        (status = 400, description = "Invalid user data"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<User>, ApiError> {
    info!(user_id = %id, "processing PUT request");
    let updated = state.users.update(&id, parse_user(&body)).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/api/users/{id}", tag = "Users",
    params(("id" = String, Path, description = "The user ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<String, ApiError> {
    info!(user_id = %id, "processing DELETE request");
    state.users.delete(&id).await?;
    Ok(format!("User with ID {} deleted.", id))
}
