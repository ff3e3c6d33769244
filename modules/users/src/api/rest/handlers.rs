use std::sync::Arc;

use apikit::{ApiPath, ApiResponse, ApiResult};
use axum::Extension;
use tracing::{debug, info};

use crate::api::rest::dto::UserDto;
use crate::contract::model::NewUser;
use crate::domain::repo::UsersRepository;

pub const USER_NOT_FOUND: &str = "User not found";

type Repo = Extension<Arc<dyn UsersRepository>>;

pub async fn create_user(
    Extension(repo): Repo,
    Extension(new_user): Extension<NewUser>,
) -> ApiResult<ApiResponse<UserDto>> {
    let user = repo.create(&new_user).await?;
    info!(id = user.id, "user created");
    Ok(ApiResponse::created("User created successfully", user.into()))
}

pub async fn list_users(Extension(repo): Repo) -> ApiResult<ApiResponse<Vec<UserDto>>> {
    let users = repo.list().await?;
    debug!(count = users.len(), "users listed");
    Ok(ApiResponse::ok(
        "Users fetched successfully",
        users.into_iter().map(UserDto::from).collect(),
    ))
}

pub async fn get_user(
    Extension(repo): Repo,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<ApiResponse<UserDto>> {
    Ok(match repo.find_by_id(id).await? {
        Some(user) => ApiResponse::ok("User fetched successfully", user.into()),
        None => ApiResponse::not_found(USER_NOT_FOUND),
    })
}

pub async fn update_user(
    Extension(repo): Repo,
    ApiPath(id): ApiPath<i32>,
    Extension(changes): Extension<NewUser>,
) -> ApiResult<ApiResponse<UserDto>> {
    Ok(match repo.update(id, &changes).await? {
        Some(user) => {
            info!(id, "user updated");
            ApiResponse::ok("User updated successfully", user.into())
        }
        None => ApiResponse::not_found(USER_NOT_FOUND),
    })
}

pub async fn delete_user(
    Extension(repo): Repo,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<ApiResponse<UserDto>> {
    Ok(match repo.delete_by_id(id).await? {
        Some(user) => {
            info!(id, "user deleted");
            ApiResponse::ok("User deleted successfully", user.into())
        }
        None => ApiResponse::not_found(USER_NOT_FOUND),
    })
}
