use std::sync::Arc;

use axum::{
    middleware::from_fn,
    routing::{post, put},
    Extension, Router,
};

use crate::api::rest::{handlers, validation::validate_user_body};
use crate::domain::repo::UsersRepository;

/// Routes relative to the resource root. Validation guards the two write verbs only.
///
/// | Verb   | Path   | Pre-step | Handler     |
/// |--------|--------|----------|-------------|
/// | POST   | `/`    | validate | create_user |
/// | GET    | `/`    |          | list_users  |
/// | GET    | `/{id}`|          | get_user    |
/// | PUT    | `/{id}`| validate | update_user |
/// | DELETE | `/{id}`|          | delete_user |
pub fn register_routes(repo: Arc<dyn UsersRepository>) -> Router {
    Router::new()
        .route(
            "/",
            post(handlers::create_user)
                .route_layer(from_fn(validate_user_body))
                .get(handlers::list_users),
        )
        .route(
            "/{id}",
            put(handlers::update_user)
                .route_layer(from_fn(validate_user_body))
                .get(handlers::get_user)
                .delete(handlers::delete_user),
        )
        .layer(Extension(repo))
}
