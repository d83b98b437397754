use axum::{
    Router,
    routing::{delete, get, post, put},
};
use axum_tracing_opentelemetry::middleware::{OtelAxumLayer, OtelInResponseLayer};

use crate::{
    handlers::{create_user, delete_user, get_user, get_users, update_user},
    state::AppState,
};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/user/all", get(get_users))
        .route("/user/create", post(create_user))
        .route("/user/update", put(update_user))
        .route("/user/delete", delete(delete_user))
        .route("/user/{id}", get(get_user))
        .layer(OtelInResponseLayer::default())
        .layer(OtelAxumLayer::default())
        .with_state(state)
}
