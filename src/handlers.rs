use axum::{
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{BytesRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{IdQuery, ListQuery, Pagination, User, UserPayload},
    state::AppState,
};

type HandlerResult = Result<Response, ApiError>;

fn json_response<T: Serialize>(
    status: StatusCode,
    value: &T,
    error_status: StatusCode,
    context: &'static str,
) -> HandlerResult {
    let body =
        serde_json::to_vec(value).map_err(|err| ApiError::new(error_status, context, err))?;
    Ok((status, [(header::CONTENT_TYPE, "application/json")], body).into_response())
}

fn parse_payload(
    body: Result<Bytes, BytesRejection>,
    context: &'static str,
) -> Result<UserPayload, ApiError> {
    let body = body.map_err(|err| ApiError::bad_request("Failed to read request body", err))?;
    let value: Value =
        serde_json::from_slice(&body).map_err(|err| ApiError::bad_request(context, err))?;
    // Derived struct decoding also accepts arrays; only objects are users.
    if !value.is_object() {
        return Err(ApiError::bad_request(
            context,
            anyhow::anyhow!("expected a JSON object"),
        ));
    }
    serde_json::from_value(value).map_err(|err| ApiError::bad_request(context, err))
}

fn require_id(query: Result<Query<IdQuery>, QueryRejection>) -> Result<String, ApiError> {
    let Query(IdQuery { id }) =
        query.map_err(|err| ApiError::bad_request("Invalid query string", err))?;
    id.ok_or_else(|| {
        ApiError::bad_request(
            "Missing id",
            anyhow::anyhow!("`id` query parameter is required"),
        )
    })
}

pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> HandlerResult {
    let payload = parse_payload(body, "Failed to parse user body")?;
    let user = User::new(Uuid::new_v4().to_string(), payload);

    let created = state
        .store
        .create(user)
        .await
        .map_err(|err| ApiError::internal("Failed to create user", err))?;
    state.users_created_counter.add(1, &[]);
    tracing::info!(user.id = %created.id, "User created");

    json_response(
        StatusCode::CREATED,
        &created,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to serialize created user",
    )
}

pub async fn get_users(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> HandlerResult {
    let Query(query) = query.map_err(|err| ApiError::bad_request("Invalid query string", err))?;
    let pagination = Pagination::from_query(&query)
        .map_err(|err| ApiError::bad_request("Invalid pagination parameters", err))?;

    let users = state
        .store
        .list_paged(pagination)
        .await
        .map_err(|err| ApiError::internal("Failed to list users", err))?;

    json_response(
        StatusCode::ACCEPTED,
        &users,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to serialize users",
    )
}

pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let user = state
        .store
        .get_by_id(&id)
        .await
        .map_err(|err| ApiError::bad_request("Failed to get user by id", err))?;

    json_response(
        StatusCode::OK,
        &user,
        StatusCode::BAD_REQUEST,
        "Failed to serialize user",
    )
}

pub async fn update_user(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> HandlerResult {
    let id = require_id(query)?;
    let payload = parse_payload(body, "Failed to parse user body")?;

    let updated = state
        .store
        .update_by_id(&id, payload)
        .await
        .map_err(|err| ApiError::internal("Failed to update user", err))?;

    json_response(
        StatusCode::OK,
        &updated,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to serialize updated user",
    )
}

pub async fn delete_user(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> HandlerResult {
    let id = require_id(query)?;

    let deleted = state
        .store
        .delete_by_id(&id)
        .await
        .map_err(|err| ApiError::internal("Failed to delete user", err))?;
    tracing::info!(user.id = %deleted.id, "User deleted");

    json_response(
        StatusCode::OK,
        &deleted,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to serialize deleted user",
    )
}
