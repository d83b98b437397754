use async_trait::async_trait;
use sqlx::{
    Row,
    postgres::{PgConnectOptions, PgRow},
};

use crate::{
    db,
    error::StoreError,
    models::{Pagination, User, UserPayload},
};

/// Persistence for the `users` table. Every call is one statement.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user whose id was assigned by the caller.
    async fn create(&self, user: User) -> Result<User, StoreError>;

    async fn get_by_id(&self, id: &str) -> Result<User, StoreError>;

    /// Returns an empty vec, not an error, when the window is past the end.
    async fn list_paged(&self, pagination: Pagination) -> Result<Vec<User>, StoreError>;

    async fn update_by_id(&self, id: &str, payload: UserPayload) -> Result<User, StoreError>;

    /// Returns the row as it was before removal.
    async fn delete_by_id(&self, id: &str) -> Result<User, StoreError>;
}

/// Postgres store that opens a fresh connection per operation and closes it
/// before returning, on error paths too.
#[derive(Clone)]
pub struct PgUserStore {
    options: PgConnectOptions,
}

impl PgUserStore {
    pub fn new(options: PgConnectOptions) -> Self {
        Self { options }
    }
}

const INSERT_USER: &str = "INSERT INTO users (id, first_name, last_name) VALUES ($1, $2, $3) \
     RETURNING id, first_name, last_name";
const SELECT_USER: &str = "SELECT id, first_name, last_name FROM users WHERE id = $1";
const SELECT_PAGE: &str =
    "SELECT id, first_name, last_name FROM users ORDER BY id LIMIT $1 OFFSET $2";
const UPDATE_USER: &str = "UPDATE users SET first_name = $1, last_name = $2 WHERE id = $3 \
     RETURNING id, first_name, last_name";
const DELETE_USER: &str =
    "DELETE FROM users WHERE id = $1 RETURNING id, first_name, last_name";

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
    })
}

fn expect_user(row: Option<PgRow>) -> Result<User, StoreError> {
    let row = row.ok_or(StoreError::NotFound)?;
    Ok(user_from_row(&row)?)
}

#[async_trait]
impl UserStore for PgUserStore {
    #[tracing::instrument(skip(self, user), fields(user.id = %user.id))]
    async fn create(&self, user: User) -> Result<User, StoreError> {
        let mut conn = db::open(&self.options).await?;
        let row = sqlx::query(INSERT_USER)
            .bind(&user.id)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .fetch_one(&mut conn)
            .await;
        db::close(conn).await;

        Ok(user_from_row(&row?)?)
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> Result<User, StoreError> {
        let mut conn = db::open(&self.options).await?;
        let row = sqlx::query(SELECT_USER)
            .bind(id)
            .fetch_optional(&mut conn)
            .await;
        db::close(conn).await;

        expect_user(row?)
    }

    #[tracing::instrument(skip(self))]
    async fn list_paged(&self, pagination: Pagination) -> Result<Vec<User>, StoreError> {
        let mut conn = db::open(&self.options).await?;
        let rows = sqlx::query(SELECT_PAGE)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&mut conn)
            .await;
        db::close(conn).await;

        let users = rows?
            .iter()
            .map(user_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    #[tracing::instrument(skip(self, payload))]
    async fn update_by_id(&self, id: &str, payload: UserPayload) -> Result<User, StoreError> {
        let mut conn = db::open(&self.options).await?;
        let row = sqlx::query(UPDATE_USER)
            .bind(&payload.first_name)
            .bind(&payload.last_name)
            .bind(id)
            .fetch_optional(&mut conn)
            .await;
        db::close(conn).await;

        expect_user(row?)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_by_id(&self, id: &str) -> Result<User, StoreError> {
        let mut conn = db::open(&self.options).await?;
        let row = sqlx::query(DELETE_USER)
            .bind(id)
            .fetch_optional(&mut conn)
            .await;
        db::close(conn).await;

        expect_user(row?)
    }
}
