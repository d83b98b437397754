use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    pub fn new(id: impl Into<String>, payload: UserPayload) -> Self {
        Self {
            id: id.into(),
            first_name: payload.first_name,
            last_name: payload.last_name,
        }
    }
}

/// Body of create and update requests. A caller-supplied `id` is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserPayload {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("missing `{0}` query parameter")]
    Missing(&'static str),
    #[error("`{0}` is not an integer: {1}")]
    NotInteger(&'static str, String),
    #[error("`{0}` must be at least 1, got {1}")]
    OutOfRange(&'static str, i64),
    #[error("page window overflows: page={page}, limit={limit}")]
    Overflow { page: i64, limit: i64 },
}

/// Offset-based page window, `offset = limit * (page - 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: i64,
    limit: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64) -> Result<Self, PaginationError> {
        if page < 1 {
            return Err(PaginationError::OutOfRange("page", page));
        }
        if limit < 1 {
            return Err(PaginationError::OutOfRange("limit", limit));
        }
        let pagination = Self { page, limit };
        pagination.checked_offset()?;
        Ok(pagination)
    }

    pub fn from_query(query: &ListQuery) -> Result<Self, PaginationError> {
        let page = parse_param("page", query.page.as_deref())?;
        let limit = parse_param("limit", query.limit.as_deref())?;
        Self::new(page, limit)
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        // Validated in `new`.
        self.limit * (self.page - 1)
    }

    fn checked_offset(&self) -> Result<i64, PaginationError> {
        self.limit
            .checked_mul(self.page - 1)
            .ok_or(PaginationError::Overflow {
                page: self.page,
                limit: self.limit,
            })
    }
}

fn parse_param(name: &'static str, raw: Option<&str>) -> Result<i64, PaginationError> {
    let raw = raw.ok_or(PaginationError::Missing(name))?;
    raw.parse()
        .map_err(|_| PaginationError::NotInteger(name, raw.to_string()))
}
