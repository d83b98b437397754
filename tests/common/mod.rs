#![allow(dead_code)]

use std::{
    collections::BTreeMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use user_service::{
    error::StoreError,
    models::{Pagination, User, UserPayload},
    routes,
    state::AppState,
    store::UserStore,
};

/// Store backed by a map ordered by id, counting every call.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<BTreeMap<String, User>>,
    calls: AtomicUsize,
}

impl MemoryUserStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: User) -> Result<User, StoreError> {
        self.record_call();
        self.users
            .lock()
            .unwrap()
            .insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: &str) -> Result<User, StoreError> {
        self.record_call();
        self.users
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_paged(&self, pagination: Pagination) -> Result<Vec<User>, StoreError> {
        self.record_call();
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .cloned()
            .collect())
    }

    async fn update_by_id(&self, id: &str, payload: UserPayload) -> Result<User, StoreError> {
        self.record_call();
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(id).ok_or(StoreError::NotFound)?;
        user.first_name = payload.first_name;
        user.last_name = payload.last_name;
        Ok(user.clone())
    }

    async fn delete_by_id(&self, id: &str) -> Result<User, StoreError> {
        self.record_call();
        self.users
            .lock()
            .unwrap()
            .remove(id)
            .ok_or(StoreError::NotFound)
    }
}

/// Store whose database is unreachable.
pub struct UnreachableStore;

fn unreachable() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl UserStore for UnreachableStore {
    async fn create(&self, _user: User) -> Result<User, StoreError> {
        Err(unreachable())
    }

    async fn get_by_id(&self, _id: &str) -> Result<User, StoreError> {
        Err(unreachable())
    }

    async fn list_paged(&self, _pagination: Pagination) -> Result<Vec<User>, StoreError> {
        Err(unreachable())
    }

    async fn update_by_id(&self, _id: &str, _payload: UserPayload) -> Result<User, StoreError> {
        Err(unreachable())
    }

    async fn delete_by_id(&self, _id: &str) -> Result<User, StoreError> {
        Err(unreachable())
    }
}

pub struct TestServer {
    pub base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Serves the production router on an ephemeral port.
    pub async fn spawn(store: Arc<dyn UserStore>) -> Self {
        let app = routes::create_router(AppState::new(store));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
