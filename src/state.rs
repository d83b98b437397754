use std::sync::Arc;

use opentelemetry::{global, metrics::Counter};

use crate::store::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub users_created_counter: Counter<u64>,
}

impl AppState {
    /// Builds state with instruments from the global meter provider, which is
    /// a no-op until telemetry export is installed.
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        let meter = global::meter("user-service");
        let users_created_counter = meter
            .u64_counter("users_created")
            .with_description("Number of users created")
            .build();

        Self {
            store,
            users_created_counter,
        }
    }
}
