//! API shared state

use std::sync::Arc;

use crate::storage::SampleStore;

/// Shared state passed to all API handlers
#[derive(Clone)]
pub struct ApiState {
    /// Store shared with the monitor loop
    pub store: Arc<dyn SampleStore>,
}

impl ApiState {
    pub fn new(store: Arc<dyn SampleStore>) -> Self {
        Self { store }
    }
}
