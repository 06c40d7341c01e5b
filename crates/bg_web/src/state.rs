use std::sync::Arc;

use bg_core::BlogService;

pub struct AppState {
    pub service: Arc<BlogService>,
}

impl AppState {
    pub fn new(service: Arc<BlogService>) -> Self {
        Self { service }
    }
}
