use std::sync::Arc;

use crate::pipeline::DetectionService;

#[derive(Clone)]
pub struct HandlerState {
    pub service: Arc<DetectionService>,

    /// Bearer token required to change fusion weights; `None` disables the endpoint.
    pub admin_token: Option<Arc<str>>,
}

impl HandlerState {
    pub fn new(service: DetectionService, admin_token: Option<String>) -> Self {
        Self {
            service: Arc::new(service),
            admin_token: admin_token.map(Arc::from),
        }
    }
}
