//! Application state for the leave engine API.

use std::sync::Arc;

use crate::service::HrService;

/// Shared application state.
///
/// Holds the service every handler calls into.
#[derive(Clone)]
pub struct AppState {
    service: Arc<HrService>,
}

impl AppState {
    /// Creates a new application state around a service.
    pub fn new(service: HrService) -> Self {
        Self::from_shared(Arc::new(service))
    }

    /// Creates a state sharing a service the caller also holds.
    pub fn from_shared(service: Arc<HrService>) -> Self {
        Self { service }
    }

    /// Returns the service.
    pub fn service(&self) -> &HrService {
        &self.service
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }
}
