//! Application state shared across handlers.

use pixstore_core::Config;

use crate::services::images::ImageService;

/// Main application state: configuration plus the image service.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub images: ImageService,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
