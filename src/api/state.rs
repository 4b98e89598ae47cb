use std::sync::Arc;

use crate::catalog::MovieCatalog;
use crate::services::ViewSettings;
use crate::store::UserStore;

/// Shared application state.
///
/// Clients are built once at startup and handed to every request; nothing
/// here is mutable.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn MovieCatalog>,
    pub store: Arc<dyn UserStore>,
    pub view: ViewSettings,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        store: Arc<dyn UserStore>,
        view: ViewSettings,
    ) -> Self {
        Self {
            catalog,
            store,
            view,
        }
    }
}
