use std::sync::Arc;

use crate::advice::AdviceProvider;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub advice: Arc<dyn AdviceProvider>,
}

impl AppState {
    pub fn new(store: Store, advice: Arc<dyn AdviceProvider>) -> Self {
        AppState { store, advice }
    }
}
