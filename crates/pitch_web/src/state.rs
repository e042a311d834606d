use pitch_search::SearchService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchService>,
}

impl AppState {
    pub fn new(search: SearchService) -> Self {
        Self {
            search: Arc::new(search),
        }
    }
}
