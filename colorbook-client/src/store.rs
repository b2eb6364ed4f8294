use crate::api::ApiClient;
use colorbook::{ProgressRecord, ProgressStore, StoreError};

/// [`ProgressStore`] backed by the REST backend. A thin adapter: the
/// session core decides what and when to persist, this only moves records.
pub struct HttpProgressStore {
    api: ApiClient,
}

impl HttpProgressStore {
    pub fn new(api: ApiClient) -> Self {
        HttpProgressStore { api }
    }
}

impl ProgressStore for HttpProgressStore {
    fn fetch(&self, user_id: &str, svg_id: &str) -> Result<ProgressRecord, StoreError> {
        self.api.progress_for(user_id, svg_id)
    }

    fn list(&self, user_id: &str, svg_id: Option<&str>) -> Result<Vec<ProgressRecord>, StoreError> {
        self.api.list_progress(user_id, svg_id)
    }

    fn create(&self, record: &ProgressRecord) -> Result<String, StoreError> {
        self.api.create_progress(record)
    }

    fn update(&self, record: &ProgressRecord) -> Result<(), StoreError> {
        self.api.update_progress(record)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.api.delete_progress(id)
    }
}
