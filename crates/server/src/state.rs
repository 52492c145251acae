use crate::store::RecordStore;
use std::path::PathBuf;
use std::sync::Arc;
use template::InvoiceLayout;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub layout: Arc<InvoiceLayout>,
    /// Base PDF stamped on every render
    pub template_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, layout: InvoiceLayout, template_path: PathBuf) -> Self {
        Self {
            store,
            layout: Arc::new(layout),
            template_path: Arc::new(template_path),
        }
    }
}
