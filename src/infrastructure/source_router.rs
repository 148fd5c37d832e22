// Dispatches a source URI to the HTTP or static-file loader
use crate::application::source_loader::SourceLoader;
use crate::domain::error::FetchError;
use async_trait::async_trait;
use std::sync::Arc;

pub struct SourceRouter {
    remote: Arc<dyn SourceLoader>,
    local: Arc<dyn SourceLoader>,
}

impl SourceRouter {
    pub fn new(remote: Arc<dyn SourceLoader>, local: Arc<dyn SourceLoader>) -> Self {
        Self { remote, local }
    }

    fn is_remote(uri: &str) -> bool {
        let lower = uri.trim_start().to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }
}

#[async_trait]
impl SourceLoader for SourceRouter {
    async fn load(&self, uri: &str) -> Result<String, FetchError> {
        if Self::is_remote(uri) {
            self.remote.load(uri).await
        } else {
            self.local.load(uri).await
        }
    }
}
