// Loader trait: the only effectful pipeline stage
use crate::domain::error::FetchError;
use async_trait::async_trait;

#[async_trait]
pub trait SourceLoader: Send + Sync {
    /// Retrieve the raw payload behind a URI (remote URL or static file).
    ///
    /// One I/O call per invocation; no retry and no caching.
    async fn load(&self, uri: &str) -> Result<String, FetchError>;
}
