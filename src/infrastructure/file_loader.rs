// Static file loader for datasets shipped alongside the service
use crate::application::source_loader::SourceLoader;
use crate::domain::error::FetchError;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileLoader {
    root: PathBuf,
}

impl FileLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, uri: &str) -> Result<PathBuf, FetchError> {
        let relative = Path::new(uri.trim_start_matches('/'));
        // Sources must stay under the static root
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(FetchError::Io {
                path: uri.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "path escapes the static data directory",
                ),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl SourceLoader for FileLoader {
    async fn load(&self, uri: &str) -> Result<String, FetchError> {
        let path = self.resolve(uri)?;
        let body = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FetchError::Io {
                path: path.display().to_string(),
                source,
            })?;

        tracing::debug!("Read {} bytes from {}", body.len(), path.display());
        Ok(body)
    }
}
