// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod file_loader;
pub mod http_loader;
pub mod source_router;
