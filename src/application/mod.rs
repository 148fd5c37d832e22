// Application layer - Pipeline stages and panel use cases
pub mod aggregate;
pub mod color_scale;
pub mod coords;
pub mod dashboard_service;
pub mod geo_join;
pub mod panel_adapter;
pub mod panels;
pub mod parser;
pub mod report;
pub mod select;
pub mod source_loader;
