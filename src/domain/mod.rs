// Domain layer - Pure data types shared by every pipeline stage
pub mod error;
pub mod geo;
pub mod panel;
pub mod record;
pub mod series;
