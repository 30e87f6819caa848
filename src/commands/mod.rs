pub mod analytics;
pub mod assets;
