pub mod helpers;
pub mod tables;
pub mod templates;
pub mod types;
