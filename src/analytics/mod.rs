pub mod boolean;
pub mod choice;
pub mod demographics;
pub mod engine;
pub mod rating;
pub mod registry;
pub mod summary;
pub mod text;
