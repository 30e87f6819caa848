pub mod normalize;
pub mod parse;
pub mod types;
