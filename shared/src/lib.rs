// Data model shared between the engine library and its front ends.
pub mod models;
pub mod utils;
