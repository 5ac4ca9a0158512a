pub mod config;
pub mod error;
pub mod logging;

pub mod candidate;
pub mod discover;
pub mod extractor;
pub mod input;
pub mod manifest;
pub mod resolver;
pub mod target_dir;
