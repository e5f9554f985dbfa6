//! 配置存储

pub mod config;

pub use config::ConfigStorage;
