pub mod api;
pub mod core;
pub mod error;
pub mod logger;
pub mod state;

#[cfg(test)]
pub mod test_utils;
