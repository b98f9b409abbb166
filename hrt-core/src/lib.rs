pub mod cache;
pub mod config;
pub mod error;
#[cfg(feature = "api")]
pub mod fetch;
pub mod normalize;
pub mod series;
pub mod time_label;
pub mod window;
