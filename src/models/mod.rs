//! Data models

pub mod health_metric;
pub mod scoring;

pub use health_metric::*;
pub use scoring::*;
