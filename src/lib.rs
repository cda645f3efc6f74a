//! Rockfall risk assessment service.
//!
//! Scores environmental and geological readings into a rockfall risk tier,
//! derives a mining feasibility verdict, and serves chart and terrain data to
//! a browser dashboard over HTTP.

pub mod api;
pub mod category;
pub mod charts;
pub mod config;
pub mod error;
pub mod feasibility;
pub mod image;
pub mod notify;
pub mod risk;
pub mod terrain;

pub use category::bucket;
pub use feasibility::classify;
pub use risk::score;
