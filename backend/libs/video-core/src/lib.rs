//! Video asset core types and constants
//!
//! Shared by video-service and its tests

pub mod constants;
pub mod models;

pub use models::*;
