//! HTTP route handlers

pub mod device;
pub mod generate;
pub mod health;
pub mod models;
pub mod stats;
pub mod voices;
