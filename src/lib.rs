//! Chromapie - dominant colors as a pie chart
//!
//! Web application that clusters an uploaded image's pixels into dominant
//! colors and charts their shares, with per-color exclusion.
//! This library exposes modules for integration testing.

pub mod api;
pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
