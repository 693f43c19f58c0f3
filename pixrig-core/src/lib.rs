//! Rig-and-deform engine for pixel-art sprites.

pub mod config;
pub mod edit;
pub mod error;
pub mod export;
pub mod geometry;
pub mod render;
pub mod rig;
pub mod scene;
pub mod skin;

pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
