//! Core types for folio
//!
//! Domain types shared by the catalog client and the sync layer, plus the
//! folder tree aggregation and configuration loading.

pub mod config;
pub mod constants;
mod cursor;
pub mod env_config;
mod error;
mod filter;
mod folder;
mod image;

pub use config::ClientConfig;
pub use cursor::*;
pub use error::*;
pub use filter::*;
pub use folder::*;
pub use image::*;
