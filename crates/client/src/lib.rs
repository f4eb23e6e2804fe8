//! Catalog client for folio
//!
//! Thin transport over the backend endpoints. Transport failures and error
//! envelopes are both normalized into [`CatalogError`].

#![allow(clippy::missing_errors_doc, reason = "Errors are documented per method")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]

pub mod client;
mod envelope;
pub mod error;
pub mod query;


pub use client::CatalogClient;
pub use envelope::truncate;
pub use error::{CatalogError, ErrorKind};
pub use query::ImageQuery;
