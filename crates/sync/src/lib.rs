//! Client-side sync layer for folio
//!
//! Keeps a local mirror of the remote folder tree and image pages consistent
//! while the user browses. [`CatalogStore`] owns all state; paging and
//! single-flight loading are exposed for reuse on their own.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short closure params are idiomatic")]
#![allow(missing_debug_implementations, reason = "Store types hold channels and trait objects")]

mod context;
mod error;
pub mod pager;
pub mod single_flight;
mod snapshot;
mod source;
mod store;


pub use context::FolioContext;
pub use error::SyncError;
pub use pager::{ContextId, PageMerge, PagePlan, PageTicket, PaginatedImageLoader, SkipReason};
pub use single_flight::{FlightState, Retention, SingleFlight};
pub use snapshot::Snapshot;
pub use source::CatalogSource;
pub use store::{CatalogStore, PageLoad, ResourceKey};
