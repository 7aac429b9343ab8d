//! Tabular view engine for ticket records
//!
//! Free-text search, multi-type sortable columns, and pagination over a
//! client-held record set, kept consistent with the backend through a
//! push-invalidation channel.
//!
//! The pipeline is a pure derivation: base records → [`filter`] →
//! [`compare`]-driven sort → [`page`] slice. The [`refresh`] module runs
//! beside it and replaces the base record set whenever the server signals a
//! change.

pub mod cell;
pub mod column;
pub mod compare;
pub mod filter;
pub mod page;
pub mod refresh;
pub mod state;

mod view;

pub use view::*;
