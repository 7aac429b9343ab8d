//! Ticket service API client library
//!
//! An async Rust client for the ticket service REST API: dynamic records,
//! envelope-wrapped responses, and a server-sent-event change channel.

pub mod api;
pub mod error;
pub mod model;
pub mod response;
pub mod stream;

mod client;

pub use client::*;
pub use response::Envelope;
