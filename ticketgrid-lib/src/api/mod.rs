//! API operations

mod tickets;

pub use tickets::*;
