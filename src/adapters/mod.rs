//! Port implementations.

pub mod sim;
