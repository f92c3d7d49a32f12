//! Outbound mail implementations.

pub mod log;
