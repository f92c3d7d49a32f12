//! Completion provider implementations.

pub mod deepseek;
