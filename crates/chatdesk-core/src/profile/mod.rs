//! User profile preferences.

pub mod repository;
pub mod service;
