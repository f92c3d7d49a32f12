//! Request extractors: session authentication and form-or-JSON bodies.

pub mod body;
pub mod session;
