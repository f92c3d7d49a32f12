//! Registration, login, sessions, and password reset.
//!
//! `AuthService` is generic over the user/session repositories, the
//! credential hasher, and the mailer so it can be tested without a database.

pub mod credentials;
pub mod mailer;
pub mod repository;
pub mod service;
