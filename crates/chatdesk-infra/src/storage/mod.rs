//! Local file storage for user uploads.

pub mod avatar;

pub use avatar::{AvatarStore, StorageError};
