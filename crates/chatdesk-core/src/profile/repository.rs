//! ProfileRepository trait definition.

use chatdesk_types::error::RepositoryError;
use chatdesk_types::profile::UserProfile;
use uuid::Uuid;

/// Repository trait for user profile persistence.
///
/// There is at most one profile per user; `user_id` is the key.
pub trait ProfileRepository: Send + Sync {
    /// Get the profile for a user, if one exists.
    fn get_profile(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<UserProfile>, RepositoryError>> + Send;

    /// Insert `profile` unless the user already has one, then return the
    /// stored profile.
    fn create_profile(
        &self,
        profile: &UserProfile,
    ) -> impl std::future::Future<Output = Result<UserProfile, RepositoryError>> + Send;

    /// Overwrite an existing profile.
    fn update_profile(
        &self,
        profile: &UserProfile,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
