//! Profile service: lazy creation and partial updates of user preferences.

use chatdesk_types::error::ProfileError;
use chatdesk_types::profile::{ProfileUpdate, UserProfile};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::profile::repository::ProfileRepository;

pub struct ProfileService<R: ProfileRepository> {
    repo: R,
}

impl<R: ProfileRepository> ProfileService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Return the user's profile, creating one with defaults if absent.
    pub async fn get_or_create(&self, user_id: &Uuid) -> Result<UserProfile, ProfileError> {
        if let Some(profile) = self.repo.get_profile(user_id).await? {
            return Ok(profile);
        }
        debug!(user_id = %user_id, "Creating default profile");
        Ok(self
            .repo
            .create_profile(&UserProfile::with_defaults(*user_id))
            .await?)
    }

    /// Apply the present fields of `update`; absent fields are left as is.
    ///
    /// `last_modified` moves to now on every call, even an empty one.
    pub async fn update(
        &self,
        user_id: &Uuid,
        update: ProfileUpdate,
    ) -> Result<UserProfile, ProfileError> {
        update.validate().map_err(ProfileError::Validation)?;

        let mut profile = self.get_or_create(user_id).await?;
        let ProfileUpdate {
            bio,
            theme,
            font_size,
            email_notifications,
            show_typing_status,
            profile_image,
        } = update;

        if let Some(bio) = bio {
            profile.bio = bio;
        }
        if let Some(theme) = theme {
            profile.theme = theme;
        }
        if let Some(font_size) = font_size {
            profile.font_size = font_size;
        }
        if let Some(flag) = email_notifications {
            profile.email_notifications = flag;
        }
        if let Some(flag) = show_typing_status {
            profile.show_typing_status = flag;
        }
        if let Some(path) = profile_image {
            profile.profile_image = Some(path);
        }
        profile.last_modified = Utc::now();

        self.repo.update_profile(&profile).await?;
        info!(user_id = %user_id, "Profile updated");
        Ok(profile)
    }
}
