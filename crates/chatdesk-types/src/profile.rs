//! User profile and display preference types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Maximum length of a profile bio, in characters.
pub const BIO_MAX_CHARS: usize = 500;

/// Color theme of the chat UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// `(value, label)` pairs for rendering a choice list.
    pub const CHOICES: [(&'static str, &'static str); 2] =
        [("light", "Light mode"), ("dark", "Dark mode")];
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("invalid theme: '{other}'")),
        }
    }
}

/// Font size of the chat UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    /// `(value, label)` pairs for rendering a choice list.
    pub const CHOICES: [(&'static str, &'static str); 3] =
        [("small", "Small"), ("medium", "Medium"), ("large", "Large")];
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSize::Small => write!(f, "small"),
            FontSize::Medium => write!(f, "medium"),
            FontSize::Large => write!(f, "large"),
        }
    }
}

impl FromStr for FontSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(FontSize::Small),
            "medium" => Ok(FontSize::Medium),
            "large" => Ok(FontSize::Large),
            other => Err(format!("invalid font size: '{other}'")),
        }
    }
}

/// Per-user display and notification preferences (one-to-one with a user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub bio: String,
    /// Path of the avatar relative to the media directory.
    pub profile_image: Option<String>,
    pub theme: Theme,
    pub font_size: FontSize,
    pub email_notifications: bool,
    pub show_typing_status: bool,
    pub joined_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl UserProfile {
    /// A profile with default preferences, joined now.
    pub fn with_defaults(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            bio: String::new(),
            profile_image: None,
            theme: Theme::default(),
            font_size: FontSize::default(),
            email_notifications: true,
            show_typing_status: true,
            joined_at: now,
            last_modified: now,
        }
    }
}

/// Partial profile update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub bio: Option<String>,
    pub theme: Option<Theme>,
    pub font_size: Option<FontSize>,
    pub email_notifications: Option<bool>,
    pub show_typing_status: Option<bool>,
    pub profile_image: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check field limits without touching storage.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(bio) = &self.bio {
            let len = bio.chars().count();
            if len > BIO_MAX_CHARS {
                return Err(format!(
                    "bio must be at most {BIO_MAX_CHARS} characters (got {len})"
                ));
            }
        }
        Ok(())
    }
}
