//! Profile picture storage under the media directory.
//!
//! Files land in `{media_dir}/profile_pics/{user_id}-{uuid}.{ext}`; the
//! returned reference is the path relative to `media_dir`, which is also
//! the URL path under `/media/`.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Subdirectory of the media directory holding avatars.
pub const AVATAR_DIR: &str = "profile_pics";

/// Largest accepted upload.
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("image is too large ({size} bytes, limit {limit})")]
    TooLarge { size: usize, limit: usize },

    #[error("image is empty")]
    Empty,

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes avatars into the media directory.
#[derive(Debug, Clone)]
pub struct AvatarStore {
    media_dir: PathBuf,
}

impl AvatarStore {
    pub fn new(media_dir: impl Into<PathBuf>) -> Self {
        Self {
            media_dir: media_dir.into(),
        }
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// Store an uploaded image and return its media-relative path.
    pub async fn save(
        &self,
        user_id: Uuid,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        let ext = allowed_extension(file_name)?;
        if bytes.is_empty() {
            return Err(StorageError::Empty);
        }
        if bytes.len() > MAX_AVATAR_BYTES {
            return Err(StorageError::TooLarge {
                size: bytes.len(),
                limit: MAX_AVATAR_BYTES,
            });
        }

        let relative = format!("{AVATAR_DIR}/{user_id}-{}.{ext}", Uuid::now_v7());
        let path = self.media_dir.join(&relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        debug!(user_id = %user_id, path = %relative, size = bytes.len(), "Avatar stored");
        Ok(relative)
    }

    /// Delete a previously stored avatar. Missing files are ignored, and
    /// references outside the avatar directory are never touched.
    pub async fn remove(&self, relative: &str) {
        let inside = relative.starts_with(&format!("{AVATAR_DIR}/"))
            && !relative.contains("..")
            && !relative.contains('\\');
        if !inside {
            warn!(path = %relative, "Refusing to remove file outside avatar directory");
            return;
        }
        match tokio::fs::remove_file(self.media_dir.join(relative)).await {
            Ok(()) => debug!(path = %relative, "Old avatar removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %relative, error = %e, "Failed to remove old avatar"),
        }
    }
}

/// Lowercased extension of `file_name` if it is an accepted image type.
fn allowed_extension(file_name: &str) -> Result<String, StorageError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(StorageError::UnsupportedType(if ext.is_empty() {
            file_name.to_string()
        } else {
            ext
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_writes_under_profile_pics() {
        let dir = tempfile::tempdir().unwrap();
        let store = AvatarStore::new(dir.path());
        let user = Uuid::now_v7();

        let relative = store.save(user, "Me.PNG", b"\x89PNG....").await.unwrap();
        assert!(relative.starts_with(&format!("profile_pics/{user}-")));
        assert!(relative.ends_with(".png"));

        let written = tokio::fs::read(dir.path().join(&relative)).await.unwrap();
        assert_eq!(written, b"\x89PNG....");
    }

    #[tokio::test]
    async fn test_rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = AvatarStore::new(dir.path());

        for name in ["script.svg", "noext", "avatar.png.exe"] {
            let err = store.save(Uuid::now_v7(), name, b"data").await.unwrap_err();
            assert!(matches!(err, StorageError::UnsupportedType(_)), "{name}");
        }
    }

    #[tokio::test]
    async fn test_rejects_oversized_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = AvatarStore::new(dir.path());

        let big = vec![0u8; MAX_AVATAR_BYTES + 1];
        assert!(matches!(
            store.save(Uuid::now_v7(), "a.jpg", &big).await,
            Err(StorageError::TooLarge { .. })
        ));
        assert!(matches!(
            store.save(Uuid::now_v7(), "a.jpg", b"").await,
            Err(StorageError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_remove_only_inside_avatar_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = AvatarStore::new(dir.path());
        let relative = store.save(Uuid::now_v7(), "a.gif", b"GIF89a").await.unwrap();

        let outside = dir.path().join("keep.txt");
        tokio::fs::write(&outside, b"keep").await.unwrap();
        store.remove("profile_pics/../keep.txt").await;
        assert!(outside.exists());

        store.remove(&relative).await;
        assert!(!dir.path().join(&relative).exists());
        // Second removal is a no-op.
        store.remove(&relative).await;
    }
}
