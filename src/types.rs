//! Core types for the redirection layer.

use std::path::PathBuf;
use std::time::SystemTime;

/// Type of a remote object as reported by a backing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FileType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
}

/// Where a placeholder points, and the metadata captured when it was resolved.
///
/// Produced by [`Resolver::resolve`](crate::Resolver::resolve). Never persisted;
/// every open resolves again.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemoteLocation {
    /// Remote object URL, e.g. `s3://bucket/key`.
    pub remote_url: String,
    /// Object size in bytes, taken from the placeholder's stat.
    pub content_length: u64,
    /// Modification time, taken from the placeholder's stat.
    #[cfg_attr(feature = "serde", serde(with = "system_time_serde"))]
    pub last_modified: SystemTime,
}

/// Size and modification time of a placeholder path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderStat {
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
}

impl Default for PlaceholderStat {
    fn default() -> Self {
        Self {
            size: 0,
            modified: SystemTime::UNIX_EPOCH,
        }
    }
}

/// A path produced by [`ProtocolFs::glob`](crate::ProtocolFs::glob).
///
/// Holds the local placeholder path, not the remote URL. Open it through the
/// same filesystem to get redirection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpenFileInfo {
    /// Local path of the match.
    pub path: PathBuf,
}

impl From<PathBuf> for OpenFileInfo {
    fn from(path: PathBuf) -> Self {
        Self { path }
    }
}

/// Flags for opening a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpenFlags {
    /// Open for reading.
    pub read: bool,
    /// Open for writing.
    pub write: bool,
    /// Create file if it doesn't exist.
    pub create: bool,
    /// Truncate file to zero length.
    pub truncate: bool,
    /// Append to end of file.
    pub append: bool,
}

impl OpenFlags {
    /// Read-only access.
    pub const READ: Self = Self {
        read: true,
        write: false,
        create: false,
        truncate: false,
        append: false,
    };

    /// Write access with create and truncate.
    pub const WRITE: Self = Self {
        read: false,
        write: true,
        create: true,
        truncate: true,
        append: false,
    };

    /// Returns `true` if any flag asks for modification.
    #[inline]
    pub const fn wants_write(&self) -> bool {
        self.write || self.create || self.truncate || self.append
    }
}

/// Serde support for SystemTime (when serde feature is enabled).
#[cfg(feature = "serde")]
mod system_time_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let duration = time.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
        (duration.as_secs(), duration.subsec_nanos()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (secs, nanos): (u64, u32) = Deserialize::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + Duration::new(secs, nanos))
    }
}
