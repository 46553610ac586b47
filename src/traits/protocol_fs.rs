//! The capability set a host expects from a pluggable filesystem.
//!
//! A host keeps a registry of [`ProtocolFs`] backends, asks each one whether it
//! [`can_handle`](ProtocolFs::can_handle) a path, and routes every later call
//! for that path to the backend that said yes.
//!
//! Handles are typed: every backend names its own [`Handle`](ProtocolFs::Handle)
//! type, so a handle from one backend cannot be passed to another. There is
//! no runtime handle-kind check to fail.

use std::path::Path;
use std::time::SystemTime;

use crate::{FileType, OpenFileInfo, OpenFlags, RedirectError};

/// A filesystem backend that can be installed into a host registry.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self`; per-handle
/// state lives in the handle.
///
/// # Object Safety
///
/// This trait is object-safe once the handle type is fixed, e.g.
/// `dyn ProtocolFs<Handle = RedirectHandle>`.
pub trait ProtocolFs: Send + Sync {
    /// Handle type produced by [`open_file`](Self::open_file).
    type Handle: Send + Sync;

    // Identification

    /// Protocol name used for registration.
    fn name(&self) -> &str;

    /// Whether this backend wants to serve `path`. Never fails.
    fn can_handle(&self, path: &Path) -> bool;

    // Opening and existence

    /// Open `path`.
    ///
    /// # Errors
    ///
    /// Backend specific; see the implementor.
    fn open_file(&self, path: &Path, flags: OpenFlags) -> Result<Self::Handle, RedirectError>;

    /// Whether `path` can be opened. Never fails.
    fn file_exists(&self, path: &Path) -> bool;

    /// Whether `path` is a directory.
    fn dir_exists(&self, path: &Path) -> Result<bool, RedirectError>;

    // Handle operations

    /// Positioned read.
    fn read_at(
        &self,
        handle: &Self::Handle,
        buf: &mut [u8],
        offset: u64,
    ) -> Result<usize, RedirectError>;

    /// Sequential read.
    fn read(&self, handle: &Self::Handle, buf: &mut [u8]) -> Result<usize, RedirectError>;

    /// Positioned write.
    fn write_at(
        &self,
        handle: &Self::Handle,
        data: &[u8],
        offset: u64,
    ) -> Result<usize, RedirectError>;

    /// Sequential write.
    fn write(&self, handle: &Self::Handle, data: &[u8]) -> Result<usize, RedirectError>;

    /// Move the handle position.
    fn seek(&self, handle: &Self::Handle, offset: u64) -> Result<(), RedirectError>;

    /// Whether handles support [`seek`](Self::seek).
    fn can_seek(&self) -> bool;

    /// Whether the handle refers to a local on-disk file.
    fn on_disk_file(&self, handle: &Self::Handle) -> bool;

    /// Size of the file behind the handle.
    fn file_size(&self, handle: &Self::Handle) -> Result<u64, RedirectError>;

    /// Modification time of the file behind the handle.
    fn last_modified(&self, handle: &Self::Handle) -> Result<SystemTime, RedirectError>;

    /// Kind of the file behind the handle.
    fn file_type(&self, handle: &Self::Handle) -> Result<FileType, RedirectError>;

    /// Flush the handle.
    fn file_sync(&self, handle: &Self::Handle) -> Result<(), RedirectError>;

    /// Truncate the file behind the handle.
    fn truncate(&self, handle: &Self::Handle, size: u64) -> Result<(), RedirectError>;

    // Path operations

    /// Expand a glob pattern.
    fn glob(&self, pattern: &str) -> Result<Vec<OpenFileInfo>, RedirectError>;

    /// Create a directory.
    fn create_dir(&self, path: &Path) -> Result<(), RedirectError>;

    /// Remove a directory.
    fn remove_dir(&self, path: &Path) -> Result<(), RedirectError>;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> Result<(), RedirectError>;

    /// Move a file.
    fn move_file(&self, from: &Path, to: &Path) -> Result<(), RedirectError>;

    /// List a directory, calling `callback(path, is_dir)` per entry.
    fn list_files(
        &self,
        dir: &Path,
        callback: &mut dyn FnMut(&Path, bool),
    ) -> Result<bool, RedirectError>;
}
