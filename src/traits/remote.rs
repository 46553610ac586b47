//! The remote object store boundary.
//!
//! [`RemoteFs`] is "the filesystem responsible for URL X": given a remote URL
//! it returns a [`RemoteFile`]. Connection handling, auth, ranged reads and
//! retries all live behind these traits. The redirection layer only ever
//! calls [`RemoteFs::open`] once per handle.
//!
//! # Example
//!
//! ```rust
//! use cwiqfs_redirect::{OpenFlags, RedirectError, RemoteFs};
//!
//! // Generic function that works with any RemoteFs implementation
//! fn read_header(remote: &dyn RemoteFs, url: &str) -> Result<[u8; 4], RedirectError> {
//!     let mut file = remote.open(url, OpenFlags::READ)?;
//!     let mut magic = [0u8; 4];
//!     file.read_at(&mut magic, 0)?;
//!     file.close()?;
//!     Ok(magic)
//! }
//! ```

use crate::{FileType, OpenFlags, RedirectError};

/// Opens remote objects by URL.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. One instance is shared by every
/// handle a [`RedirectFs`](crate::RedirectFs) creates.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn RemoteFs`.
pub trait RemoteFs: Send + Sync {
    /// Open `url` and return a connected file.
    ///
    /// # Errors
    ///
    /// Whatever the remote client reports; the redirection layer propagates
    /// it unchanged.
    fn open(&self, url: &str, flags: OpenFlags) -> Result<Box<dyn RemoteFile>, RedirectError>;
}

impl<R: RemoteFs + ?Sized> RemoteFs for std::sync::Arc<R> {
    fn open(&self, url: &str, flags: OpenFlags) -> Result<Box<dyn RemoteFile>, RedirectError> {
        (**self).open(url, flags)
    }
}

/// A connected remote file.
///
/// Methods take `&mut self`: a file is owned by exactly one
/// [`RedirectHandle`](crate::RedirectHandle), which serializes access.
pub trait RemoteFile: Send {
    /// Read into `buf` starting at `offset`. Returns the number of bytes read.
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> Result<usize, RedirectError>;

    /// Read into `buf` from the current position.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, RedirectError>;

    /// Write `data` at `offset`.
    fn write_at(&mut self, data: &[u8], offset: u64) -> Result<usize, RedirectError>;

    /// Write `data` at the current position.
    fn write(&mut self, data: &[u8]) -> Result<usize, RedirectError>;

    /// Move the current position to `offset`.
    fn seek(&mut self, offset: u64) -> Result<(), RedirectError>;

    /// Flush pending state to the remote store.
    fn sync(&mut self) -> Result<(), RedirectError>;

    /// Truncate or extend the object to `size` bytes.
    fn truncate(&mut self, size: u64) -> Result<(), RedirectError>;

    /// Kind of the remote object.
    fn file_type(&mut self) -> Result<FileType, RedirectError>;

    /// Release the connection.
    fn close(&mut self) -> Result<(), RedirectError>;
}
