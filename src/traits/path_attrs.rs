//! Path attribute and stat primitives.
//!
//! This module provides the [`PathAttributes`] trait, the boundary between the
//! resolver and whatever stores the redirection attribute. The OS-backed
//! implementation is [`NativeAttributes`](crate::NativeAttributes); tests
//! inject in-memory fakes.
//!
//! # Example
//!
//! ```rust
//! use cwiqfs_redirect::{PathAttributes, RedirectError};
//! use std::path::Path;
//!
//! // Generic function that works with any PathAttributes implementation
//! fn has_attribute<A: PathAttributes>(attrs: &A, path: &Path, name: &str) -> bool {
//!     matches!(attrs.attr_len(path, name), Ok(len) if len > 0)
//! }
//! ```

use std::path::Path;

use crate::{PlaceholderStat, RedirectError};

/// Attribute lookup and stat for placeholder paths.
///
/// Calls are synchronous and read-only.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn PathAttributes`.
pub trait PathAttributes: Send + Sync {
    /// Size in bytes of the attribute value, without reading it.
    ///
    /// # Errors
    ///
    /// - [`RedirectError::NotFound`] if the path doesn't exist
    /// - [`RedirectError::AttributeMissing`] if the attribute doesn't exist
    /// - [`RedirectError::PermissionDenied`] if access is denied
    /// - [`RedirectError::Unsupported`] if attributes are not supported
    /// - [`RedirectError::Io`] for any other failure
    fn attr_len(&self, path: &Path, name: &str) -> Result<usize, RedirectError>;

    /// Read at most `len` bytes of the attribute value.
    ///
    /// The returned buffer holds exactly the bytes reported by the store; no
    /// NUL terminator is assumed or stripped.
    ///
    /// # Errors
    ///
    /// Same as [`attr_len`](Self::attr_len).
    fn read_attr(&self, path: &Path, name: &str, len: usize) -> Result<Vec<u8>, RedirectError>;

    /// Size and modification time of the path.
    ///
    /// # Errors
    ///
    /// - [`RedirectError::Io`] if the path cannot be stat'ed
    fn stat(&self, path: &Path) -> Result<PlaceholderStat, RedirectError>;
}

impl<A: PathAttributes + ?Sized> PathAttributes for std::sync::Arc<A> {
    fn attr_len(&self, path: &Path, name: &str) -> Result<usize, RedirectError> {
        (**self).attr_len(path, name)
    }

    fn read_attr(&self, path: &Path, name: &str, len: usize) -> Result<Vec<u8>, RedirectError> {
        (**self).read_attr(path, name, len)
    }

    fn stat(&self, path: &Path) -> Result<PlaceholderStat, RedirectError> {
        (**self).stat(path)
    }
}
