//! OS-backed [`PathAttributes`] using `getxattr(2)` and `stat(2)`.
//!
//! Supported on Linux, Android and macOS. Everywhere else every attribute
//! call fails with [`RedirectError::Unsupported`], so nothing is ever
//! redirected.

use std::path::Path;

use crate::{PathAttributes, PlaceholderStat, RedirectError};

/// Reads attributes and stat data from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeAttributes;

impl NativeAttributes {
    /// Whether this build can read extended attributes at all.
    pub const fn supported() -> bool {
        cfg!(any(
            target_os = "linux",
            target_os = "android",
            target_os = "macos"
        ))
    }
}

impl PathAttributes for NativeAttributes {
    fn attr_len(&self, path: &Path, name: &str) -> Result<usize, RedirectError> {
        sys::getxattr(path, name, None)
            .map_err(|e| RedirectError::from_attr_io(e, path.to_path_buf(), name))
    }

    fn read_attr(&self, path: &Path, name: &str, len: usize) -> Result<Vec<u8>, RedirectError> {
        let mut buf = vec![0u8; len];
        let n = sys::getxattr(path, name, Some(&mut buf))
            .map_err(|e| RedirectError::from_attr_io(e, path.to_path_buf(), name))?;
        buf.truncate(n);
        Ok(buf)
    }

    fn stat(&self, path: &Path) -> Result<PlaceholderStat, RedirectError> {
        let io_err = |source| RedirectError::Io {
            operation: "stat",
            path: path.to_path_buf(),
            source,
        };
        let meta = std::fs::metadata(path).map_err(io_err)?;
        let modified = meta.modified().map_err(io_err)?;
        Ok(PlaceholderStat {
            size: meta.len(),
            modified,
        })
    }
}

#[cfg(any(target_os = "linux", target_os = "android", target_os = "macos"))]
mod sys {
    use std::ffi::CString;
    use std::io;
    use std::os::unix::ffi::OsStrExt;
    use std::path::Path;

    /// `getxattr` with a size query when `buf` is `None`.
    pub(super) fn getxattr(path: &Path, name: &str, buf: Option<&mut [u8]>) -> io::Result<usize> {
        let path = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains NUL"))?;
        let name = CString::new(name)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "name contains NUL"))?;

        let (ptr, size) = match buf {
            Some(buf) => (buf.as_mut_ptr().cast::<libc::c_void>(), buf.len()),
            None => (std::ptr::null_mut(), 0),
        };

        // SAFETY: both strings are NUL-terminated and outlive the call; `ptr`
        // is either null with size 0 or valid for `size` writable bytes.
        #[cfg(target_os = "macos")]
        let ret = unsafe { libc::getxattr(path.as_ptr(), name.as_ptr(), ptr, size, 0, 0) };
        #[cfg(not(target_os = "macos"))]
        let ret = unsafe { libc::getxattr(path.as_ptr(), name.as_ptr(), ptr, size) };

        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(ret as usize)
    }
}

#[cfg(not(any(target_os = "linux", target_os = "android", target_os = "macos")))]
mod sys {
    use std::io;
    use std::path::Path;

    pub(super) fn getxattr(
        _path: &Path,
        _name: &str,
        _buf: Option<&mut [u8]>,
    ) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::Unsupported))
    }
}
