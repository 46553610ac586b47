//! Error types for the redirection layer.

use std::path::PathBuf;

/// Redirection error type with contextual variants.
///
/// All variants carry the path or operation they relate to. Uses
/// `#[non_exhaustive]` for forward compatibility.
///
/// # Examples
///
/// ```rust
/// use cwiqfs_redirect::RedirectError;
/// use std::path::PathBuf;
///
/// let err = RedirectError::NotFound { path: PathBuf::from("/data/obj1") };
/// assert_eq!(err.to_string(), "not found: /data/obj1");
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum RedirectError {
    // Resolution errors
    /// The placeholder path does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The path exists but carries no redirection attribute.
    #[error("attribute does not exist: {name} on {path}")]
    AttributeMissing {
        /// The path that was probed.
        path: PathBuf,
        /// The attribute name that was looked up.
        name: String,
    },

    /// Permission denied while reading the attribute or stat data.
    #[error("{operation}: permission denied: {path}")]
    PermissionDenied {
        /// The path where permission was denied.
        path: PathBuf,
        /// The operation that was denied.
        operation: &'static str,
    },

    /// The platform or the underlying filesystem has no extended attributes.
    #[error("extended attributes not supported: {path}")]
    Unsupported {
        /// The path that was probed.
        path: PathBuf,
    },

    /// The redirection attribute is present but empty.
    #[error("empty attribute value: {name} on {path}")]
    EmptyValue {
        /// The path carrying the empty attribute.
        path: PathBuf,
        /// The attribute name.
        name: String,
    },

    /// The attribute value is not a usable URL.
    #[error("invalid data: {path} ({details})")]
    InvalidData {
        /// The path with invalid data.
        path: PathBuf,
        /// Details about the invalid data.
        details: String,
    },

    /// I/O error with context.
    #[error("{operation} failed for {path}: {source}")]
    Io {
        /// The operation that failed.
        operation: &'static str,
        /// The path involved in the operation.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    // Dispatch errors
    /// Mutating operations are rejected by this read-only backend.
    #[error("{operation} not supported for {protocol}:// protocol")]
    UnsupportedOperation {
        /// The rejected operation.
        operation: &'static str,
        /// The protocol name of the rejecting filesystem.
        protocol: String,
    },

    /// A data operation was issued on a handle after `close`.
    #[error("handle closed: {path}")]
    HandleClosed {
        /// Display path of the closed handle.
        path: PathBuf,
    },

    /// The glob pattern could not be parsed.
    #[error("invalid glob pattern {pattern}: {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Parser message.
        reason: String,
    },

    /// Resolution failed while opening a placeholder.
    #[error("failed to redirect {path}: {source}")]
    Redirect {
        /// The placeholder path being opened.
        path: PathBuf,
        /// The original resolution error.
        #[source]
        source: Box<RedirectError>,
    },

    /// Error reported by the remote backend.
    #[error("backend error: {0}")]
    Backend(String),

    // Configuration errors
    /// Configuration rejected by validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl RedirectError {
    /// Returns the innermost error, skipping [`RedirectError::Redirect`] wrappers.
    ///
    /// ```rust
    /// use cwiqfs_redirect::RedirectError;
    /// use std::path::PathBuf;
    ///
    /// let err = RedirectError::Redirect {
    ///     path: PathBuf::from("/data/obj1"),
    ///     source: Box::new(RedirectError::NotFound { path: PathBuf::from("/data/obj1") }),
    /// };
    /// assert!(matches!(err.root_cause(), RedirectError::NotFound { .. }));
    /// ```
    pub fn root_cause(&self) -> &RedirectError {
        let mut err = self;
        while let RedirectError::Redirect { source, .. } = err {
            err = source;
        }
        err
    }

    /// Map an OS error from an attribute call to the matching variant.
    pub(crate) fn from_attr_io(error: std::io::Error, path: PathBuf, name: &str) -> Self {
        #[cfg(unix)]
        {
            #[cfg(any(target_os = "linux", target_os = "android"))]
            const MISSING: i32 = libc::ENODATA;
            #[cfg(not(any(target_os = "linux", target_os = "android")))]
            const MISSING: i32 = libc::ENOATTR;

            match error.raw_os_error() {
                Some(MISSING) => {
                    return RedirectError::AttributeMissing {
                        path,
                        name: name.to_string(),
                    };
                }
                Some(code) if code == libc::ENOTSUP || code == libc::EOPNOTSUPP => {
                    return RedirectError::Unsupported { path };
                }
                _ => {}
            }
        }
        #[cfg(not(unix))]
        let _ = name;

        match error.kind() {
            std::io::ErrorKind::NotFound => RedirectError::NotFound { path },
            std::io::ErrorKind::PermissionDenied => RedirectError::PermissionDenied {
                path,
                operation: "getxattr",
            },
            std::io::ErrorKind::Unsupported => RedirectError::Unsupported { path },
            _ => RedirectError::Io {
                operation: "getxattr",
                path,
                source: error,
            },
        }
    }
}
