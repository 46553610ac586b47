//! # Resolver
//!
//! Maps a placeholder path to a [`RemoteLocation`] by reading the redirection
//! attribute and stat'ing the path.
//!
//! The placeholder's own size and modification time stand in for the remote
//! object's. An external sync process keeps them accurate; checking them
//! against the remote would cost the round trip this layer exists to avoid.
//!
//! ```rust
//! use cwiqfs_redirect::{NativeAttributes, RedirectError, Resolver};
//! use std::path::Path;
//!
//! let resolver = Resolver::new(NativeAttributes, "user.cwiqfs.s3_url");
//! let result = resolver.resolve(Path::new("/definitely/not/here"));
//! assert!(result.is_err());
//! ```

use std::path::Path;

use tracing::debug;

use crate::{PathAttributes, RedirectError, RemoteLocation};

/// Stateless placeholder resolver.
#[derive(Debug, Clone)]
pub struct Resolver<A> {
    attrs: A,
    attribute_name: String,
}

impl<A: PathAttributes> Resolver<A> {
    /// Create a resolver reading `attribute_name` through `attrs`.
    pub fn new(attrs: A, attribute_name: impl Into<String>) -> Self {
        Self {
            attrs,
            attribute_name: attribute_name.into(),
        }
    }

    /// The attribute this resolver reads.
    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    /// The attribute source.
    pub fn attrs(&self) -> &A {
        &self.attrs
    }

    /// Resolve `path` to its remote location.
    ///
    /// Either every field is populated or the call fails; there is no partial
    /// result.
    ///
    /// # Errors
    ///
    /// - [`RedirectError::NotFound`] if the path doesn't exist
    /// - [`RedirectError::AttributeMissing`] if the path carries no attribute
    /// - [`RedirectError::PermissionDenied`] if access is denied
    /// - [`RedirectError::Unsupported`] if attributes are unavailable
    /// - [`RedirectError::EmptyValue`] if the attribute is present but empty
    /// - [`RedirectError::InvalidData`] if the value is not UTF-8
    /// - [`RedirectError::Io`] if the stat or any other call fails
    pub fn resolve(&self, path: &Path) -> Result<RemoteLocation, RedirectError> {
        let name = self.attribute_name.as_str();

        let len = self.attrs.attr_len(path, name)?;
        if len == 0 {
            return Err(self.empty_value(path));
        }

        let value = self.attrs.read_attr(path, name, len)?;
        if value.is_empty() {
            return Err(self.empty_value(path));
        }
        let remote_url = String::from_utf8(value).map_err(|e| RedirectError::InvalidData {
            path: path.to_path_buf(),
            details: format!("{name} is not valid UTF-8: {e}"),
        })?;

        let stat = self.attrs.stat(path)?;

        debug!(
            path = %path.display(),
            url = %remote_url,
            size = stat.size,
            "resolved placeholder"
        );

        Ok(RemoteLocation {
            remote_url,
            content_length: stat.size,
            last_modified: stat.modified,
        })
    }

    /// Size-only check: `true` when the attribute exists and is non-empty.
    ///
    /// Does not read the value. Every error counts as `false`.
    pub fn probe(&self, path: &Path) -> bool {
        match self.attrs.attr_len(path, &self.attribute_name) {
            Ok(len) => len > 0,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "probe failed");
                false
            }
        }
    }

    fn empty_value(&self, path: &Path) -> RedirectError {
        RedirectError::EmptyValue {
            path: path.to_path_buf(),
            name: self.attribute_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlaceholderStat;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, SystemTime};

    const NAME: &str = "system.cwiqfs.s3_url";

    #[derive(Default)]
    struct FakeAttrs {
        values: HashMap<PathBuf, Vec<u8>>,
        stats: HashMap<PathBuf, PlaceholderStat>,
        reads: AtomicUsize,
    }

    impl FakeAttrs {
        fn with(mut self, path: &str, value: &[u8], size: u64) -> Self {
            self.values.insert(path.into(), value.to_vec());
            self.stats.insert(
                path.into(),
                PlaceholderStat {
                    size,
                    modified: SystemTime::UNIX_EPOCH + Duration::from_secs(size),
                },
            );
            self
        }
    }

    impl PathAttributes for FakeAttrs {
        fn attr_len(&self, path: &Path, name: &str) -> Result<usize, RedirectError> {
            if !self.stats.contains_key(path) {
                return Err(RedirectError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            self.values
                .get(path)
                .map(Vec::len)
                .ok_or_else(|| RedirectError::AttributeMissing {
                    path: path.to_path_buf(),
                    name: name.to_string(),
                })
        }

        fn read_attr(&self, path: &Path, name: &str, len: usize) -> Result<Vec<u8>, RedirectError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            let mut value = self.values.get(path).cloned().ok_or_else(|| {
                RedirectError::AttributeMissing {
                    path: path.to_path_buf(),
                    name: name.to_string(),
                }
            })?;
            value.truncate(len);
            Ok(value)
        }

        fn stat(&self, path: &Path) -> Result<PlaceholderStat, RedirectError> {
            self.stats.get(path).copied().ok_or_else(|| RedirectError::Io {
                operation: "stat",
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }

    #[test]
    fn resolves_url_and_stat() {
        let resolver = Resolver::new(
            FakeAttrs::default().with("/a", b"s3://bucket/key", 4096),
            NAME,
        );
        let loc = resolver.resolve(Path::new("/a")).unwrap();
        assert_eq!(
            loc,
            RemoteLocation {
                remote_url: "s3://bucket/key".into(),
                content_length: 4096,
                last_modified: SystemTime::UNIX_EPOCH + Duration::from_secs(4096),
            }
        );
    }

    #[test]
    fn value_is_not_nul_terminated() {
        let resolver = Resolver::new(FakeAttrs::default().with("/a", b"s3://b/k\0junk", 1), NAME);
        let loc = resolver.resolve(Path::new("/a")).unwrap();
        assert_eq!(loc.remote_url, "s3://b/k\0junk");
    }

    #[test]
    fn empty_value_is_rejected_before_read() {
        let attrs = FakeAttrs::default().with("/a", b"", 0);
        let resolver = Resolver::new(attrs, NAME);
        let err = resolver.resolve(Path::new("/a")).unwrap_err();
        assert!(matches!(err, RedirectError::EmptyValue { .. }));
        assert_eq!(resolver.attrs().reads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn missing_attribute() {
        let mut attrs = FakeAttrs::default();
        attrs.stats.insert("/plain".into(), PlaceholderStat::default());
        let resolver = Resolver::new(attrs, NAME);
        match resolver.resolve(Path::new("/plain")) {
            Err(RedirectError::AttributeMissing { path, name }) => {
                assert_eq!(path, PathBuf::from("/plain"));
                assert_eq!(name, NAME);
            }
            other => panic!("expected AttributeMissing, got {other:?}"),
        }
    }

    #[test]
    fn missing_path() {
        let resolver = Resolver::new(FakeAttrs::default(), NAME);
        assert!(matches!(
            resolver.resolve(Path::new("/nope")),
            Err(RedirectError::NotFound { .. })
        ));
    }

    #[test]
    fn non_utf8_value_is_invalid_data() {
        let resolver = Resolver::new(FakeAttrs::default().with("/a", &[0xff, 0xfe], 1), NAME);
        assert!(matches!(
            resolver.resolve(Path::new("/a")),
            Err(RedirectError::InvalidData { .. })
        ));
    }

    #[test]
    fn probe_does_not_read_value() {
        let resolver = Resolver::new(FakeAttrs::default().with("/a", b"s3://b/a", 1), NAME);
        assert!(resolver.probe(Path::new("/a")));
        assert!(!resolver.probe(Path::new("/missing")));
        assert_eq!(resolver.attrs().reads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn probe_rejects_empty_value() {
        let resolver = Resolver::new(FakeAttrs::default().with("/a", b"", 0), NAME);
        assert!(!resolver.probe(Path::new("/a")));
    }
}
