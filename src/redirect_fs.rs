//! # Redirecting Filesystem
//!
//! [`RedirectFs`] is the backend the host registers. It claims placeholder
//! paths that carry the redirection attribute, opens them as
//! [`RedirectHandle`]s, and rejects every mutation.
//!
//! ```rust
//! use cwiqfs_redirect::{NativeAttributes, ProtocolFs, RedirectFs, RemoteFs};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! fn install(remote: Arc<dyn RemoteFs>) {
//!     let fs = RedirectFs::new(NativeAttributes, remote);
//!     assert_eq!(fs.name(), "s3redirect");
//!     assert!(!fs.can_handle(Path::new("https://example.com/x")));
//! }
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use tracing::{debug, warn};

use crate::{
    FileType, OpenFileInfo, OpenFlags, PathAttributes, ProtocolFs, RedirectConfig, RedirectError,
    RedirectHandle, RemoteFs, Resolver,
};

/// Read-only filesystem that redirects placeholder paths to remote objects.
///
/// Holds no per-path state: every open resolves again and returns a fresh
/// handle.
pub struct RedirectFs<A> {
    resolver: Resolver<A>,
    remote: Arc<dyn RemoteFs>,
    protocol: String,
}

impl<A: PathAttributes> RedirectFs<A> {
    /// Create a filesystem with the default [`RedirectConfig`].
    pub fn new(attrs: A, remote: Arc<dyn RemoteFs>) -> Self {
        Self::from_validated(attrs, remote, RedirectConfig::default())
    }

    /// Create a filesystem from an explicit config.
    ///
    /// # Errors
    ///
    /// - [`RedirectError::InvalidConfig`] if the config fails validation
    pub fn with_config(
        attrs: A,
        remote: Arc<dyn RemoteFs>,
        config: RedirectConfig,
    ) -> Result<Self, RedirectError> {
        config.validate()?;
        Ok(Self::from_validated(attrs, remote, config))
    }

    pub(crate) fn from_validated(
        attrs: A,
        remote: Arc<dyn RemoteFs>,
        config: RedirectConfig,
    ) -> Self {
        Self {
            resolver: Resolver::new(attrs, config.attribute_name),
            remote,
            protocol: config.protocol,
        }
    }

    /// The resolver used by [`open_file`](ProtocolFs::open_file).
    pub fn resolver(&self) -> &Resolver<A> {
        &self.resolver
    }

    /// The remote backend handles are opened against.
    pub fn remote(&self) -> &Arc<dyn RemoteFs> {
        &self.remote
    }

    fn unsupported(&self, operation: &'static str) -> RedirectError {
        RedirectError::UnsupportedOperation {
            operation,
            protocol: self.protocol.clone(),
        }
    }
}

/// `true` for `scheme://...` paths, which are already remote URLs.
fn is_url(path: &Path) -> bool {
    let Some(s) = path.to_str() else {
        return false;
    };
    let Some((scheme, _)) = s.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl<A: PathAttributes> ProtocolFs for RedirectFs<A> {
    type Handle = RedirectHandle;

    fn name(&self) -> &str {
        &self.protocol
    }

    fn can_handle(&self, path: &Path) -> bool {
        if is_url(path) {
            return false;
        }
        self.resolver.probe(path)
    }

    fn open_file(&self, path: &Path, flags: OpenFlags) -> Result<RedirectHandle, RedirectError> {
        if flags.wants_write() {
            debug!(path = %path.display(), ?flags, "write flags ignored, opening read-only");
        }
        let location = self
            .resolver
            .resolve(path)
            .map_err(|source| RedirectError::Redirect {
                path: path.to_path_buf(),
                source: Box::new(source),
            })?;
        Ok(RedirectHandle::new(path, location, self.remote.clone()))
    }

    fn file_exists(&self, path: &Path) -> bool {
        match self.resolver.resolve(path) {
            Ok(_) => true,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "treating as nonexistent");
                false
            }
        }
    }

    fn dir_exists(&self, _path: &Path) -> Result<bool, RedirectError> {
        Ok(false)
    }

    fn read_at(
        &self,
        handle: &RedirectHandle,
        buf: &mut [u8],
        offset: u64,
    ) -> Result<usize, RedirectError> {
        handle.read_at(buf, offset)
    }

    fn read(&self, handle: &RedirectHandle, buf: &mut [u8]) -> Result<usize, RedirectError> {
        handle.read(buf)
    }

    fn write_at(
        &self,
        _handle: &RedirectHandle,
        _data: &[u8],
        _offset: u64,
    ) -> Result<usize, RedirectError> {
        Err(self.unsupported("write"))
    }

    fn write(&self, _handle: &RedirectHandle, _data: &[u8]) -> Result<usize, RedirectError> {
        Err(self.unsupported("write"))
    }

    fn seek(&self, handle: &RedirectHandle, offset: u64) -> Result<(), RedirectError> {
        handle.seek(offset)
    }

    fn can_seek(&self) -> bool {
        true
    }

    fn on_disk_file(&self, _handle: &RedirectHandle) -> bool {
        false
    }

    fn file_size(&self, handle: &RedirectHandle) -> Result<u64, RedirectError> {
        Ok(handle.size())
    }

    fn last_modified(&self, handle: &RedirectHandle) -> Result<SystemTime, RedirectError> {
        Ok(handle.last_modified())
    }

    fn file_type(&self, _handle: &RedirectHandle) -> Result<FileType, RedirectError> {
        Ok(FileType::File)
    }

    fn file_sync(&self, handle: &RedirectHandle) -> Result<(), RedirectError> {
        handle.sync()
    }

    fn truncate(&self, _handle: &RedirectHandle, _size: u64) -> Result<(), RedirectError> {
        Err(self.unsupported("truncate"))
    }

    fn glob(&self, pattern: &str) -> Result<Vec<OpenFileInfo>, RedirectError> {
        let paths = glob::glob(pattern).map_err(|e| RedirectError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        let mut matches = Vec::new();
        for entry in paths {
            match entry {
                Ok(path) => matches.push(OpenFileInfo::from(path)),
                Err(err) => warn!(pattern, error = %err, "skipping unreadable glob entry"),
            }
        }
        Ok(matches)
    }

    fn create_dir(&self, _path: &Path) -> Result<(), RedirectError> {
        Err(self.unsupported("create_dir"))
    }

    fn remove_dir(&self, _path: &Path) -> Result<(), RedirectError> {
        Err(self.unsupported("remove_dir"))
    }

    fn remove_file(&self, _path: &Path) -> Result<(), RedirectError> {
        Err(self.unsupported("remove_file"))
    }

    fn move_file(&self, _from: &Path, _to: &Path) -> Result<(), RedirectError> {
        Err(self.unsupported("move_file"))
    }

    fn list_files(
        &self,
        _dir: &Path,
        _callback: &mut dyn FnMut(&Path, bool),
    ) -> Result<bool, RedirectError> {
        Err(self.unsupported("list_files"))
    }
}
