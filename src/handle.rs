//! # Lazy Redirect Handle
//!
//! [`RedirectHandle`] is what [`RedirectFs::open_file`](crate::RedirectFs)
//! returns. It answers size and modification time from the snapshot taken at
//! resolution time, and opens the remote object only when data is first
//! touched.
//!
//! ## Backing lifecycle
//!
//! ```text
//! Unopened ──(first read/seek/type/write)──▶ Opened ──(close)──▶ Closed
//!     └───────────────────(close)───────────────────────────────▶ Closed
//! ```
//!
//! The transition out of `Unopened` happens under the handle's mutex, so two
//! threads racing on a fresh handle still open a single backing file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use tracing::{debug, trace, warn};

use crate::{FileType, OpenFlags, RedirectError, RemoteFile, RemoteFs, RemoteLocation};

enum Backing {
    Unopened,
    Opened(Box<dyn RemoteFile>),
    Closed,
}

impl fmt::Debug for Backing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backing::Unopened => "Unopened",
            Backing::Opened(_) => "Opened",
            Backing::Closed => "Closed",
        })
    }
}

/// One open placeholder, redirected to a remote object.
///
/// Size and modification time never change after construction, even if the
/// remote object does.
///
/// Write and truncate calls are a thin pass-through to the backing file.
/// [`RedirectFs`](crate::RedirectFs) rejects those operations before they get
/// here; this type makes no promise about write correctness.
pub struct RedirectHandle {
    path: PathBuf,
    location: RemoteLocation,
    remote: Arc<dyn RemoteFs>,
    backing: Mutex<Backing>,
}

impl fmt::Debug for RedirectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("RedirectHandle");
        out.field("path", &self.path).field("location", &self.location);
        // the lock is not re-entrant; a caller may be holding `ensure_backing`
        match self.backing.try_lock() {
            Some(backing) => out.field("backing", &*backing),
            None => out.field("backing", &format_args!("<locked>")),
        };
        out.finish()
    }
}

impl RedirectHandle {
    /// Create a handle. Performs no I/O.
    pub fn new(
        path: impl Into<PathBuf>,
        location: RemoteLocation,
        remote: Arc<dyn RemoteFs>,
    ) -> Self {
        Self {
            path: path.into(),
            location,
            remote,
            backing: Mutex::new(Backing::Unopened),
        }
    }

    /// Local placeholder path; the handle's display name.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remote object URL.
    pub fn remote_url(&self) -> &str {
        &self.location.remote_url
    }

    /// The resolution snapshot.
    pub fn location(&self) -> &RemoteLocation {
        &self.location
    }

    /// Cached content length. Never touches the remote.
    pub fn size(&self) -> u64 {
        trace!(path = %self.path.display(), "cached size");
        self.location.content_length
    }

    /// Cached modification time. Never touches the remote.
    pub fn last_modified(&self) -> SystemTime {
        trace!(path = %self.path.display(), "cached mtime");
        self.location.last_modified
    }

    /// Whether a backing file is currently open.
    pub fn is_backed(&self) -> bool {
        matches!(*self.backing.lock(), Backing::Opened(_))
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        matches!(*self.backing.lock(), Backing::Closed)
    }

    /// Open the backing file if needed and return it locked.
    ///
    /// Idempotent: the remote is opened at most once per handle. The returned
    /// guard holds the handle's lock; drop it before calling other methods on
    /// the same handle.
    ///
    /// # Errors
    ///
    /// - [`RedirectError::HandleClosed`] after [`close`](Self::close)
    /// - whatever [`RemoteFs::open`] fails with, unchanged
    pub fn ensure_backing(&self) -> Result<MappedMutexGuard<'_, dyn RemoteFile>, RedirectError> {
        let mut guard = self.backing.lock();
        if matches!(*guard, Backing::Closed) {
            return Err(self.closed());
        }
        if matches!(*guard, Backing::Unopened) {
            debug!(
                path = %self.path.display(),
                url = %self.location.remote_url,
                "opening backing file"
            );
            let file = self.remote.open(&self.location.remote_url, OpenFlags::READ)?;
            *guard = Backing::Opened(file);
        }

        MutexGuard::try_map(guard, |backing| match backing {
            Backing::Opened(file) => Some(&mut **file),
            _ => None,
        })
        .map_err(|_| self.closed())
    }

    /// Positioned read from the backing file.
    pub fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize, RedirectError> {
        self.ensure_backing()?.read_at(buf, offset)
    }

    /// Sequential read from the backing file.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, RedirectError> {
        self.ensure_backing()?.read(buf)
    }

    /// Seek the backing file.
    pub fn seek(&self, offset: u64) -> Result<(), RedirectError> {
        self.ensure_backing()?.seek(offset)
    }

    /// Remote objects reached through a redirect are always range-addressable.
    pub fn can_seek(&self) -> bool {
        true
    }

    /// Flush the backing file. No-op when nothing has been opened.
    pub fn sync(&self) -> Result<(), RedirectError> {
        match &mut *self.backing.lock() {
            Backing::Opened(file) => file.sync(),
            Backing::Unopened | Backing::Closed => Ok(()),
        }
    }

    /// Kind of the remote object. Requires the backing file.
    pub fn file_type(&self) -> Result<FileType, RedirectError> {
        self.ensure_backing()?.file_type()
    }

    /// Positioned write, passed straight to the backing file.
    pub fn write_at(&self, data: &[u8], offset: u64) -> Result<usize, RedirectError> {
        self.ensure_backing()?.write_at(data, offset)
    }

    /// Sequential write, passed straight to the backing file.
    pub fn write(&self, data: &[u8]) -> Result<usize, RedirectError> {
        self.ensure_backing()?.write(data)
    }

    /// Truncate, passed straight to the backing file.
    pub fn truncate(&self, size: u64) -> Result<(), RedirectError> {
        self.ensure_backing()?.truncate(size)
    }

    /// Close the backing file if one is open.
    ///
    /// Idempotent. The backing file is released even when its `close` fails;
    /// that failure is returned once.
    pub fn close(&self) -> Result<(), RedirectError> {
        let previous = std::mem::replace(&mut *self.backing.lock(), Backing::Closed);
        match previous {
            Backing::Opened(mut file) => {
                debug!(path = %self.path.display(), "closing backing file");
                file.close()
            }
            Backing::Unopened | Backing::Closed => Ok(()),
        }
    }

    fn closed(&self) -> RedirectError {
        RedirectError::HandleClosed {
            path: self.path.clone(),
        }
    }
}

impl Drop for RedirectHandle {
    fn drop(&mut self) {
        if let Backing::Opened(file) = self.backing.get_mut() {
            if let Err(err) = file.close() {
                warn!(path = %self.path.display(), error = %err, "close on drop failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct Counters {
        opens: AtomicUsize,
        closes: AtomicUsize,
        syncs: AtomicUsize,
    }

    struct CountingFile {
        data: Vec<u8>,
        pos: usize,
        counters: Arc<Counters>,
    }

    impl RemoteFile for CountingFile {
        fn read_at(&mut self, buf: &mut [u8], offset: u64) -> Result<usize, RedirectError> {
            let start = (offset as usize).min(self.data.len());
            let n = buf.len().min(self.data.len() - start);
            buf[..n].copy_from_slice(&self.data[start..start + n]);
            Ok(n)
        }
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, RedirectError> {
            let n = self.read_at(buf, self.pos as u64)?;
            self.pos += n;
            Ok(n)
        }
        fn write_at(&mut self, _: &[u8], _: u64) -> Result<usize, RedirectError> {
            Err(RedirectError::Backend("read-only object".into()))
        }
        fn write(&mut self, _: &[u8]) -> Result<usize, RedirectError> {
            Err(RedirectError::Backend("read-only object".into()))
        }
        fn seek(&mut self, offset: u64) -> Result<(), RedirectError> {
            self.pos = offset as usize;
            Ok(())
        }
        fn sync(&mut self) -> Result<(), RedirectError> {
            self.counters.syncs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        fn truncate(&mut self, _: u64) -> Result<(), RedirectError> {
            Err(RedirectError::Backend("read-only object".into()))
        }
        fn file_type(&mut self) -> Result<FileType, RedirectError> {
            Ok(FileType::File)
        }
        fn close(&mut self) -> Result<(), RedirectError> {
            self.counters.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct CountingRemote {
        counters: Arc<Counters>,
    }

    impl RemoteFs for CountingRemote {
        fn open(&self, url: &str, flags: OpenFlags) -> Result<Box<dyn RemoteFile>, RedirectError> {
            assert_eq!(flags, OpenFlags::READ);
            self.counters.opens.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(CountingFile {
                data: url.as_bytes().to_vec(),
                pos: 0,
                counters: self.counters.clone(),
            }))
        }
    }

    fn handle() -> (RedirectHandle, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let remote = Arc::new(CountingRemote {
            counters: counters.clone(),
        });
        let location = RemoteLocation {
            remote_url: "s3://b/obj1".into(),
            content_length: 10,
            last_modified: SystemTime::UNIX_EPOCH + Duration::from_secs(42),
        };
        (RedirectHandle::new("/data/obj1", location, remote), counters)
    }

    #[test]
    fn metadata_comes_from_snapshot() {
        let (h, counters) = handle();
        assert_eq!(h.size(), 10);
        assert_eq!(
            h.last_modified(),
            SystemTime::UNIX_EPOCH + Duration::from_secs(42)
        );
        assert_eq!(h.path(), Path::new("/data/obj1"));
        assert_eq!(h.remote_url(), "s3://b/obj1");
        assert!(!h.is_backed());
        assert_eq!(counters.opens.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn ensure_backing_opens_once() {
        let (h, counters) = handle();
        for _ in 0..5 {
            drop(h.ensure_backing().unwrap());
        }
        let mut buf = [0u8; 2];
        h.read_at(&mut buf, 0).unwrap();
        h.seek(1).unwrap();
        h.file_type().unwrap();
        assert_eq!(counters.opens.load(Ordering::SeqCst), 1);
        assert!(h.is_backed());
    }

    #[test]
    fn concurrent_first_reads_open_once() {
        let (h, counters) = handle();
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    let mut buf = [0u8; 4];
                    h.read_at(&mut buf, 0).unwrap();
                });
            }
        });
        assert_eq!(counters.opens.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn sequential_read_follows_seek() {
        let (h, _) = handle();
        h.seek(5).unwrap();
        let mut buf = [0u8; 6];
        assert_eq!(h.read(&mut buf).unwrap(), 6);
        assert_eq!(&buf, b"b/obj1");
    }

    #[test]
    fn sync_without_backing_is_noop() {
        let (h, counters) = handle();
        h.sync().unwrap();
        assert_eq!(counters.opens.load(Ordering::SeqCst), 0);
        assert_eq!(counters.syncs.load(Ordering::SeqCst), 0);

        h.ensure_backing().map(drop).unwrap();
        h.sync().unwrap();
        assert_eq!(counters.syncs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn close_is_idempotent() {
        let (h, counters) = handle();
        h.close().unwrap();
        h.close().unwrap();
        assert_eq!(counters.closes.load(Ordering::SeqCst), 0);
        assert!(h.is_closed());
    }

    #[test]
    fn close_releases_backing_once() {
        let (h, counters) = handle();
        h.read_at(&mut [0u8; 1], 0).unwrap();
        h.close().unwrap();
        h.close().unwrap();
        drop(h);
        assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn data_ops_after_close_fail() {
        let (h, counters) = handle();
        h.close().unwrap();
        assert!(matches!(
            h.read_at(&mut [0u8; 1], 0),
            Err(RedirectError::HandleClosed { .. })
        ));
        assert_eq!(counters.opens.load(Ordering::SeqCst), 0);
        h.sync().unwrap();
    }

    #[test]
    fn drop_closes_backing() {
        let (h, counters) = handle();
        h.read_at(&mut [0u8; 1], 0).unwrap();
        drop(h);
        assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn write_is_passed_through() {
        let (h, counters) = handle();
        assert!(matches!(h.write(b"x"), Err(RedirectError::Backend(_))));
        assert!(matches!(h.truncate(0), Err(RedirectError::Backend(_))));
        assert_eq!(counters.opens.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn debug_while_backing_is_held() {
        let (h, _) = handle();
        assert!(format!("{h:?}").contains("Unopened"));
        let guard = h.ensure_backing().unwrap();
        assert!(format!("{h:?}").contains("<locked>"));
        drop(guard);
        assert!(format!("{h:?}").contains("Opened"));
    }

    #[test]
    fn handle_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RedirectHandle>();
    }
}
