//! Serving placeholder paths from an in-memory object store.
//!
//! Two collaborators are faked here: a table of placeholder attributes
//! standing in for the local filesystem, and a map of objects standing in
//! for the remote store. `RedirectFs` glues them together.
//!
//! Run with: `cargo run --example redirect_usage`

use cwiqfs_redirect::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime};

// =============================================================================
// Step 1: Placeholder attributes
// =============================================================================

/// Local placeholders: path -> (attribute value, stat).
#[derive(Default)]
struct MemAttributes {
    entries: HashMap<PathBuf, (Vec<u8>, PlaceholderStat)>,
}

impl MemAttributes {
    fn placeholder(mut self, path: &str, url: &str, size: u64) -> Self {
        let stat = PlaceholderStat {
            size,
            modified: SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000),
        };
        self.entries
            .insert(PathBuf::from(path), (url.as_bytes().to_vec(), stat));
        self
    }

    fn entry(&self, path: &Path) -> Result<&(Vec<u8>, PlaceholderStat), RedirectError> {
        self.entries.get(path).ok_or_else(|| RedirectError::NotFound {
            path: path.to_path_buf(),
        })
    }
}

impl PathAttributes for MemAttributes {
    fn attr_len(&self, path: &Path, _name: &str) -> Result<usize, RedirectError> {
        Ok(self.entry(path)?.0.len())
    }

    fn read_attr(&self, path: &Path, _name: &str, len: usize) -> Result<Vec<u8>, RedirectError> {
        let value = &self.entry(path)?.0;
        Ok(value[..len.min(value.len())].to_vec())
    }

    fn stat(&self, path: &Path) -> Result<PlaceholderStat, RedirectError> {
        Ok(self.entry(path)?.1)
    }
}

// =============================================================================
// Step 2: A remote store that counts its connections
// =============================================================================

#[derive(Default)]
struct MemRemote {
    objects: HashMap<String, Vec<u8>>,
    opens: AtomicUsize,
}

impl RemoteFs for MemRemote {
    fn open(&self, url: &str, _flags: OpenFlags) -> Result<Box<dyn RemoteFile>, RedirectError> {
        let data = self
            .objects
            .get(url)
            .cloned()
            .ok_or_else(|| RedirectError::Backend(format!("no such object: {url}")))?;
        self.opens.fetch_add(1, Ordering::SeqCst);
        println!("  [remote] open {url}");
        Ok(Box::new(MemObject { data, pos: 0 }))
    }
}

struct MemObject {
    data: Vec<u8>,
    pos: usize,
}

impl RemoteFile for MemObject {
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

    fn write_at(&mut self, _data: &[u8], _offset: u64) -> Result<usize, RedirectError> {
        Err(RedirectError::Backend("read-only store".into()))
    }

    fn write(&mut self, _data: &[u8]) -> Result<usize, RedirectError> {
        Err(RedirectError::Backend("read-only store".into()))
    }

    fn seek(&mut self, offset: u64) -> Result<(), RedirectError> {
        self.pos = offset as usize;
        Ok(())
    }

    fn sync(&mut self) -> Result<(), RedirectError> {
        Ok(())
    }

    fn truncate(&mut self, _size: u64) -> Result<(), RedirectError> {
        Err(RedirectError::Backend("read-only store".into()))
    }

    fn file_type(&mut self) -> Result<FileType, RedirectError> {
        Ok(FileType::File)
    }

    fn close(&mut self) -> Result<(), RedirectError> {
        println!("  [remote] close");
        Ok(())
    }
}

// =============================================================================
// Step 3: Use it
// =============================================================================

fn main() -> Result<(), RedirectError> {
    let mut remote = MemRemote::default();
    remote
        .objects
        .insert("s3://bucket/obj1".into(), b"hello from the bucket".to_vec());
    let remote = Arc::new(remote);

    let attrs = MemAttributes::default().placeholder("/data/obj1", "s3://bucket/obj1", 21);
    let fs = RedirectLayer::new(attrs).layer_shared(remote.clone());

    println!("protocol: {}", fs.name());
    println!("handles /data/obj1: {}", fs.can_handle(Path::new("/data/obj1")));
    println!("handles /data/plain: {}", fs.can_handle(Path::new("/data/plain")));
    println!("handles s3://bucket/obj1: {}", fs.can_handle(Path::new("s3://bucket/obj1")));

    let handle = fs.open_file(Path::new("/data/obj1"), OpenFlags::READ)?;
    println!("open: {} -> {}", handle.path().display(), handle.remote_url());

    // Metadata comes from the placeholder; the remote is still untouched.
    println!("size: {}", fs.file_size(&handle)?);
    println!("remote opens so far: {}", remote.opens.load(Ordering::SeqCst));

    let mut buf = vec![0u8; 5];
    let n = fs.read_at(&handle, &mut buf, 0)?;
    println!("read: {:?}", String::from_utf8_lossy(&buf[..n]));
    fs.seek(&handle, 11)?;
    let mut rest = vec![0u8; 10];
    let n = fs.read(&handle, &mut rest)?;
    println!("read after seek: {:?}", String::from_utf8_lossy(&rest[..n]));
    println!("remote opens so far: {}", remote.opens.load(Ordering::SeqCst));

    match fs.remove_file(Path::new("/data/obj1")) {
        Err(err) => println!("remove_file: {err}"),
        Ok(()) => println!("remove_file unexpectedly succeeded"),
    }

    match fs.open_file(Path::new("/data/plain"), OpenFlags::READ) {
        Err(err) => println!("open /data/plain: {err} (root cause: {})", err.root_cause()),
        Ok(_) => println!("open /data/plain unexpectedly succeeded"),
    }

    handle.close()?;
    Ok(())
}
