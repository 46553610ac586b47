//! # cwiqfs-redirect
//!
//! A read-only filesystem backend that serves **placeholder paths** from a
//! remote object store.
//!
//! A placeholder is a local file carrying an extended attribute (by default
//! `system.cwiqfs.s3_url`) that holds the remote object's URL. Opening it
//! through [`RedirectFs`] returns a [`RedirectHandle`] that:
//!
//! - reports size and modification time from the placeholder's stat, with no
//!   network round trip
//! - opens the remote object only on the first read, seek or type query, and
//!   only once
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust
//! use cwiqfs_redirect::{NativeAttributes, OpenFlags, ProtocolFs, RedirectError, RedirectFs, RemoteFs};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! fn first_bytes(remote: Arc<dyn RemoteFs>, path: &Path) -> Result<Vec<u8>, RedirectError> {
//!     let fs = RedirectFs::new(NativeAttributes, remote);
//!     if !fs.can_handle(path) {
//!         return Ok(Vec::new());
//!     }
//!     let handle = fs.open_file(path, OpenFlags::READ)?;
//!     // Served from the placeholder, no remote call yet.
//!     let len = fs.file_size(&handle)?.min(16) as usize;
//!     let mut buf = vec![0u8; len];
//!     // First read opens the remote object.
//!     let n = fs.read_at(&handle, &mut buf, 0)?;
//!     buf.truncate(n);
//!     handle.close()?;
//!     Ok(buf)
//! }
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Resolver`] | Placeholder path → [`RemoteLocation`] |
//! | [`RedirectHandle`] | Lazy handle with cached metadata |
//! | [`RedirectFs`] | Backend registered with the host ([`ProtocolFs`]) |
//! | [`Extension`] | Composition root that registers the backend |
//! | [`RedirectError`] | Closed error taxonomy with context |
//!
//! ---
//!
//! ## Error Handling
//!
//! All fallible operations return `Result<T, RedirectError>`. Open failures
//! are wrapped with the path being opened; [`RedirectError::root_cause`]
//! recovers the original kind:
//!
//! ```rust
//! use cwiqfs_redirect::RedirectError;
//! use std::path::PathBuf;
//!
//! let err = RedirectError::Redirect {
//!     path: PathBuf::from("/data/obj1"),
//!     source: Box::new(RedirectError::AttributeMissing {
//!         path: PathBuf::from("/data/obj1"),
//!         name: "system.cwiqfs.s3_url".into(),
//!     }),
//! };
//! assert!(matches!(err.root_cause(), RedirectError::AttributeMissing { .. }));
//! ```
//!
//! `can_handle` and `file_exists` are predicates: they never fail and treat
//! every error as "no".
//!
//! ---
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync` and take `&self`. A handle's backing file
//! sits behind a mutex, so concurrent first reads on one handle still open the
//! remote object once.
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialization for [`RemoteLocation`], [`RedirectConfig`], etc., and `RedirectConfig::from_json` |

// Private modules
mod config;
mod error;
mod extension;
mod handle;
mod layer;
mod native;
mod redirect_fs;
mod resolver;
mod traits;
mod types;

// Public re-exports - error types
pub use error::RedirectError;

// Public re-exports - core types
pub use types::{FileType, OpenFileInfo, OpenFlags, PlaceholderStat, RemoteLocation};

// Public re-exports - configuration
pub use config::{DEFAULT_ATTRIBUTE_NAME, DEFAULT_PROTOCOL, RedirectConfig};

// Public re-exports - collaborator traits
pub use traits::{PathAttributes, ProtocolFs, RemoteFile, RemoteFs};

// Public re-exports - components
pub use handle::RedirectHandle;
pub use native::NativeAttributes;
pub use redirect_fs::RedirectFs;
pub use resolver::Resolver;

// Public re-exports - infrastructure
pub use extension::{EXTENSION_NAME, Extension, SubSystemRegistry};
pub use layer::{Layer, LayerExt, RedirectLayer};
