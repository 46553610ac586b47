//! # Layer Trait
//!
//! Tower-style composition: wrap a remote backend to get a filesystem.
//!
//! ```text
//! RemoteFs ──▶ RedirectLayer::layer() ──▶ RedirectFs
//! ```
//!
//! ## Example
//!
//! ```rust
//! use cwiqfs_redirect::{LayerExt, NativeAttributes, ProtocolFs, RedirectLayer, RemoteFs};
//!
//! fn build<R: RemoteFs + 'static>(remote: R) -> impl ProtocolFs {
//!     remote.layer(RedirectLayer::new(NativeAttributes))
//! }
//! ```

use std::sync::Arc;

use crate::{PathAttributes, RedirectConfig, RedirectError, RedirectFs, RemoteFs};

/// A layer that wraps a backend to add functionality.
///
/// Inspired by Tower's `Layer` trait.
///
/// - `layer(self, backend)` consumes both the layer and backend
/// - Not object-safe; layers are compile-time composition
pub trait Layer<B> {
    /// The resulting backend type after applying this layer.
    type Backend;

    /// Wrap the given backend with this layer's functionality.
    fn layer(self, backend: B) -> Self::Backend;
}

/// Extension trait for fluent layer composition on any [`RemoteFs`].
pub trait LayerExt: RemoteFs + Sized {
    /// Apply a layer to this backend.
    fn layer<L: Layer<Self>>(self, layer: L) -> L::Backend {
        layer.layer(self)
    }
}

// Blanket implementation - any RemoteFs gets LayerExt for free
impl<R: RemoteFs> LayerExt for R {}

/// Turns a remote backend into a [`RedirectFs`].
#[derive(Debug, Clone)]
pub struct RedirectLayer<A> {
    attrs: A,
    config: RedirectConfig,
}

impl<A: PathAttributes> RedirectLayer<A> {
    /// Layer with the default config.
    pub fn new(attrs: A) -> Self {
        Self {
            attrs,
            config: RedirectConfig::default(),
        }
    }

    /// Layer with an explicit config.
    ///
    /// # Errors
    ///
    /// - [`RedirectError::InvalidConfig`] if the config fails validation
    pub fn with_config(attrs: A, config: RedirectConfig) -> Result<Self, RedirectError> {
        config.validate()?;
        Ok(Self { attrs, config })
    }

    /// Apply the layer to a remote that is already shared.
    ///
    /// The `Arc` is reused as is; [`Layer::layer`] would wrap it again.
    pub fn layer_shared(self, remote: Arc<dyn RemoteFs>) -> RedirectFs<A> {
        // config was validated when the layer was built
        RedirectFs::from_validated(self.attrs, remote, self.config)
    }
}

impl<A: PathAttributes, R: RemoteFs + 'static> Layer<R> for RedirectLayer<A> {
    type Backend = RedirectFs<A>;

    fn layer(self, backend: R) -> RedirectFs<A> {
        self.layer_shared(Arc::new(backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OpenFlags, PlaceholderStat, ProtocolFs, RemoteFile};
    use std::path::Path;

    struct NoRemote;

    impl RemoteFs for NoRemote {
        fn open(&self, url: &str, _: OpenFlags) -> Result<Box<dyn RemoteFile>, RedirectError> {
            Err(RedirectError::Backend(format!("unreachable: {url}")))
        }
    }

    struct NoAttrs;

    impl PathAttributes for NoAttrs {
        fn attr_len(&self, path: &Path, _: &str) -> Result<usize, RedirectError> {
            Err(RedirectError::Unsupported {
                path: path.to_path_buf(),
            })
        }
        fn read_attr(&self, path: &Path, _: &str, _: usize) -> Result<Vec<u8>, RedirectError> {
            Err(RedirectError::Unsupported {
                path: path.to_path_buf(),
            })
        }
        fn stat(&self, _: &Path) -> Result<PlaceholderStat, RedirectError> {
            Ok(PlaceholderStat::default())
        }
    }

    #[test]
    fn layer_ext_is_auto_implemented() {
        fn _check<R: RemoteFs + LayerExt>() {}
    }

    #[test]
    fn redirect_layer_builds_filesystem() {
        let config = RedirectConfig::default().with_protocol("cwiq");
        let fs = NoRemote.layer(RedirectLayer::with_config(NoAttrs, config).unwrap());
        assert_eq!(fs.name(), "cwiq");
        assert!(!fs.can_handle(Path::new("/data/obj1")));
    }

    #[test]
    fn shared_remote_is_not_rewrapped() {
        let remote: Arc<dyn RemoteFs> = Arc::new(NoRemote);
        let fs = RedirectLayer::new(NoAttrs).layer_shared(remote.clone());
        assert!(Arc::ptr_eq(fs.remote(), &remote));
        assert_eq!(fs.name(), crate::DEFAULT_PROTOCOL);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = RedirectConfig::default().with_attribute_name("");
        assert!(RedirectLayer::with_config(NoAttrs, config).is_err());
    }
}
