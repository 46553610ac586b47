//! # Host Integration
//!
//! The composition root. [`Extension::load`] builds a [`RedirectFs`] from its
//! config and hands it to the host's [`SubSystemRegistry`]. Nothing here is
//! global; a host may load several extensions with different configs.
//!
//! ```rust
//! use cwiqfs_redirect::{
//!     Extension, NativeAttributes, ProtocolFs, RedirectError, RedirectHandle, RemoteFs,
//!     SubSystemRegistry,
//! };
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Registry {
//!     backends: Vec<Box<dyn ProtocolFs<Handle = RedirectHandle>>>,
//! }
//!
//! impl SubSystemRegistry<RedirectHandle> for Registry {
//!     fn register_sub_system(
//!         &mut self,
//!         fs: Box<dyn ProtocolFs<Handle = RedirectHandle>>,
//!     ) -> Result<(), RedirectError> {
//!         self.backends.push(fs);
//!         Ok(())
//!     }
//! }
//!
//! fn boot(remote: Arc<dyn RemoteFs>) -> Result<Registry, RedirectError> {
//!     let mut registry = Registry::default();
//!     Extension::new(remote).load(&mut registry, NativeAttributes)?;
//!     assert_eq!(registry.backends[0].name(), "s3redirect");
//!     Ok(registry)
//! }
//! ```

use std::sync::Arc;

use tracing::info;

use crate::{PathAttributes, ProtocolFs, RedirectConfig, RedirectError, RedirectFs, RemoteFs};

/// Name the extension reports to the host.
pub const EXTENSION_NAME: &str = "cwiq";

/// The host's registry of pluggable filesystems.
///
/// `H` is the handle type the registry stores backends for.
pub trait SubSystemRegistry<H> {
    /// Install a backend.
    ///
    /// # Errors
    ///
    /// Host specific, e.g. a protocol name already taken.
    fn register_sub_system(
        &mut self,
        fs: Box<dyn ProtocolFs<Handle = H>>,
    ) -> Result<(), RedirectError>;
}

/// Installs the redirecting filesystem into a host.
#[derive(Clone)]
pub struct Extension {
    config: RedirectConfig,
    remote: Arc<dyn RemoteFs>,
}

impl std::fmt::Debug for Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extension")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Extension {
    /// Extension using the default config. `remote` opens the resolved URLs.
    pub fn new(remote: Arc<dyn RemoteFs>) -> Self {
        Self {
            config: RedirectConfig::default(),
            remote,
        }
    }

    /// Replace the config.
    pub fn with_config(mut self, config: RedirectConfig) -> Self {
        self.config = config;
        self
    }

    /// Extension name.
    pub fn name(&self) -> &'static str {
        EXTENSION_NAME
    }

    /// Crate version.
    pub fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// The active config.
    pub fn config(&self) -> &RedirectConfig {
        &self.config
    }

    /// Build a [`RedirectFs`] over `attrs` and register it.
    ///
    /// # Errors
    ///
    /// - [`RedirectError::InvalidConfig`] if the config fails validation
    /// - whatever the registry rejects the backend with
    pub fn load<R, A>(&self, registry: &mut R, attrs: A) -> Result<(), RedirectError>
    where
        R: SubSystemRegistry<crate::RedirectHandle> + ?Sized,
        A: PathAttributes + 'static,
    {
        let fs = RedirectFs::with_config(attrs, self.remote.clone(), self.config.clone())?;
        registry.register_sub_system(Box::new(fs))?;
        info!(
            extension = EXTENSION_NAME,
            protocol = %self.config.protocol,
            attribute = %self.config.attribute_name,
            "redirecting filesystem registered"
        );
        Ok(())
    }
}
