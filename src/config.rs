//! # Configuration
//!
//! [`RedirectConfig`] names the extended attribute that holds the remote URL
//! and the protocol the filesystem registers under.
//!
//! ```rust
//! use cwiqfs_redirect::RedirectConfig;
//!
//! let config = RedirectConfig::default().with_attribute_name("user.cwiqfs.s3_url");
//! assert_eq!(config.protocol, "s3redirect");
//! assert!(config.validate().is_ok());
//! ```
//!
//! With the `serde` feature, configs can be loaded from JSON:
//!
//! ```toml
//! [dependencies]
//! cwiqfs-redirect = { version = "0.1", features = ["serde"] }
//! ```

use crate::RedirectError;

/// Attribute read from placeholder paths unless configured otherwise.
pub const DEFAULT_ATTRIBUTE_NAME: &str = "system.cwiqfs.s3_url";

/// Protocol name the filesystem reports unless configured otherwise.
pub const DEFAULT_PROTOCOL: &str = "s3redirect";

/// Settings for the redirection layer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RedirectConfig {
    /// Extended attribute holding the remote URL.
    pub attribute_name: String,
    /// Protocol identifier used for registration and error messages.
    pub protocol: String,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            attribute_name: DEFAULT_ATTRIBUTE_NAME.to_string(),
            protocol: DEFAULT_PROTOCOL.to_string(),
        }
    }
}

impl RedirectConfig {
    /// Replace the attribute name.
    pub fn with_attribute_name(mut self, name: impl Into<String>) -> Self {
        self.attribute_name = name.into();
        self
    }

    /// Replace the protocol name.
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    /// Check that both names are usable.
    ///
    /// # Errors
    ///
    /// - [`RedirectError::InvalidConfig`] if a name is empty, the attribute
    ///   name contains a NUL byte, or the protocol contains `:` or `/`
    pub fn validate(&self) -> Result<(), RedirectError> {
        if self.attribute_name.is_empty() {
            return Err(RedirectError::InvalidConfig(
                "attribute_name must not be empty".into(),
            ));
        }
        if self.attribute_name.contains('\0') {
            return Err(RedirectError::InvalidConfig(
                "attribute_name must not contain NUL".into(),
            ));
        }
        if self.protocol.is_empty() {
            return Err(RedirectError::InvalidConfig(
                "protocol must not be empty".into(),
            ));
        }
        if self.protocol.contains([':', '/']) {
            return Err(RedirectError::InvalidConfig(format!(
                "protocol {:?} must be a bare name",
                self.protocol
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// - [`RedirectError::Deserialization`] if the JSON is malformed
    /// - [`RedirectError::InvalidConfig`] if validation fails
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, RedirectError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| RedirectError::Deserialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = RedirectConfig::default();
        assert_eq!(c.attribute_name, "system.cwiqfs.s3_url");
        assert_eq!(c.protocol, "s3redirect");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn builder_overrides() {
        let c = RedirectConfig::default()
            .with_attribute_name("user.url")
            .with_protocol("redirect");
        assert_eq!(c.attribute_name, "user.url");
        assert_eq!(c.protocol, "redirect");
    }

    #[test]
    fn rejects_empty_names() {
        let c = RedirectConfig::default().with_attribute_name("");
        assert!(matches!(c.validate(), Err(RedirectError::InvalidConfig(_))));
        let c = RedirectConfig::default().with_protocol("");
        assert!(matches!(c.validate(), Err(RedirectError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_url_shaped_protocol() {
        let c = RedirectConfig::default().with_protocol("s3://");
        assert!(c.validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn from_json_fills_defaults() {
        let c = RedirectConfig::from_json(r#"{"attribute_name": "user.url"}"#).unwrap();
        assert_eq!(c.attribute_name, "user.url");
        assert_eq!(c.protocol, DEFAULT_PROTOCOL);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn from_json_rejects_garbage() {
        assert!(matches!(
            RedirectConfig::from_json("{"),
            Err(RedirectError::Deserialization(_))
        ));
    }
}
