//! A fixed snapshot of device state.
//!
//! Used by the CLI (from flags or a TOML file) and by tests as a
//! deterministic stand-in for live platform services.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Connectivity, ContentResolver, HandlerRegistry, NetworkClass, SecureSettings};
use crate::error::{PolicyError, Result};
use crate::model::intent::ViewRequest;

/// Static answers for every platform query.
///
/// The default describes an offline device with no handlers and sideloading
/// disabled, i.e. the most restrictive state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSnapshot {
    /// Active network class.
    pub network: NetworkClass,
    /// Number of installed applications able to view any attachment.
    pub view_handlers: usize,
    /// Value of the "install from unknown sources" setting.
    pub sideload_allowed: bool,
    /// Attachment URI → content URI redirects.
    pub content_uris: BTreeMap<String, String>,
}

impl DeviceSnapshot {
    /// Load a snapshot from a TOML file.
    ///
    /// ```toml
    /// network = "unmetered"
    /// view_handlers = 2
    /// sideload_allowed = false
    ///
    /// [content_uris]
    /// "content://com.android.email.attachmentprovider/0/7/RAW" = "content://media/7"
    /// ```
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| PolicyError::io(path, e))?;
        let snapshot =
            toml::from_str(&contents).map_err(|e| PolicyError::invalid_config(path, e))?;
        tracing::debug!(path = %path.display(), "Loaded device snapshot");
        Ok(snapshot)
    }

    /// Replace the fields for which a value is given, keeping the rest.
    pub fn with_overrides(
        mut self,
        network: Option<NetworkClass>,
        view_handlers: Option<usize>,
        sideload_allowed: Option<bool>,
    ) -> Self {
        if let Some(network) = network {
            self.network = network;
        }
        if let Some(view_handlers) = view_handlers {
            self.view_handlers = view_handlers;
        }
        if let Some(sideload_allowed) = sideload_allowed {
            self.sideload_allowed = sideload_allowed;
        }
        self
    }
}

impl Connectivity for DeviceSnapshot {
    fn network_class(&self) -> Result<NetworkClass> {
        Ok(self.network)
    }
}

impl HandlerRegistry for DeviceSnapshot {
    fn count_view_handlers(&self, _request: &ViewRequest) -> Result<usize> {
        Ok(self.view_handlers)
    }
}

impl SecureSettings for DeviceSnapshot {
    fn sideload_allowed(&self) -> Result<bool> {
        Ok(self.sideload_allowed)
    }
}

impl ContentResolver for DeviceSnapshot {
    fn resolve_content_uri(&self, attachment_uri: &str) -> Result<Option<String>> {
        Ok(self.content_uris.get(attachment_uri).cloned())
    }
}
