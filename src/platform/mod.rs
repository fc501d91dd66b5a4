//! Read-only views of device state consulted during evaluation.
//!
//! Each query may fail with [`crate::error::PolicyError::PlatformUnavailable`]; the
//! evaluator treats any failure as the most restrictive answer.

pub mod snapshot;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::intent::ViewRequest;

/// Class of the currently active network connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkClass {
    /// No active connection.
    #[default]
    None,
    /// Mobile data or any connection that may incur a cost.
    Metered,
    /// Wi-Fi class connection, assumed free.
    Unmetered,
}

impl fmt::Display for NetworkClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Metered => "metered",
            Self::Unmetered => "unmetered",
        })
    }
}

impl FromStr for NetworkClass {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "offline" => Ok(Self::None),
            "metered" | "mobile" => Ok(Self::Metered),
            "unmetered" | "wifi" => Ok(Self::Unmetered),
            other => Err(format!(
                "unknown network class '{other}' (expected none, metered or unmetered)"
            )),
        }
    }
}

/// Reports the active network class.
pub trait Connectivity {
    fn network_class(&self) -> Result<NetworkClass>;
}

/// Knows which installed applications can handle a request.
pub trait HandlerRegistry {
    /// Number of applications able to handle `request`.
    fn count_view_handlers(&self, request: &ViewRequest) -> Result<usize>;
}

/// Secure device settings.
pub trait SecureSettings {
    /// Whether packages from outside the primary store may be installed.
    fn sideload_allowed(&self) -> Result<bool>;
}

/// Maps an attachment URI to the content URI the platform should open.
pub trait ContentResolver {
    /// `Ok(None)` means the URI has no redirect and should be used as-is.
    fn resolve_content_uri(&self, attachment_uri: &str) -> Result<Option<String>>;
}

/// The set of collaborators one evaluation consults.
#[derive(Clone, Copy)]
pub struct Platform<'a> {
    pub connectivity: &'a dyn Connectivity,
    pub handlers: &'a dyn HandlerRegistry,
    pub settings: &'a dyn SecureSettings,
    pub resolver: &'a dyn ContentResolver,
}

impl<'a> Platform<'a> {
    /// Use a single object that implements every collaborator.
    pub fn from_device<D>(device: &'a D) -> Self
    where
        D: Connectivity + HandlerRegistry + SecureSettings + ContentResolver,
    {
        Self {
            connectivity: device,
            handlers: device,
            settings: device,
            resolver: device,
        }
    }
}

impl fmt::Debug for Platform<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform").finish_non_exhaustive()
    }
}
