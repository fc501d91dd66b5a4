//! Attachment records submitted for policy evaluation.

use serde::{Deserialize, Serialize};

/// The attributes of one attachment that the view/save policy looks at.
///
/// Owned by the caller; evaluation only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRecord {
    /// Filename as given in the message (may lack an extension).
    pub name: String,

    /// Declared MIME content type (e.g. `"image/jpeg"`). May be empty, in which
    /// case the type is inferred from the filename extension.
    pub content_type: String,

    /// Decoded size in bytes.
    pub size: u64,

    /// Opaque attachment identifier, only used to build its content locator.
    pub id: u64,
}

impl AttachmentRecord {
    /// Build a record from its parts.
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        size: u64,
        id: u64,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size,
            id,
        }
    }
}
