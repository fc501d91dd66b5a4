//! Requests handed to the platform to open an attachment.

use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// What the receiving handler is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentAction {
    /// Display the content.
    View,
}

/// Launch flags attached to a [`ViewRequest`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntentFlags(u32);

impl IntentFlags {
    /// The handler receives temporary read access to the target URI.
    pub const GRANT_READ_URI_PERMISSION: Self = Self(0x0000_0001);
    /// The handler's activity is cleared when the task is reset.
    pub const CLEAR_WHEN_TASK_RESET: Self = Self(0x0008_0000);

    /// Raw bit value.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// `true` if every bit of `other` is set in `self`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for IntentFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A request to open one attachment's content in an external handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRequest {
    pub action: IntentAction,
    /// Resolved content locator of the attachment.
    pub target: String,
    pub flags: IntentFlags,
}

impl ViewRequest {
    /// A `View` request for `target` with the standard attachment flags.
    pub fn view(target: impl Into<String>) -> Self {
        Self {
            action: IntentAction::View,
            target: target.into(),
            flags: IntentFlags::GRANT_READ_URI_PERMISSION | IntentFlags::CLEAR_WHEN_TASK_RESET,
        }
    }
}
