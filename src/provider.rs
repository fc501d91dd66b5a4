//! Content locators for attachments.
//!
//! An attachment is first addressed through the mail provider's own URI,
//! which the platform's content resolver may redirect to the URI that
//! actually serves the bytes.

use crate::platform::ContentResolver;

/// Authority of the attachment content provider.
pub const ATTACHMENT_AUTHORITY: &str = "com.android.email.attachmentprovider";

/// URI of the raw attachment as served by the attachment provider.
pub fn attachment_uri(account_id: u64, attachment_id: u64) -> String {
    format!("content://{ATTACHMENT_AUTHORITY}/{account_id}/{attachment_id}/RAW")
}

/// Resolve an attachment to the locator a viewer should open.
///
/// Falls back to the provider URI when the resolver has no redirect or
/// cannot be queried.
pub fn resolve_content_locator(
    resolver: &dyn ContentResolver,
    attachment_id: u64,
    account_id: u64,
) -> String {
    let uri = attachment_uri(account_id, attachment_id);
    match resolver.resolve_content_uri(&uri) {
        Ok(Some(content_uri)) => content_uri,
        Ok(None) => uri,
        Err(e) => {
            tracing::warn!(uri = %uri, error = %e, "Content resolver unavailable, using attachment URI");
            uri
        }
    }
}
