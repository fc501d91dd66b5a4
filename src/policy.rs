//! Attachment view/save policy.
//!
//! [`evaluate`] runs a fixed chain of rules over one attachment. Both
//! permissions start out granted and every rule can only revoke them, so the
//! verdict is the same whatever order the rules run in. All rules always run;
//! the handler query is the most expensive and goes last.
//!
//! | Rule | View | Save |
//! |---|---|---|
//! | MIME type not allowed, or denied | revoked | unchanged |
//! | Unacceptable extension | revoked | revoked |
//! | Installable extension | revoked | revoked unless sideloading is allowed |
//! | Over size limit without an unmetered network | revoked | revoked |
//! | No installed handler | revoked | revoked |

use tracing::{debug, warn};

use crate::config::PolicyConfig;
use crate::model::attachment::AttachmentRecord;
use crate::model::decision::EvaluationResult;
use crate::model::intent::ViewRequest;
use crate::parser::mime;
use crate::platform::{ContentResolver, NetworkClass, Platform};
use crate::provider;

/// Account used to build the locator when probing for handlers.
const PROBE_ACCOUNT_ID: u64 = 0;

/// Decide whether `record` may be viewed and/or saved.
///
/// Never fails: a platform query that errors is answered with the most
/// restrictive value (no network, no handlers, sideloading disabled).
pub fn evaluate(
    record: &AttachmentRecord,
    config: &PolicyConfig,
    platform: &Platform<'_>,
) -> EvaluationResult {
    let mut can_view = true;
    let mut can_save = true;

    // MIME allow/deny lists
    let content_type = mime::infer_mime_type(&record.name, &record.content_type);
    if !mime::mime_type_matches(&content_type, &config.acceptable_view_types)
        || mime::mime_type_matches(&content_type, &config.unacceptable_view_types)
    {
        debug!(attachment = %record.name, content_type = %content_type, "MIME type not viewable");
        can_view = false;
    }

    let extension = mime::filename_extension(&record.name);

    // Executables and scripts
    if !extension.is_empty() && config.is_unacceptable_extension(&extension) {
        debug!(attachment = %record.name, extension = %extension, "Unacceptable extension");
        can_view = false;
        can_save = false;
    }

    // Installable packages: never viewable, savable only if sideloading is on
    if !extension.is_empty() && config.is_installable_extension(&extension) {
        let sideload = platform.settings.sideload_allowed().unwrap_or_else(|e| {
            warn!(error = %e, "Sideload setting unavailable, assuming disabled");
            false
        });
        debug!(attachment = %record.name, extension = %extension, sideload, "Installable extension");
        can_view = false;
        can_save &= sideload;
    }

    // Size limit, lifted on unmetered networks
    if record.size > config.max_download_size {
        let network = platform.connectivity.network_class().unwrap_or_else(|e| {
            warn!(error = %e, "Network state unavailable, assuming no network");
            NetworkClass::None
        });
        if network != NetworkClass::Unmetered {
            debug!(
                attachment = %record.name,
                size = record.size,
                limit = config.max_download_size,
                network = %network,
                "Attachment too large for current network"
            );
            can_view = false;
            can_save = false;
        }
    }

    // Someone has to be able to open it
    let request = view_request(record, PROBE_ACCOUNT_ID, platform.resolver);
    let handlers = platform
        .handlers
        .count_view_handlers(&request)
        .unwrap_or_else(|e| {
            warn!(error = %e, uri = %request.target, "Handler query failed, assuming none");
            0
        });
    if handlers == 0 {
        debug!(attachment = %record.name, uri = %request.target, "No handler can view attachment");
        can_view = false;
        can_save = false;
    }

    debug!(
        attachment = %record.name,
        allow_view = can_view,
        allow_save = can_save,
        "Attachment policy evaluated"
    );

    EvaluationResult {
        allow_view: can_view,
        allow_save: can_save,
        effective_content_type: content_type,
    }
}

/// Build the request that opens `record` in an external viewer.
///
/// Performs no permission checks; call [`evaluate`] first.
pub fn view_request(
    record: &AttachmentRecord,
    account_id: u64,
    resolver: &dyn ContentResolver,
) -> ViewRequest {
    let target = provider::resolve_content_locator(resolver, record.id, account_id);
    ViewRequest::view(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::intent::{IntentAction, IntentFlags};
    use crate::platform::snapshot::DeviceSnapshot;

    fn device(
        network: NetworkClass,
        view_handlers: usize,
        sideload_allowed: bool,
    ) -> DeviceSnapshot {
        DeviceSnapshot {
            network,
            view_handlers,
            sideload_allowed,
            ..DeviceSnapshot::default()
        }
    }

    fn run(record: &AttachmentRecord, snap: &DeviceSnapshot) -> EvaluationResult {
        evaluate(record, &PolicyConfig::default(), &Platform::from_device(snap))
    }

    #[test]
    fn test_deny_list_revokes_view_only() {
        let config = PolicyConfig {
            unacceptable_view_types: vec!["text/html".into()],
            ..PolicyConfig::default()
        };
        let snap = device(NetworkClass::Unmetered, 1, false);
        let record = AttachmentRecord::new("page.html", "text/html", 100, 1);
        let result = evaluate(&record, &config, &Platform::from_device(&snap));
        assert!(!result.allow_view);
        assert!(result.allow_save);
    }

    #[test]
    fn test_allow_list_miss_revokes_view_only() {
        let config = PolicyConfig {
            acceptable_view_types: vec!["image/*".into()],
            ..PolicyConfig::default()
        };
        let snap = device(NetworkClass::Unmetered, 1, false);
        let record = AttachmentRecord::new("report.pdf", "", 100, 1);
        let result = evaluate(&record, &config, &Platform::from_device(&snap));
        assert_eq!(result.effective_content_type, "application/pdf");
        assert!(!result.allow_view);
        assert!(result.allow_save);
    }

    #[test]
    fn test_size_exactly_at_limit_is_allowed() {
        let snap = device(NetworkClass::Metered, 1, false);
        let limit = PolicyConfig::default().max_download_size;
        let at = run(&AttachmentRecord::new("a.jpg", "image/jpeg", limit, 1), &snap);
        assert!(at.allow_view && at.allow_save);
        let over = run(&AttachmentRecord::new("a.jpg", "image/jpeg", limit + 1, 1), &snap);
        assert!(!over.allow_view && !over.allow_save);
    }

    #[test]
    fn test_size_rule_denies_when_offline() {
        let snap = device(NetworkClass::None, 1, false);
        let result = run(&AttachmentRecord::new("a.jpg", "image/jpeg", 50_000_000, 1), &snap);
        assert!(!result.eligible_for_download());
    }

    #[test]
    fn test_unacceptable_and_installable_together_stay_denied() {
        let config = PolicyConfig {
            installable_extensions: vec!["apk".into(), "exe".into()],
            ..PolicyConfig::default()
        };
        let snap = device(NetworkClass::Unmetered, 1, true);
        let record = AttachmentRecord::new("setup.exe", "", 10, 1);
        let result = evaluate(&record, &config, &Platform::from_device(&snap));
        assert!(!result.allow_view);
        assert!(!result.allow_save);
    }

    #[test]
    fn test_view_request_uses_resolved_locator() {
        let mut snap = DeviceSnapshot::default();
        snap.content_uris.insert(
            provider::attachment_uri(5, 77),
            "content://media/external/77".into(),
        );
        let record = AttachmentRecord::new("a.jpg", "image/jpeg", 10, 77);

        let req = view_request(&record, 5, &snap);
        assert_eq!(req.action, IntentAction::View);
        assert_eq!(req.target, "content://media/external/77");
        assert_eq!(
            req.flags,
            IntentFlags::GRANT_READ_URI_PERMISSION | IntentFlags::CLEAR_WHEN_TASK_RESET
        );

        let unresolved = view_request(&record, 6, &snap);
        assert_eq!(unresolved.target, provider::attachment_uri(6, 77));
    }
}
